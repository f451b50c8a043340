use shared::error::SnapshotShapeError;
use thiserror::Error;

/// Failure of one backend call.
///
/// Every variant is transient: the polling cadence is the retry policy, so
/// callers log the failure and keep showing the last good state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] SnapshotShapeError),
}
