use thiserror::Error;

/// Shape violation in a polled snapshot. The backend's three primary series
/// must share one length; a payload that breaks that is rejected at the
/// client boundary and the poll cycle fails closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "snapshot series lengths disagree: {timestamps} timestamps, \
     {temperature} temperature samples, {resistance} resistance samples"
)]
pub struct SnapshotShapeError {
    pub timestamps: usize,
    pub temperature: usize,
    pub resistance: usize,
}
