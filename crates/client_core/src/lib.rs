//! HTTP client and polling feed for the cure-monitor sensor backend.

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::SensorSnapshot;
use tracing::debug;

pub mod error;
pub mod feed;

pub use error::FetchError;
pub use feed::{FeedEvent, SensorFeed, DEFAULT_POLL_INTERVAL};

/// The two MJPEG camera feeds the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoStream {
    Rgb,
    Thermal,
}

impl VideoStream {
    pub const ALL: [VideoStream; 2] = [VideoStream::Rgb, VideoStream::Thermal];

    pub fn label(self) -> &'static str {
        match self {
            VideoStream::Rgb => "camera",
            VideoStream::Thermal => "thermal camera",
        }
    }

    fn path(self) -> &'static str {
        match self {
            VideoStream::Rgb => "/api/video_feed",
            VideoStream::Thermal => "/api/video_feed_th",
        }
    }
}

/// Source of snapshots for the polling feed. [`SensorApiClient`] is the
/// real implementation; tests substitute scripted stubs.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<SensorSnapshot, FetchError>;
}

/// Typed client over the sensor backend's HTTP surface.
pub struct SensorApiClient {
    http: Client,
    base_url: String,
}

impl SensorApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One-shot priming call at startup; the response body is unused.
    pub async fn init_sensor_data(&self) -> Result<(), FetchError> {
        self.get_ok("/api/init_sensor_data").await
    }

    /// Fetches the current snapshot and validates its shape at the boundary.
    pub async fn get_data(&self) -> Result<SensorSnapshot, FetchError> {
        let response = self
            .http
            .get(format!("{}/api/get_data", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        let snapshot: SensorSnapshot = response.json().await?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Resets the backend's stored series and event state.
    pub async fn reset_data(&self) -> Result<(), FetchError> {
        self.get_ok("/api/reset_data").await
    }

    /// URL the view streams MJPEG frames from.
    pub fn video_feed_url(&self, stream: VideoStream) -> String {
        format!("{}{}", self.base_url, stream.path())
    }

    async fn get_ok(&self, path: &str) -> Result<(), FetchError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        debug!(path, "backend call succeeded");
        Ok(())
    }
}

#[async_trait]
impl SnapshotSource for SensorApiClient {
    async fn fetch_snapshot(&self) -> Result<SensorSnapshot, FetchError> {
        self.get_data().await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
