//! UI/backend events and error modeling for the dashboard controller.

use std::sync::Arc;

use client_core::VideoStream;
use shared::chart::ChartPair;

use crate::media::mjpeg::StreamFrame;

pub enum UiEvent {
    Info(String),
    /// A poll cycle published a fresh pair of chart models.
    ChartsUpdated {
        charts: Arc<ChartPair>,
        sequence: u64,
    },
    /// A poll cycle failed; previous charts stay on screen.
    PollFailed { consecutive_failures: u32 },
    /// The backend reset call succeeded; streams may be shown.
    ResetCompleted,
    StreamFrame {
        stream: VideoStream,
        frame: StreamFrame,
    },
    StreamEnded {
        stream: VideoStream,
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Backend,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Reset,
    Stream,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Decode => "Decode",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("transport")
            || lower.contains("unreachable")
            || lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if lower.contains("status")
            || lower.contains("malformed")
            || lower.contains("invalid")
        {
            UiErrorCategory::Backend
        } else if lower.contains("decode") || lower.contains("jpeg") || lower.contains("image") {
            UiErrorCategory::Decode
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
