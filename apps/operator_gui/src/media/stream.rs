//! Background task that streams one MJPEG feed into the UI event queue.

use crossbeam_channel::Sender;
use futures::StreamExt;
use tracing::{debug, warn};

use client_core::VideoStream;

use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::mjpeg::{decode_stream_frame, MultipartFrameSplitter};

pub async fn pump_video_stream(
    http: reqwest::Client,
    url: String,
    stream: VideoStream,
    ui_tx: Sender<UiEvent>,
) {
    let response = match http.get(&url).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(stream = stream.label(), "stream request failed: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::Stream,
                format!("{} stream request failed: {err}", stream.label()),
            )));
            let _ = ui_tx.try_send(UiEvent::StreamEnded {
                stream,
                reason: err.to_string(),
            });
            return;
        }
    };
    if !response.status().is_success() {
        let reason = format!("stream endpoint returned status {}", response.status());
        warn!(stream = stream.label(), "{reason}");
        let _ = ui_tx.try_send(UiEvent::StreamEnded { stream, reason });
        return;
    }

    let mut body = response.bytes_stream();
    let mut splitter = MultipartFrameSplitter::new();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!(stream = stream.label(), "stream read failed: {err}");
                let _ = ui_tx.try_send(UiEvent::StreamEnded {
                    stream,
                    reason: err.to_string(),
                });
                return;
            }
        };
        for part in splitter.push(&chunk) {
            match decode_stream_frame(&part) {
                // a full UI queue drops the frame; a newer one follows shortly
                Ok(frame) => {
                    let _ = ui_tx.try_send(UiEvent::StreamFrame { stream, frame });
                }
                Err(err) => {
                    debug!(stream = stream.label(), "skipping undecodable frame: {err}");
                }
            }
        }
    }

    let _ = ui_tx.try_send(UiEvent::StreamEnded {
        stream,
        reason: "stream closed by backend".to_string(),
    });
}
