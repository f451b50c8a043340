//! Backend worker: owns the tokio runtime, the sensor client, the polling
//! feed, and the camera stream tasks.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use tokio::task::JoinHandle;

use client_core::{FeedEvent, SensorApiClient, SensorFeed, VideoStream};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::stream::pump_video_stream;

pub fn spawn_backend_thread(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = Arc::new(SensorApiClient::new(&settings.server_url));
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            // One-shot priming call; its result feeds no state, so a
            // failure is logged and nothing else.
            if let Err(err) = client.init_sensor_data().await {
                tracing::warn!("sensor init call failed: {err}");
            }

            let feed = SensorFeed::with_interval(Arc::clone(&client), settings.poll_interval);
            let mut feed_events = feed.subscribe_events();
            let ui_tx_feed = ui_tx.clone();
            let forward_task = tokio::spawn(async move {
                while let Ok(event) = feed_events.recv().await {
                    let event = match event {
                        FeedEvent::ChartsUpdated { charts, sequence } => {
                            UiEvent::ChartsUpdated { charts, sequence }
                        }
                        FeedEvent::FetchFailed {
                            consecutive_failures,
                        } => UiEvent::PollFailed {
                            consecutive_failures,
                        },
                    };
                    let _ = ui_tx_feed.try_send(event);
                }
            });
            feed.start().await;

            let stream_http = reqwest::Client::new();
            let mut stream_tasks: Vec<JoinHandle<()>> = Vec::new();
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::ResetProcess => match client.reset_data().await {
                        Ok(()) => {
                            let _ = ui_tx.try_send(UiEvent::ResetCompleted);
                        }
                        Err(err) => {
                            tracing::warn!("reset call failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::Reset,
                                err.to_string(),
                            )));
                        }
                    },
                    BackendCommand::StartVideoStreams => {
                        abort_stream_tasks(&mut stream_tasks);
                        for stream in VideoStream::ALL {
                            let url = client.video_feed_url(stream);
                            tracing::info!(stream = stream.label(), url = %url, "starting video stream");
                            stream_tasks.push(tokio::spawn(pump_video_stream(
                                stream_http.clone(),
                                url,
                                stream,
                                ui_tx.clone(),
                            )));
                        }
                    }
                    BackendCommand::StopVideoStreams => abort_stream_tasks(&mut stream_tasks),
                }
            }

            // UI side hung up: release the timer and stream tasks
            feed.stop().await;
            forward_task.abort();
            abort_stream_tasks(&mut stream_tasks);
        });
    });
}

fn abort_stream_tasks(tasks: &mut Vec<JoinHandle<()>>) {
    for task in tasks.drain(..) {
        task.abort();
    }
}
