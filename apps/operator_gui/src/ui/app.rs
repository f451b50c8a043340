//! Dashboard app shell: header with lamp guidance and reset, the two
//! camera stream panels, and the two metric charts.

use std::{collections::HashMap, sync::Arc, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use client_core::VideoStream;
use shared::chart::ChartPair;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::media::mjpeg::StreamFrame;
use crate::ui::chart_view::{show_chart, ChartZoomState};

/// Consecutive failed polls before the header shows the staleness badge.
const STALE_AFTER_FAILURES: u32 = 3;

struct StreamView {
    frame: Option<StreamFrame>,
    texture: Option<egui::TextureHandle>,
    last_error: Option<String>,
}

impl StreamView {
    fn new() -> Self {
        Self {
            frame: None,
            texture: None,
            last_error: None,
        }
    }
}

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    server_url: String,
    charts: Option<Arc<ChartPair>>,
    consecutive_poll_failures: u32,
    streams_visible: bool,
    streams: HashMap<VideoStream, StreamView>,
    temperature_zoom: ChartZoomState,
    resistance_zoom: ChartZoomState,
    status: String,
}

impl DashboardApp {
    pub fn new(
        settings: Settings,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            server_url: settings.server_url,
            charts: None,
            consecutive_poll_failures: 0,
            streams_visible: false,
            streams: HashMap::new(),
            temperature_zoom: ChartZoomState::default(),
            resistance_zoom: ChartZoomState::default(),
            status: "Waiting for first snapshot".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ChartsUpdated { charts, sequence } => {
                    tracing::trace!(sequence, "applying refreshed chart pair");
                    self.consecutive_poll_failures = 0;
                    self.charts = Some(charts);
                }
                UiEvent::PollFailed {
                    consecutive_failures,
                } => {
                    self.consecutive_poll_failures = consecutive_failures;
                }
                UiEvent::ResetCompleted => {
                    self.streams_visible = true;
                    self.status = "Process reset; live streams enabled".to_string();
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::StartVideoStreams,
                        &mut self.status,
                    );
                }
                UiEvent::StreamFrame { stream, frame } => {
                    let view = self.streams.entry(stream).or_insert_with(StreamView::new);
                    view.frame = Some(frame);
                    view.texture = None; // re-upload on next paint
                    view.last_error = None;
                }
                UiEvent::StreamEnded { stream, reason } => {
                    // last frame stays on screen; only the caption changes
                    self.streams
                        .entry(stream)
                        .or_insert_with(StreamView::new)
                        .last_error = Some(reason);
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                }
            }
        }
    }

    fn lamp_flagged(&self) -> bool {
        self.charts
            .as_ref()
            .map(|pair| pair.events.lamp_off)
            .unwrap_or(false)
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Cure Monitor");
            ui.separator();
            ui.small(&self.server_url);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset").clicked() {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::ResetProcess,
                        &mut self.status,
                    );
                }
                if self.lamp_flagged() {
                    ui.label(
                        egui::RichText::new("Turn the lamp OFF")
                            .strong()
                            .color(egui::Color32::from_rgb(220, 60, 60)),
                    );
                } else {
                    ui.label(egui::RichText::new("Lamp must be ON").weak());
                }
                if self.consecutive_poll_failures >= STALE_AFTER_FAILURES {
                    ui.label(
                        egui::RichText::new(format!(
                            "Data stale ({} failed polls)",
                            self.consecutive_poll_failures
                        ))
                        .color(egui::Color32::from_rgb(230, 180, 60)),
                    );
                }
            });
        });
    }

    fn show_stream_panel(&mut self, ui: &mut egui::Ui, stream: VideoStream) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.small(stream.label());
            let Some(view) = self.streams.get_mut(&stream) else {
                ui.weak("waiting for frames...");
                return;
            };
            if view.texture.is_none() {
                if let Some(frame) = &view.frame {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [frame.width, frame.height],
                        &frame.rgba,
                    );
                    view.texture = Some(ui.ctx().load_texture(
                        format!("stream:{}", stream.label()),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
            }
            match &view.texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(texture)
                            .max_width(ui.available_width())
                            .max_height(300.0),
                    );
                }
                None => {
                    ui.weak("waiting for frames...");
                }
            }
            if let Some(reason) = &view.last_error {
                ui.small(format!("stream interrupted: {reason}"));
            }
        });
    }

    fn show_streams_column(&mut self, ui: &mut egui::Ui) {
        if !self.streams_visible {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.weak("Camera streams appear after a process reset.");
            });
            return;
        }
        for stream in VideoStream::ALL {
            self.show_stream_panel(ui, stream);
            ui.add_space(8.0);
        }
    }

    fn show_charts_column(&mut self, ui: &mut egui::Ui) {
        let Some(charts) = self.charts.clone() else {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.weak("Charts appear once the first snapshot arrives.");
            });
            return;
        };
        // resistance on top, temperature below
        show_chart(ui, &charts.resistance, &mut self.resistance_zoom);
        ui.add_space(8.0);
        show_chart(ui, &charts.temperature, &mut self.temperature_zoom);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.show_header(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |columns| {
                    self.show_streams_column(&mut columns[0]);
                    self.show_charts_column(&mut columns[1]);
                });
            });
        });

        // streams animate faster than the poll cadence
        if self.streams_visible {
            ctx.request_repaint_after(Duration::from_millis(33));
        } else {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::{UiError, UiErrorContext};
    use crossbeam_channel::bounded;
    use shared::chart::build_chart_pair;
    use shared::domain::EventState;
    use shared::protocol::SensorSnapshot;

    fn app_with_queues() -> (
        DashboardApp,
        Sender<UiEvent>,
        Receiver<BackendCommand>,
    ) {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
        let app = DashboardApp::new(Settings::default(), cmd_tx, ui_rx);
        (app, ui_tx, cmd_rx)
    }

    fn chart_pair() -> Arc<ChartPair> {
        let snapshot = SensorSnapshot {
            timestamps: vec!["t0".into()],
            temperature: vec![21.0],
            resistance: vec![90.0],
            ..SensorSnapshot::default()
        };
        let events = EventState::from_snapshot(&snapshot);
        Arc::new(build_chart_pair(&snapshot, &events))
    }

    #[test]
    fn reset_completion_enables_streams_and_requests_them() {
        let (mut app, ui_tx, cmd_rx) = app_with_queues();
        assert!(!app.streams_visible);

        ui_tx.send(UiEvent::ResetCompleted).expect("queue event");
        app.process_ui_events();

        assert!(app.streams_visible);
        assert!(matches!(
            cmd_rx.try_recv().expect("queued command"),
            BackendCommand::StartVideoStreams
        ));
    }

    #[test]
    fn reset_failure_keeps_streams_hidden() {
        let (mut app, ui_tx, cmd_rx) = app_with_queues();

        ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::Reset,
                "backend returned status 503",
            )))
            .expect("queue event");
        app.process_ui_events();

        assert!(!app.streams_visible);
        assert!(cmd_rx.try_recv().is_err());
        assert!(app.status.contains("error"));
    }

    #[test]
    fn charts_update_clears_the_staleness_counter() {
        let (mut app, ui_tx, _cmd_rx) = app_with_queues();

        ui_tx
            .send(UiEvent::PollFailed {
                consecutive_failures: 4,
            })
            .expect("queue event");
        app.process_ui_events();
        assert_eq!(app.consecutive_poll_failures, 4);

        ui_tx
            .send(UiEvent::ChartsUpdated {
                charts: chart_pair(),
                sequence: 7,
            })
            .expect("queue event");
        app.process_ui_events();
        assert_eq!(app.consecutive_poll_failures, 0);
        assert!(app.charts.is_some());
    }

    #[test]
    fn stream_end_keeps_the_last_frame() {
        let (mut app, ui_tx, _cmd_rx) = app_with_queues();

        ui_tx
            .send(UiEvent::StreamFrame {
                stream: VideoStream::Rgb,
                frame: StreamFrame {
                    width: 1,
                    height: 1,
                    rgba: vec![0, 0, 0, 255],
                },
            })
            .expect("queue event");
        ui_tx
            .send(UiEvent::StreamEnded {
                stream: VideoStream::Rgb,
                reason: "stream closed by backend".to_string(),
            })
            .expect("queue event");
        app.process_ui_events();

        let view = app.streams.get(&VideoStream::Rgb).expect("stream view");
        assert!(view.frame.is_some());
        assert!(view.last_error.is_some());
    }
}
