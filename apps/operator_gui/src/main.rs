//! Cure-monitor operator dashboard: egui shell over a backend worker that
//! polls the sensor backend and decodes the camera streams.

mod backend_bridge;
mod config;
mod controller;
mod media;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::runtime::spawn_backend_thread;
use crate::config::load_settings;
use crate::controller::events::UiEvent;
use crate::ui::app::DashboardApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    tracing::info!(
        server_url = %settings.server_url,
        poll_interval_ms = settings.poll_interval.as_millis() as u64,
        "starting operator dashboard"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    spawn_backend_thread(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cure Monitor")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cure Monitor",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(settings, cmd_tx, ui_rx)))),
    )
}
