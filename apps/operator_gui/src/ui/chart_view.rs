//! egui_plot rendering of a [`ChartModel`]: log-scaled line series, event
//! marker lines, and per-axis zoom sliders.

use eframe::egui;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, VLine};

use shared::chart::ChartModel;
use shared::domain::ProcessEvent;

/// Slider positions for one chart, in percent of the model's slider span.
/// This is view state: it survives the wholesale model replacement that
/// happens every poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartZoomState {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
}

impl Default for ChartZoomState {
    fn default() -> Self {
        Self {
            x_start: 0.0,
            x_end: 100.0,
            y_start: 0.0,
            y_end: 100.0,
        }
    }
}

pub fn marker_color(event: ProcessEvent) -> egui::Color32 {
    let (r, g, b) = event.marker_rgb();
    egui::Color32::from_rgb(r, g, b)
}

/// Values are plotted in log10 space; keep zero-resistance startup samples
/// finite rather than -inf.
fn log_axis(value: f64) -> f64 {
    value.max(f64::MIN_POSITIVE).log10()
}

/// Clock portion of a stored timestamp
/// ("2024-04-09 14:45:15 PM" -> "14:45:15").
fn clock_label(timestamp: &str) -> &str {
    timestamp.split(' ').nth(1).unwrap_or(timestamp)
}

pub fn show_chart(ui: &mut egui::Ui, model: &ChartModel, zoom: &mut ChartZoomState) {
    ui.vertical_centered(|ui| {
        ui.strong(&model.title);
    });

    let sample_max = model.points.len().saturating_sub(1).max(1) as f64;
    let x_min = sample_max * zoom.x_start / 100.0;
    let x_max = sample_max * zoom.x_end / 100.0;

    let y_span = model.y_zoom.max - model.y_zoom.min;
    let to_axis = |value: f64| {
        if model.log_value_axis {
            log_axis(value)
        } else {
            value
        }
    };
    let y_min = to_axis(model.y_zoom.min + y_span * zoom.y_start / 100.0);
    let y_max = to_axis(model.y_zoom.min + y_span * zoom.y_end / 100.0);

    let timestamps = model.timestamps.clone();
    let log_value_axis = model.log_value_axis;
    let plot = Plot::new(model.metric.label())
        .height(260.0)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            if mark.value < 0.0 {
                return String::new();
            }
            timestamps
                .get(mark.value.round() as usize)
                .map(|timestamp| clock_label(timestamp).to_string())
                .unwrap_or_default()
        })
        .y_axis_formatter(move |mark, _range| {
            if log_value_axis {
                format!("{:.0}", 10f64.powf(mark.value))
            } else {
                format!("{:.0}", mark.value)
            }
        });

    plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

        let points: PlotPoints = model
            .points
            .iter()
            .map(|[x, value]| [*x, to_axis(*value)])
            .collect();
        plot_ui.line(
            Line::new(model.metric.label(), points).color(egui::Color32::from_rgb(94, 156, 255)),
        );

        for marker in model.markers {
            plot_ui.vline(
                VLine::new(marker.event.label(), marker.at as f64)
                    .stroke(egui::Stroke::new(2.0, marker_color(marker.event))),
            );
        }
    });

    ui.horizontal(|ui| {
        ui.small("x zoom");
        ui.add(egui::Slider::new(&mut zoom.x_start, 0.0..=100.0).show_value(false));
        ui.add(egui::Slider::new(&mut zoom.x_end, 0.0..=100.0).show_value(false));
        ui.separator();
        ui.small("y zoom");
        ui.add(egui::Slider::new(&mut zoom.y_start, 0.0..=100.0).show_value(false));
        ui.add(egui::Slider::new(&mut zoom.y_end, 0.0..=100.0).show_value(false));
    });
    if zoom.x_end < zoom.x_start + 1.0 {
        zoom.x_end = (zoom.x_start + 1.0).min(100.0);
        zoom.x_start = zoom.x_end - 1.0;
    }
    if zoom.y_end < zoom.y_start + 1.0 {
        zoom.y_end = (zoom.y_start + 1.0).min(100.0);
        zoom.y_start = zoom.y_end - 1.0;
    }
}
