//! Chart-model construction: one immutable rendering configuration per
//! metric, rebuilt wholesale on every poll.

use crate::domain::{EventState, Metric, ProcessEvent};
use crate::protocol::SensorSnapshot;

/// Span of one zoom slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSlider {
    pub min: f64,
    pub max: f64,
}

/// Vertical marker line at an effective event index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerLine {
    pub event: ProcessEvent,
    pub at: usize,
}

/// Rendering configuration for one metric's series. Never mutated in place;
/// a fresh model replaces the old one each poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub metric: Metric,
    pub title: String,
    /// Category axis labels, one per sample.
    pub timestamps: Vec<String>,
    /// Line series as `[sample index, value]`.
    pub points: Vec<[f64; 2]>,
    pub value_bounds: (f64, f64),
    pub log_value_axis: bool,
    pub markers: [MarkerLine; 3],
    /// Both sliders span the value-axis bounds.
    pub x_zoom: ZoomSlider,
    pub y_zoom: ZoomSlider,
}

pub fn build_chart_model(
    snapshot: &SensorSnapshot,
    events: &EventState,
    metric: Metric,
) -> ChartModel {
    let series = match metric {
        Metric::Temperature => &snapshot.temperature,
        Metric::Resistance => &snapshot.resistance,
    };
    let points = series
        .iter()
        .enumerate()
        .map(|(index, value)| [index as f64, *value])
        .collect();
    let value_bounds = metric.value_bounds();
    let slider = ZoomSlider {
        min: value_bounds.0,
        max: value_bounds.1,
    };
    let markers = ProcessEvent::ALL.map(|event| MarkerLine {
        event,
        at: events.marker_position(event),
    });

    ChartModel {
        metric,
        title: metric.title(),
        timestamps: snapshot.timestamps.clone(),
        points,
        value_bounds,
        log_value_axis: true,
        markers,
        x_zoom: slider,
        y_zoom: slider,
    }
}

/// Both metrics' models plus the events they were built from. Published as
/// a unit so the two charts never disagree on markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPair {
    pub temperature: ChartModel,
    pub resistance: ChartModel,
    pub events: EventState,
}

pub fn build_chart_pair(snapshot: &SensorSnapshot, events: &EventState) -> ChartPair {
    ChartPair {
        temperature: build_chart_model(snapshot, events, Metric::Temperature),
        resistance: build_chart_model(snapshot, events, Metric::Resistance),
        events: *events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_snapshot() -> SensorSnapshot {
        SensorSnapshot {
            timestamps: vec!["t0".into(), "t1".into(), "t2".into()],
            temperature: vec![20.0, 22.0, 25.0],
            resistance: vec![90.0, 95.0, 120.0],
            lamp_off_flag: true,
            lamp_off_index: 1,
            saturation_flag: false,
            saturation_index: 2,
            gel_point_flag: false,
            gel_point_index: 0,
            ..SensorSnapshot::default()
        }
    }

    fn marker_at(model: &ChartModel, event: ProcessEvent) -> usize {
        model
            .markers
            .iter()
            .find(|marker| marker.event == event)
            .expect("marker present")
            .at
    }

    #[test]
    fn models_use_fixed_bounds_per_metric() {
        let snapshot = scenario_snapshot();
        let events = EventState::from_snapshot(&snapshot);
        let temperature = build_chart_model(&snapshot, &events, Metric::Temperature);
        let resistance = build_chart_model(&snapshot, &events, Metric::Resistance);
        assert_eq!(temperature.value_bounds, (15.0, 40.0));
        assert_eq!(resistance.value_bounds, (80.0, 1000.0));
        assert!(temperature.log_value_axis);
        assert!(resistance.log_value_axis);
    }

    #[test]
    fn zoom_sliders_span_the_value_bounds() {
        let snapshot = scenario_snapshot();
        let events = EventState::from_snapshot(&snapshot);
        let model = build_chart_model(&snapshot, &events, Metric::Resistance);
        assert_eq!(model.x_zoom, ZoomSlider { min: 80.0, max: 1000.0 });
        assert_eq!(model.y_zoom, ZoomSlider { min: 80.0, max: 1000.0 });
    }

    #[test]
    fn scenario_places_markers_per_flags() {
        let snapshot = scenario_snapshot();
        let events = EventState::from_snapshot(&snapshot);
        let model = build_chart_model(&snapshot, &events, Metric::Temperature);
        assert_eq!(marker_at(&model, ProcessEvent::LampOff), 1);
        assert_eq!(marker_at(&model, ProcessEvent::Saturation), 0);
        assert_eq!(marker_at(&model, ProcessEvent::GelPoint), 0);
    }

    #[test]
    fn builder_is_deterministic() {
        let snapshot = scenario_snapshot();
        let events = EventState::from_snapshot(&snapshot);
        let first = build_chart_model(&snapshot, &events, Metric::Temperature);
        let second = build_chart_model(&snapshot, &events, Metric::Temperature);
        assert_eq!(first, second);
    }

    #[test]
    fn pair_carries_the_event_state_it_was_built_from() {
        let snapshot = scenario_snapshot();
        let events = EventState::from_snapshot(&snapshot);
        let pair = build_chart_pair(&snapshot, &events);
        assert_eq!(pair.events, events);
        assert_eq!(pair.temperature.markers, pair.resistance.markers);
        assert_eq!(pair.temperature.metric, Metric::Temperature);
        assert_eq!(pair.resistance.metric, Metric::Resistance);
    }

    #[test]
    fn points_bind_sample_index_to_metric_value() {
        let snapshot = scenario_snapshot();
        let events = EventState::from_snapshot(&snapshot);
        let model = build_chart_model(&snapshot, &events, Metric::Resistance);
        assert_eq!(model.points, vec![[0.0, 90.0], [1.0, 95.0], [2.0, 120.0]]);
        assert_eq!(model.timestamps.len(), model.points.len());
    }
}
