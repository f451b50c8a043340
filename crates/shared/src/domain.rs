use serde::{Deserialize, Serialize};

use crate::protocol::SensorSnapshot;

/// A charted metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Resistance,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Temperature, Metric::Resistance];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Resistance => "resistance",
        }
    }

    /// Chart title: the metric name upper-cased.
    pub fn title(self) -> String {
        self.label().to_uppercase()
    }

    /// Fixed value-axis bounds per metric.
    pub fn value_bounds(self) -> (f64, f64) {
        match self {
            Metric::Temperature => (15.0, 40.0),
            Metric::Resistance => (80.0, 1000.0),
        }
    }
}

/// A process milestone the backend detects on the resistance curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessEvent {
    GelPoint,
    LampOff,
    Saturation,
}

impl ProcessEvent {
    /// Marker order on the charts: gel, lamp, saturation.
    pub const ALL: [ProcessEvent; 3] = [
        ProcessEvent::GelPoint,
        ProcessEvent::LampOff,
        ProcessEvent::Saturation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProcessEvent::GelPoint => "gel point",
            ProcessEvent::LampOff => "lamp off",
            ProcessEvent::Saturation => "saturation",
        }
    }

    /// Fixed marker colors: gel blue, lamp red, saturation black.
    pub fn marker_rgb(self) -> (u8, u8, u8) {
        match self {
            ProcessEvent::GelPoint => (0, 0, 255),
            ProcessEvent::LampOff => (255, 0, 0),
            ProcessEvent::Saturation => (0, 0, 0),
        }
    }
}

/// Event flags and effective marker indices extracted from one snapshot.
///
/// Extraction is pure and total. A false flag forces its paired index to 0
/// regardless of the raw wire value — the backend can send stale indices
/// before detection — and a negative raw index clamps to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventState {
    pub gel_point: bool,
    pub lamp_off: bool,
    pub saturation: bool,
    pub gel_point_index: usize,
    pub lamp_off_index: usize,
    pub saturation_index: usize,
}

impl EventState {
    pub fn from_snapshot(snapshot: &SensorSnapshot) -> Self {
        fn effective(flagged: bool, raw: i64) -> usize {
            if flagged {
                raw.max(0) as usize
            } else {
                0
            }
        }

        Self {
            gel_point: snapshot.gel_point_flag,
            lamp_off: snapshot.lamp_off_flag,
            saturation: snapshot.saturation_flag,
            gel_point_index: effective(snapshot.gel_point_flag, snapshot.gel_point_index),
            lamp_off_index: effective(snapshot.lamp_off_flag, snapshot.lamp_off_index),
            saturation_index: effective(snapshot.saturation_flag, snapshot.saturation_index),
        }
    }

    pub fn is_flagged(&self, event: ProcessEvent) -> bool {
        match event {
            ProcessEvent::GelPoint => self.gel_point,
            ProcessEvent::LampOff => self.lamp_off,
            ProcessEvent::Saturation => self.saturation,
        }
    }

    /// Marker x-position for the event, already defaulted per the flag.
    pub fn marker_position(&self, event: ProcessEvent) -> usize {
        match event {
            ProcessEvent::GelPoint => self.gel_point_index,
            ProcessEvent::LampOff => self.lamp_off_index,
            ProcessEvent::Saturation => self.saturation_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SensorSnapshot {
        SensorSnapshot {
            timestamps: vec!["t0".into(), "t1".into(), "t2".into()],
            temperature: vec![20.0, 22.0, 25.0],
            resistance: vec![90.0, 95.0, 120.0],
            ..SensorSnapshot::default()
        }
    }

    #[test]
    fn false_flag_forces_index_to_zero() {
        let mut raw = snapshot();
        raw.saturation_flag = false;
        raw.saturation_index = 2;
        let events = EventState::from_snapshot(&raw);
        assert_eq!(events.marker_position(ProcessEvent::Saturation), 0);
    }

    #[test]
    fn true_flag_passes_index_through_exactly() {
        let mut raw = snapshot();
        raw.lamp_off_flag = true;
        raw.lamp_off_index = 1;
        let events = EventState::from_snapshot(&raw);
        assert!(events.is_flagged(ProcessEvent::LampOff));
        assert_eq!(events.marker_position(ProcessEvent::LampOff), 1);
    }

    #[test]
    fn negative_raw_index_clamps_to_zero() {
        let mut raw = snapshot();
        raw.gel_point_flag = true;
        raw.gel_point_index = -4;
        let events = EventState::from_snapshot(&raw);
        assert_eq!(events.marker_position(ProcessEvent::GelPoint), 0);
    }

    #[test]
    fn metric_bounds_and_titles_are_fixed() {
        assert_eq!(Metric::Temperature.value_bounds(), (15.0, 40.0));
        assert_eq!(Metric::Resistance.value_bounds(), (80.0, 1000.0));
        assert_eq!(Metric::Temperature.title(), "TEMPERATURE");
        assert_eq!(Metric::Resistance.title(), "RESISTANCE");
    }

    #[test]
    fn marker_colors_are_fixed() {
        assert_eq!(ProcessEvent::GelPoint.marker_rgb(), (0, 0, 255));
        assert_eq!(ProcessEvent::LampOff.marker_rgb(), (255, 0, 0));
        assert_eq!(ProcessEvent::Saturation.marker_rgb(), (0, 0, 0));
    }
}
