use serde::{Deserialize, Serialize};

use crate::error::SnapshotShapeError;

/// One polled payload from `GET /api/get_data`.
///
/// Field names follow the backend wire format. The backend serializes the
/// event flags as 0/1 integers; the `flag` helper accepts those as well as
/// real booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    #[serde(rename = "stored_time")]
    pub timestamps: Vec<String>,
    #[serde(rename = "stored_temperature")]
    pub temperature: Vec<f64>,
    #[serde(rename = "stored_resistance")]
    pub resistance: Vec<f64>,
    #[serde(rename = "lamp_turn_off_flag", with = "flag")]
    pub lamp_off_flag: bool,
    #[serde(rename = "lamp_turn_off_index")]
    pub lamp_off_index: i64,
    #[serde(with = "flag")]
    pub saturation_flag: bool,
    pub saturation_index: i64,
    #[serde(with = "flag")]
    pub gel_point_flag: bool,
    #[serde(rename = "geling_point_index")]
    pub gel_point_index: i64,
    /// Lead index the backend derives alongside lamp-off; not charted.
    #[serde(rename = "two_mins_earlier_lamp_turn_off_index", default)]
    pub lamp_off_lead_index: i64,
    /// Denoised resistance the backend runs event detection on; not charted.
    #[serde(rename = "moving_average_resistance", default)]
    pub resistance_moving_average: Vec<f64>,
    #[serde(rename = "slopes", default)]
    pub resistance_slopes: Vec<f64>,
}

impl SensorSnapshot {
    /// Number of samples across the aligned series.
    pub fn sample_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The three primary series must share one length.
    pub fn validate(&self) -> Result<(), SnapshotShapeError> {
        if self.temperature.len() != self.timestamps.len()
            || self.resistance.len() != self.timestamps.len()
        {
            return Err(SnapshotShapeError {
                timestamps: self.timestamps.len(),
                temperature: self.temperature.len(),
                resistance: self.resistance.len(),
            });
        }
        Ok(())
    }
}

mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match BoolOrInt::deserialize(deserializer)? {
            BoolOrInt::Bool(value) => value,
            BoolOrInt::Int(value) => value != 0,
        })
    }
}
