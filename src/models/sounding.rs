use crate::utils::constants::SOUNDING_LEVELS_HPA;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Observation at a single mandatory pressure level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObservation {
    pub pressure_hpa: i32,
    pub height_m: i32,
    pub temp_c: f64,
    pub wind_dir_deg: i32,
    pub wind_speed: f64,
}

impl LevelObservation {
    pub fn is_mandatory_level(level: f64) -> bool {
        SOUNDING_LEVELS_HPA.iter().any(|&allowed| allowed as f64 == level)
    }
}

/// Upper-air sounding: all retained levels sharing one timestamp, in
/// input row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sounding {
    pub site_id: String,
    pub site_name: String,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub levels: Vec<LevelObservation>,
}

impl Sounding {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn pressure_levels(&self) -> Vec<i32> {
        self.levels.iter().map(|l| l.pressure_hpa).collect()
    }
}
