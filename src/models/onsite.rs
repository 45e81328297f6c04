use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Site id the onsite path is registered under in the control script
pub const ONSITE_SITE_ID: &str = "000001";

/// One hourly onsite record.
///
/// Only the timestamp varies; the meteorological fields are fixed
/// placeholders (10 m, 180°, 5 m/s, σθ 180°, 15 °C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnsiteRecord {
    pub timestamp: NaiveDateTime,
    pub height_m: f64,
    pub wind_dir_deg: f64,
    pub wind_speed_ms: f64,
    pub std_dev_deg: f64,
    pub temperature_c: f64,
}

impl OnsiteRecord {
    pub fn placeholder(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            height_m: 10.0,
            wind_dir_deg: 180.0,
            wind_speed_ms: 5.0,
            std_dev_deg: 180.0,
            temperature_c: 15.0,
        }
    }

    /// Values in HT01 WD01 WS01 SA01 TT01 order
    pub fn values(&self) -> [f64; 5] {
        [
            self.height_m,
            self.wind_dir_deg,
            self.wind_speed_ms,
            self.std_dev_deg,
            self.temperature_c,
        ]
    }
}
