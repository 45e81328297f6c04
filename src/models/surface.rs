use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sky cover placeholder written to every CD144 line
pub const SKY_CODE: &str = "5";
/// Visibility placeholder written to every CD144 line
pub const VISIBILITY_CODE: &str = "10";
/// Present weather placeholder written to every CD144 line
pub const WEATHER_CODE: &str = "00";

/// One hourly surface observation in CD144 units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub site_id: String,
    pub timestamp: NaiveDateTime,
    pub temp_f: i32,
    pub dewpt_f: i32,
    pub wind_dir_deg: i32,
    pub wind_speed_kt: i32,
}

impl SurfaceRecord {
    pub fn new(
        site_id: &str,
        timestamp: NaiveDateTime,
        temp_f: i32,
        dewpt_f: i32,
        wind_dir_deg: i32,
        wind_speed_kt: i32,
    ) -> Self {
        Self {
            site_id: site_id.to_string(),
            timestamp,
            temp_f,
            dewpt_f,
            wind_dir_deg,
            wind_speed_kt,
        }
    }

    pub fn sky_code(&self) -> &'static str {
        SKY_CODE
    }

    pub fn visibility_code(&self) -> &'static str {
        VISIBILITY_CODE
    }

    pub fn weather_code(&self) -> &'static str {
        WEATHER_CODE
    }
}
