//! Decoding of CF-convention time coordinates
//! (`"hours since 1900-01-01 00:00:00.0"`, `"seconds since 1970-01-01"`).

use crate::error::{ProcessingError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    seconds_per_unit: i64,
    epoch: NaiveDateTime,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self> {
        let (unit, base) = units.split_once(" since ").ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Unsupported time units: '{}'", units))
        })?;

        let seconds_per_unit = match unit.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "s" => 1,
            "minutes" | "minute" | "mins" => 60,
            "hours" | "hour" | "hrs" | "h" => 3600,
            "days" | "day" | "d" => 86400,
            other => {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Unsupported time unit: '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            seconds_per_unit,
            epoch: parse_epoch(base.trim())?,
        })
    }

    pub fn decode(&self, value: f64) -> Result<NaiveDateTime> {
        if !value.is_finite() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Non-finite time value: {}",
                value
            )));
        }
        let seconds = (value * self.seconds_per_unit as f64).round() as i64;
        Ok(self.epoch + Duration::seconds(seconds))
    }

    pub fn decode_all(&self, values: &[f64]) -> Result<Vec<NaiveDateTime>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

fn parse_epoch(base: &str) -> Result<NaiveDateTime> {
    // Drop fractional seconds and a trailing timezone designator
    let base = base.trim_end_matches('Z').trim_end_matches(" UTC");
    let base = match base.split_once('.') {
        Some((whole, _)) => whole,
        None => base,
    };

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(epoch) = NaiveDateTime::parse_from_str(base, format) {
            return Ok(epoch);
        }
    }

    let date = NaiveDate::parse_from_str(base, "%Y-%m-%d")?;
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid epoch: '{}'", base)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymdh(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_seconds_since_unix_epoch() {
        let units = TimeUnits::parse("seconds since 1970-01-01").unwrap();
        assert_eq!(units.decode(1735689600.0).unwrap(), ymdh(2025, 1, 1, 0));
        assert_eq!(units.decode(1735693200.0).unwrap(), ymdh(2025, 1, 1, 1));
    }

    #[test]
    fn test_hours_since_1900() {
        let units = TimeUnits::parse("hours since 1900-01-01 00:00:00.0").unwrap();
        // 2025-01-01 00:00 is 45656 days after 1900-01-01
        assert_eq!(units.decode(45656.0 * 24.0).unwrap(), ymdh(2025, 1, 1, 0));
    }

    #[test]
    fn test_decode_all() {
        let units = TimeUnits::parse("days since 2024-12-31").unwrap();
        let times = units.decode_all(&[0.0, 1.0]).unwrap();
        assert_eq!(times, vec![ymdh(2024, 12, 31, 0), ymdh(2025, 1, 1, 0)]);
    }

    #[test]
    fn test_invalid_units() {
        assert!(TimeUnits::parse("fortnights since 2000-01-01").is_err());
        assert!(TimeUnits::parse("hours").is_err());
        assert!(TimeUnits::parse("hours since yesterday").is_err());
    }
}
