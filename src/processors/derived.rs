//! Unit conversions and derived quantities for the AERMET input formats.
//!
//! All functions are pure and propagate NaN; callers decide what happens
//! to non-finite results through [`NumericGuard`].

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEWPOINT_DEPRESSION_F, KELVIN_OFFSET, MS_TO_KNOTS, STANDARD_GRAVITY,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0
}

/// Whole degrees Fahrenheit, ties rounded to even.
pub fn fahrenheit_rounded(kelvin: f64) -> f64 {
    kelvin_to_fahrenheit(kelvin).round_ties_even()
}

/// Dewpoint stand-in: a fixed 10 °F depression below air temperature.
/// Not a physical dewpoint; kept for compatibility with existing files.
pub fn approximate_dewpoint_f(temp_f: f64) -> f64 {
    temp_f - DEWPOINT_DEPRESSION_F
}

pub fn wind_speed(u: f64, v: f64) -> f64 {
    (u * u + v * v).sqrt()
}

pub fn ms_to_knots(speed: f64) -> f64 {
    speed * MS_TO_KNOTS
}

/// Meteorological wind direction: degrees clockwise from north the wind
/// blows from, in [0, 360).
pub fn wind_direction(u: f64, v: f64) -> f64 {
    (180.0 + u.atan2(v).to_degrees()).rem_euclid(360.0)
}

pub fn geopotential_height(geopotential: f64) -> f64 {
    geopotential / STANDARD_GRAVITY
}

pub fn pascal_to_hpa(pressure: f64) -> f64 {
    pressure / 100.0
}

/// What to do when a derived quantity is NaN or infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Write 0 in place of the value. Lossy: a missing cell becomes a
    /// plausible-looking observation. Every substitution is logged.
    #[default]
    SubstituteZero,
    /// Fail the encoder with [`ProcessingError::NonFinite`].
    Reject,
}

impl NonFinitePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "substitute_zero" | "zero" => Some(NonFinitePolicy::SubstituteZero),
            "reject" => Some(NonFinitePolicy::Reject),
            _ => None,
        }
    }
}

/// Applies a [`NonFinitePolicy`] and counts the fallbacks taken.
#[derive(Debug, Clone)]
pub struct NumericGuard {
    policy: NonFinitePolicy,
    fallbacks: usize,
}

impl NumericGuard {
    pub fn new(policy: NonFinitePolicy) -> Self {
        Self {
            policy,
            fallbacks: 0,
        }
    }

    pub fn check(&mut self, value: f64, field: &str, timestamp: NaiveDateTime) -> Result<f64> {
        if value.is_finite() {
            return Ok(value);
        }

        match self.policy {
            NonFinitePolicy::SubstituteZero => {
                self.fallbacks += 1;
                warn!(
                    field,
                    %timestamp,
                    value = %value,
                    "Non-finite value replaced by 0"
                );
                Ok(0.0)
            }
            NonFinitePolicy::Reject => Err(ProcessingError::NonFinite {
                field: field.to_string(),
                timestamp: timestamp.to_string(),
            }),
        }
    }

    /// Number of values replaced by zero so far
    pub fn fallback_count(&self) -> usize {
        self.fallbacks
    }
}

impl Default for NumericGuard {
    fn default() -> Self {
        Self::new(NonFinitePolicy::default())
    }
}
