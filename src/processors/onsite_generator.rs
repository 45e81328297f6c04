use crate::models::OnsiteRecord;
use crate::utils::constants::ONSITE_RECORD_COUNT;
use chrono::{Duration, NaiveDateTime};

/// Hourly onsite placeholder records.
///
/// Does not read observations: every record carries the fixed values of
/// [`OnsiteRecord::placeholder`]. Only the timestamps advance.
pub struct OnsiteGenerator {
    start: NaiveDateTime,
    count: usize,
}

impl OnsiteGenerator {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            count: ONSITE_RECORD_COUNT,
        }
    }

    pub fn generate(&self) -> Vec<OnsiteRecord> {
        (0..self.count)
            .map(|hour| OnsiteRecord::placeholder(self.start + Duration::hours(hour as i64)))
            .collect()
    }
}
