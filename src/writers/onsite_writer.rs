use crate::error::Result;
use crate::models::OnsiteRecord;
use crate::writers::write_text_file;
use chrono::{Datelike, Timelike};
use std::path::Path;
use tracing::info;

/// Writes onsite records matching the control script's
/// `( 2X,I2,I4,I4,I4 )` and `( 5F10.4 )` formats on a single line.
pub struct OnsiteWriter;

impl OnsiteWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_record(&self, record: &OnsiteRecord) -> String {
        let ts = record.timestamp;
        let mut line = format!(
            "  {:2} {:4} {:4} {:4} {:4}",
            ts.year().rem_euclid(100),
            ts.year(),
            ts.month(),
            ts.day(),
            ts.hour(),
        );
        for value in record.values() {
            line.push_str(&format!("{:10.4}", value));
        }
        line.push('\n');
        line
    }

    pub fn write_records(&self, records: &[OnsiteRecord], path: &Path) -> Result<usize> {
        write_text_file(path, records.iter().map(|r| self.format_record(r)))?;

        info!(path = %path.display(), records = records.len(), "Wrote onsite file");
        Ok(records.len())
    }
}

impl Default for OnsiteWriter {
    fn default() -> Self {
        Self::new()
    }
}
