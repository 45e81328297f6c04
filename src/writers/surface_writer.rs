use crate::error::Result;
use crate::models::SurfaceRecord;
use crate::writers::write_text_file;
use std::path::Path;
use tracing::info;

/// Writes hourly surface observations in the CD144 card layout.
pub struct SurfaceWriter;

impl SurfaceWriter {
    pub fn new() -> Self {
        Self
    }

    /// One CD144 line (with trailing newline).
    ///
    /// The site id is left-justified to five columns and never truncated.
    pub fn format_record(&self, record: &SurfaceRecord) -> String {
        format!(
            "{:<5} {} {} {:>3} {:>3} {:>3} {:>3} {} {} {}\n",
            record.site_id,
            record.timestamp.format("%y%m%d"),
            record.timestamp.format("%H%M"),
            record.temp_f,
            record.dewpt_f,
            record.wind_dir_deg,
            record.wind_speed_kt,
            record.sky_code(),
            record.visibility_code(),
            record.weather_code(),
        )
    }

    /// Write records in the given order, replacing any existing file.
    /// Returns the number of lines written.
    pub fn write_records(&self, records: &[SurfaceRecord], path: &Path) -> Result<usize> {
        write_text_file(path, records.iter().map(|r| self.format_record(r)))?;

        info!(path = %path.display(), records = records.len(), "Wrote CD144 surface file");
        Ok(records.len())
    }
}

impl Default for SurfaceWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_record_layout() {
        let record = SurfaceRecord::new("99999", at(6), 28, 18, 225, 7);
        assert_eq!(
            SurfaceWriter::new().format_record(&record),
            "99999 250101 0600  28  18 225   7 5 10 00\n"
        );
    }

    #[test]
    fn test_short_site_id_is_padded() {
        let record = SurfaceRecord::new("123", at(23), -4, -14, 0, 12);
        assert_eq!(
            SurfaceWriter::new().format_record(&record),
            "123   250101 2300  -4 -14   0  12 5 10 00\n"
        );
    }

    #[test]
    fn test_long_site_id_is_not_truncated() {
        let record = SurfaceRecord::new("999999", at(0), 30, 20, 90, 3);
        let line = SurfaceWriter::new().format_record(&record);
        assert!(line.starts_with("999999 250101 0000"));
    }

    #[test]
    fn test_write_records_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site_surface.dat");
        let records = vec![
            SurfaceRecord::new("99999", at(0), 30, 20, 180, 5),
            SurfaceRecord::new("99999", at(1), 31, 21, 190, 6),
        ];

        let writer = SurfaceWriter::new();
        assert_eq!(writer.write_records(&records, &path).unwrap(), 2);
        let first = std::fs::read(&path).unwrap();
        writer.write_records(&records, &path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            "99999 250101 0000  30  20 180   5 5 10 00\n\
             99999 250101 0100  31  21 190   6 5 10 00\n"
        );
    }

    #[test]
    fn test_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("surface.dat");
        let result = SurfaceWriter::new().write_records(&[], &path);
        assert!(matches!(
            result,
            Err(crate::error::ProcessingError::Write { .. })
        ));
    }
}
