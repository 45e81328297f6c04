use crate::error::Result;
use crate::models::{LevelObservation, Sounding};
use crate::writers::write_text_file;
use std::path::Path;
use tracing::{debug, info};

/// Writes soundings as FSL-style upper-air blocks: three header lines
/// followed by one line per retained pressure level.
pub struct UpperAirWriter;

impl UpperAirWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, sounding: &Sounding) -> String {
        format!(
            "  {}  {}\n  {}\n  {:6.2} {:6.2}\n",
            sounding.site_id,
            sounding.site_name,
            sounding.timestamp.format("%Y %m %d %H"),
            sounding.latitude,
            sounding.longitude,
        )
    }

    pub fn format_level(&self, level: &LevelObservation) -> String {
        format!(
            "{:7} {:7} {:7.1} {:6} {:6.1}\n",
            level.pressure_hpa, level.height_m, level.temp_c, level.wind_dir_deg, level.wind_speed,
        )
    }

    pub fn format_sounding(&self, sounding: &Sounding) -> String {
        let mut block = self.format_header(sounding);
        for level in &sounding.levels {
            block.push_str(&self.format_level(level));
        }
        block
    }

    /// Write every non-empty sounding, replacing any existing file.
    /// Returns the number of soundings written.
    pub fn write_soundings(&self, soundings: &[Sounding], path: &Path) -> Result<usize> {
        let written: Vec<&Sounding> = soundings.iter().filter(|s| !s.is_empty()).collect();
        if written.len() < soundings.len() {
            debug!(
                skipped = soundings.len() - written.len(),
                "Skipping soundings without mandatory levels"
            );
        }

        write_text_file(path, written.iter().map(|s| self.format_sounding(s)))?;

        info!(path = %path.display(), soundings = written.len(), "Wrote FSL upper-air file");
        Ok(written.len())
    }
}

impl Default for UpperAirWriter {
    fn default() -> Self {
        Self::new()
    }
}
