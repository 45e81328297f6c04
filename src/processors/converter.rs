use crate::archive::ArchiveUnpacker;
use crate::error::{ProcessingError, Result};
use crate::models::{ControlFileSpec, ConversionConfig, PointTable};
use crate::processors::{OnsiteGenerator, SoundingProcessor, SurfaceProcessor};
use crate::readers::{default_openers, extract_point, open_dataset, DatasetOpener};
use crate::utils::filename::OutputPaths;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ControlFileWriter, OnsiteWriter, SurfaceWriter, UpperAirWriter};
use std::path::{Path, PathBuf};
use tracing::info;

const STAGE_COUNT: u64 = 4;

/// Counts and paths from a full conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub paths: OutputPaths,
    pub surface_records: usize,
    pub soundings: usize,
    pub upper_timestamps: usize,
    pub onsite_records: usize,
    pub numeric_fallbacks: usize,
}

impl ConversionSummary {
    pub fn summary(&self) -> String {
        format!(
            "Surface: {} records -> {}\n\
             Upper air: {} soundings ({} timestamps) -> {}\n\
             Onsite: {} records -> {}\n\
             Control: {}\n\
             Non-finite values replaced: {}",
            self.surface_records,
            self.paths.surface.display(),
            self.soundings,
            self.upper_timestamps,
            self.paths.upper_air.display(),
            self.onsite_records,
            self.paths.onsite.display(),
            self.paths.control.display(),
            self.numeric_fallbacks,
        )
    }
}

/// Runs the stage-1 conversion for one site: surface, upper air, onsite
/// and control file, in that order.
pub struct Converter {
    config: ConversionConfig,
    paths: OutputPaths,
    openers: Vec<Box<dyn DatasetOpener>>,
    unpacker: Option<ArchiveUnpacker>,
    silent: bool,
    upper_timestamps: usize,
    numeric_fallbacks: usize,
}

impl Converter {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate_all()?;
        let paths = OutputPaths::for_config(&config);

        Ok(Self {
            config,
            paths,
            openers: default_openers(),
            unpacker: None,
            silent: false,
            upper_timestamps: 0,
            numeric_fallbacks: 0,
        })
    }

    pub fn with_openers(mut self, openers: Vec<Box<dyn DatasetOpener>>) -> Self {
        self.openers = openers;
        self
    }

    /// Extract zipped inputs into `dir` instead of a temporary directory
    pub fn with_extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.unpacker = Some(ArchiveUnpacker::with_destination(dir));
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    pub fn numeric_fallbacks(&self) -> usize {
        self.numeric_fallbacks
    }

    /// Run all four stages. The first failing stage aborts the run; files
    /// from earlier stages are kept.
    pub fn run(&mut self) -> Result<ConversionSummary> {
        let progress = ProgressReporter::new(STAGE_COUNT, "Converting ERA5 data", self.silent);
        info!(
            site = %self.config.site.id,
            name = %self.config.site.name,
            start = %self.config.period.start,
            end = %self.config.period.end,
            "Starting AERMET stage 1 conversion"
        );

        progress.start_stage(1, "Surface CD144");
        let surface_records = self.surface()?;
        progress.finish_stage(&format!(
            "Surface: {} ({} records)",
            self.paths.surface.display(),
            surface_records
        ));

        progress.start_stage(2, "Upper air FSL");
        let soundings = self.upper_air()?;
        progress.finish_stage(&format!(
            "Upper air: {} ({} soundings)",
            self.paths.upper_air.display(),
            soundings
        ));

        progress.start_stage(3, "Onsite");
        let onsite_records = self.onsite()?;
        progress.finish_stage(&format!(
            "Onsite: {} ({} records)",
            self.paths.onsite.display(),
            onsite_records
        ));

        progress.start_stage(4, "AERMET control file");
        self.control()?;
        progress.finish_stage(&format!("INP: {}", self.paths.control.display()));

        progress.finish_with_message("Conversion complete");

        Ok(ConversionSummary {
            paths: self.paths.clone(),
            surface_records,
            soundings,
            upper_timestamps: self.upper_timestamps,
            onsite_records,
            numeric_fallbacks: self.numeric_fallbacks,
        })
    }

    /// Surface stage; returns the number of CD144 records written.
    pub fn surface(&mut self) -> Result<usize> {
        let input = self.required_input(self.config.inputs.surface.clone(), "surface")?;
        let table = self.load_point_table(&input)?;

        let mut processor =
            SurfaceProcessor::new(&self.config.site.id).with_policy(self.config.non_finite);
        let records = processor.process(&table)?;
        self.numeric_fallbacks += processor.fallback_count();

        self.ensure_output_dir()?;
        SurfaceWriter::new().write_records(&records, &self.paths.surface)
    }

    /// Upper-air stage; returns the number of soundings written.
    pub fn upper_air(&mut self) -> Result<usize> {
        let input = self.required_input(self.config.inputs.upper_air.clone(), "upper_air")?;
        let table = self.load_point_table(&input)?;

        let mut processor =
            SoundingProcessor::new(&self.config.site).with_policy(self.config.non_finite);
        let soundings = processor.process(&table)?;
        self.upper_timestamps = processor.timestamps_seen();
        self.numeric_fallbacks += processor.fallback_count();

        self.ensure_output_dir()?;
        UpperAirWriter::new().write_soundings(&soundings, &self.paths.upper_air)
    }

    /// Onsite stage: 48 hourly placeholder records from midnight of the
    /// period start.
    pub fn onsite(&mut self) -> Result<usize> {
        let start = self.config.period.start.and_hms_opt(0, 0, 0).ok_or_else(|| {
            ProcessingError::Config(format!("Invalid start date {}", self.config.period.start))
        })?;
        let records = OnsiteGenerator::new(start).generate();

        self.ensure_output_dir()?;
        OnsiteWriter::new().write_records(&records, &self.paths.onsite)
    }

    /// Control stage. Only file names are referenced, so it can run
    /// before or without the data stages.
    pub fn control(&mut self) -> Result<()> {
        let spec = ControlFileSpec::from_config(
            &self.config,
            &self.paths.surface,
            &self.paths.upper_air,
            &self.paths.onsite,
        );

        self.ensure_output_dir()?;
        ControlFileWriter::new().write(&spec, &self.paths.control)
    }

    fn required_input(&self, input: Option<PathBuf>, name: &str) -> Result<PathBuf> {
        input.ok_or_else(|| ProcessingError::Config(format!("No {} input configured", name)))
    }

    fn load_point_table(&mut self, input: &Path) -> Result<PointTable> {
        let unpacker = match self.unpacker.take() {
            Some(unpacker) => unpacker,
            None => ArchiveUnpacker::new()?,
        };
        let unpacker = self.unpacker.insert(unpacker);
        let data_path = unpacker.unpack_if_zip(input)?;

        let dataset = open_dataset(&data_path, &self.openers)?;
        let table = extract_point(
            dataset.as_ref(),
            self.config.site.latitude,
            self.config.site.longitude,
        )?;

        if self.config.sort_chronologically {
            Ok(table.sorted_by_time())
        } else {
            Ok(table)
        }
    }

    fn ensure_output_dir(&self) -> Result<()> {
        let dir = &self.config.output.directory;
        std::fs::create_dir_all(dir).map_err(|e| ProcessingError::write(dir, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodConfig, SiteConfig};
    use crate::processors::NonFinitePolicy;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn config(dir: &Path) -> ConversionConfig {
        ConversionConfig::new(
            SiteConfig::new("999999", "Ternopil", 49.55, 25.60, 324.0),
            PeriodConfig {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            },
        )
        .with_output_dir(dir.join("out"))
    }

    fn write_file(path: &Path, content: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_surface_stage() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("surface.csv");
        write_file(
            &input,
            "valid_time,latitude,longitude,t2m,u10,v10\n\
             2025-01-01 00:00:00,49.5,25.5,273.15,0.0,-1.0\n\
             2025-01-01 01:00:00,49.5,25.5,,0.0,-1.0\n",
        );

        let mut converter = Converter::new(config(dir.path()).with_inputs(Some(input), None))
            .unwrap()
            .silent(true);

        assert_eq!(converter.surface().unwrap(), 2);
        assert_eq!(converter.numeric_fallbacks(), 2);

        let content = std::fs::read_to_string(&converter.paths().surface).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "999999 250101 0000  32  22   0   2 5 10 00");
        assert_eq!(lines[1], "999999 250101 0100   0   0   0   2 5 10 00");
    }

    #[test]
    fn test_reject_policy_fails_surface_stage() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("surface.csv");
        write_file(
            &input,
            "valid_time,latitude,longitude,t2m,u10,v10\n\
             2025-01-01 00:00:00,49.5,25.5,,1.0,1.0\n",
        );

        let config = config(dir.path())
            .with_inputs(Some(input), None)
            .with_non_finite_policy(NonFinitePolicy::Reject);
        let mut converter = Converter::new(config).unwrap().silent(true);

        assert!(matches!(
            converter.surface(),
            Err(ProcessingError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_missing_input_is_config_error() {
        let dir = TempDir::new().unwrap();
        let mut converter = Converter::new(config(dir.path())).unwrap().silent(true);
        assert!(matches!(converter.upper_air(), Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_control_and_onsite_need_no_inputs() {
        let dir = TempDir::new().unwrap();
        let mut converter = Converter::new(config(dir.path())).unwrap().silent(true);

        assert_eq!(converter.onsite().unwrap(), 48);
        converter.control().unwrap();

        let control = std::fs::read_to_string(&converter.paths().control).unwrap();
        assert!(control.contains("  data      ternopil_upper.fsl  fsl\n"));
        assert!(control.contains("   data      ternopil_surface.dat  CD144\n"));
        assert!(control.contains("  data      ternopil_onsite.dat\n"));
    }

    #[test]
    fn test_invalid_period_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.period.end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(Converter::new(config).is_err());
    }
}
