use crate::error::{ProcessingError, Result};
use crate::processors::NonFinitePolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Environment variable prefix for configuration overrides,
/// e.g. `ERA5_AERMET__SITE__LATITUDE=49.6`.
pub const ENV_PREFIX: &str = "ERA5_AERMET";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SiteConfig {
    #[validate(length(min = 1, max = 8))]
    pub id: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 360.0))]
    pub longitude: f64,

    #[serde(default)]
    pub elevation: f64,
}

impl SiteConfig {
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            elevation,
        }
    }

    /// Station name as printed in upper-air sounding headers
    pub fn header_name(&self) -> String {
        self.name.to_uppercase()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub surface: Option<PathBuf>,
    pub upper_air: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Prefix for generated files; defaults to the lowercased site name
    pub prefix: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            prefix: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Everything a conversion run needs. Passed explicitly into every stage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConversionConfig {
    #[validate(nested)]
    pub site: SiteConfig,

    pub period: PeriodConfig,

    #[serde(default)]
    pub inputs: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub non_finite: NonFinitePolicy,

    /// Stable-sort extracted rows by timestamp before encoding
    #[serde(default)]
    pub sort_chronologically: bool,
}

impl ConversionConfig {
    pub fn new(site: SiteConfig, period: PeriodConfig) -> Self {
        Self {
            site,
            period,
            inputs: InputConfig::default(),
            output: OutputConfig::default(),
            non_finite: NonFinitePolicy::default(),
            sort_chronologically: false,
        }
    }

    /// Load from a TOML/YAML/JSON file, layered with `ERA5_AERMET__*`
    /// environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    // Env values stay strings until deserialized so ids like `000123`
    // keep their leading zeros; numeric fields still parse from them.
    pub(crate) fn load_with_env_prefix(path: &Path, prefix: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .add_source(config::Environment::with_prefix(prefix).separator("__"))
            .build()?;

        let config: ConversionConfig = settings.try_deserialize()?;
        config.validate_all()?;
        Ok(config)
    }

    pub fn with_inputs(mut self, surface: Option<PathBuf>, upper_air: Option<PathBuf>) -> Self {
        self.inputs = InputConfig { surface, upper_air };
        self
    }

    pub fn with_output_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = directory.into();
        self
    }

    pub fn with_non_finite_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    /// Field-level validation plus cross-field checks
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;

        if self.period.start > self.period.end {
            return Err(ProcessingError::Config(format!(
                "Period start {} is after end {}",
                self.period.start, self.period.end
            )));
        }

        if self.site.id.contains(char::is_whitespace) {
            return Err(ProcessingError::Config(format!(
                "Site id '{}' must not contain whitespace",
                self.site.id
            )));
        }

        Ok(())
    }

    pub fn file_prefix(&self) -> String {
        match &self.output.prefix {
            Some(prefix) if !prefix.is_empty() => prefix.clone(),
            _ => self.site.name.to_lowercase().replace(' ', "_"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ternopil() -> ConversionConfig {
        ConversionConfig::new(
            SiteConfig::new("999999", "Ternopil", 49.55, 25.60, 324.0),
            PeriodConfig {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            },
        )
    }

    #[test]
    fn test_valid_config() {
        let config = ternopil();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.file_prefix(), "ternopil");
        assert_eq!(config.site.header_name(), "TERNOPIL");
    }

    #[test]
    fn test_invalid_latitude() {
        let mut config = ternopil();
        config.site.latitude = 91.0;
        assert!(matches!(
            config.validate_all(),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_reversed_period() {
        let mut config = ternopil();
        config.period.start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(matches!(config.validate_all(), Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_explicit_prefix() {
        let mut config = ternopil();
        config.output.prefix = Some("tp".to_string());
        assert_eq!(config.file_prefix(), "tp");
    }

    #[test]
    fn test_load_toml() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            r#"
[site]
id = "999999"
name = "Ternopil"
latitude = 49.55
longitude = 25.60
elevation = 324.0

[period]
start = "2025-01-01"
end = "2025-01-02"

[inputs]
surface = "era5_surface.nc"

[output]
directory = "out"
"#
        )?;

        let config = ConversionConfig::load(file.path())?;
        assert_eq!(config.site.id, "999999");
        assert_eq!(config.period.end, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(config.inputs.surface, Some(PathBuf::from("era5_surface.nc")));
        assert!(config.inputs.upper_air.is_none());
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.non_finite, NonFinitePolicy::SubstituteZero);
        Ok(())
    }

    #[test]
    fn test_env_override_keeps_leading_zeros() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            r#"
[site]
id = "999999"
name = "Ternopil"
latitude = 49.55
longitude = 25.60
elevation = 324.0

[period]
start = "2025-01-01"
end = "2025-01-02"
"#
        )?;

        // Prefix used by this test only
        let prefix = "ERA5_AERMET_ENVTEST";
        std::env::set_var(format!("{}__SITE__ID", prefix), "000123");
        std::env::set_var(format!("{}__SITE__ELEVATION", prefix), "330");
        let result = ConversionConfig::load_with_env_prefix(file.path(), prefix);
        std::env::remove_var(format!("{}__SITE__ID", prefix));
        std::env::remove_var(format!("{}__SITE__ELEVATION", prefix));

        let config = result?;
        assert_eq!(config.site.id, "000123");
        assert_eq!(config.site.elevation, 330.0);
        assert_eq!(config.site.name, "Ternopil");
        Ok(())
    }

    #[test]
    fn test_load_missing_section() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("toml");
        std::fs::write(&path, "[site]\nid = \"1\"\n").unwrap();
        let result = ConversionConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
