use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Cannot open dataset '{}': {}", path.display(), attempts.join("; "))]
    DataSource {
        path: PathBuf,
        attempts: Vec<String>,
    },

    #[error("Missing required field: {0}")]
    Schema(String),

    #[error("Non-finite value for '{field}' at {timestamp}")]
    NonFinite { field: String, timestamp: String },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProcessingError::Write {
            path: path.into(),
            source,
        }
    }

    pub fn data_source(path: impl Into<PathBuf>, attempt: impl Into<String>) -> Self {
        ProcessingError::DataSource {
            path: path.into(),
            attempts: vec![attempt.into()],
        }
    }
}
