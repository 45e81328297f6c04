use crate::error::{ProcessingError, Result};
use crate::models::PointTable;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, info};

/// A gridded dataset that can be queried at a single grid point.
pub trait GriddedDataset {
    fn latitudes(&self) -> &[f64];

    fn longitudes(&self) -> &[f64];

    /// All rows at grid cell (`lat_index`, `lon_index`), time-major then
    /// level, with one column per variable and the level coordinate.
    fn select_point(&self, lat_index: usize, lon_index: usize) -> Result<PointTable>;

    fn variable_names(&self) -> Vec<String>;
}

/// One way of opening a dataset file.
pub trait DatasetOpener {
    fn name(&self) -> &'static str;

    fn open(&self, path: &Path) -> Result<Box<dyn GriddedDataset>>;
}

/// Openers tried by [`open_dataset`] when the caller has no preference.
pub fn default_openers() -> Vec<Box<dyn DatasetOpener>> {
    let mut openers: Vec<Box<dyn DatasetOpener>> = Vec::new();
    #[cfg(feature = "netcdf")]
    openers.push(Box::new(crate::readers::NetcdfOpener));
    openers.push(Box::new(crate::readers::CsvTableOpener::new()));
    openers
}

/// Try each opener in order; first success wins. When all fail, the
/// error lists every attempt.
pub fn open_dataset(
    path: &Path,
    openers: &[Box<dyn DatasetOpener>],
) -> Result<Box<dyn GriddedDataset>> {
    if !path.is_file() {
        return Err(ProcessingError::data_source(path, "file not found"));
    }

    let mut attempts = Vec::with_capacity(openers.len());
    for opener in openers {
        match opener.open(path) {
            Ok(dataset) => {
                info!(path = %path.display(), strategy = opener.name(), "Opened dataset");
                return Ok(dataset);
            }
            Err(e) => {
                debug!(strategy = opener.name(), error = %e, "Dataset strategy failed");
                attempts.push(format!("{}: {}", opener.name(), e));
            }
        }
    }

    if attempts.is_empty() {
        attempts.push("no access strategies configured".to_string());
    }

    Err(ProcessingError::DataSource {
        path: path.to_path_buf(),
        attempts,
    })
}

/// Dataset held in memory.
///
/// Variables are flattened as `[row][latitude][longitude]`, where a row is
/// one timestamp (surface) or one timestamp/level pair (pressure levels).
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    row_times: Vec<NaiveDateTime>,
    level: Option<(String, Vec<f64>)>,
    variables: Vec<(String, Vec<f64>)>,
}

impl InMemoryDataset {
    /// Single-level dataset with one row per timestamp
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>, times: Vec<NaiveDateTime>) -> Self {
        Self {
            latitudes,
            longitudes,
            row_times: times,
            level: None,
            variables: Vec::new(),
        }
    }

    /// Pressure-level dataset: rows are every (time, level) pair, time-major
    pub fn with_levels(
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        times: &[NaiveDateTime],
        level_name: &str,
        levels: &[f64],
    ) -> Self {
        let mut row_times = Vec::with_capacity(times.len() * levels.len());
        let mut row_levels = Vec::with_capacity(times.len() * levels.len());
        for &time in times {
            for &level in levels {
                row_times.push(time);
                row_levels.push(level);
            }
        }

        Self {
            latitudes,
            longitudes,
            row_times,
            level: Some((level_name.to_string(), row_levels)),
            variables: Vec::new(),
        }
    }

    fn cells_per_row(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    pub fn add_variable(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        let expected = self.row_times.len() * self.cells_per_row();
        if values.len() != expected {
            return Err(ProcessingError::InvalidFormat(format!(
                "Variable '{}' has {} values, expected {}",
                name,
                values.len(),
                expected
            )));
        }
        self.variables.push((name.to_string(), values));
        Ok(())
    }

    pub fn with_variable(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        self.add_variable(name, values)?;
        Ok(self)
    }

    /// Same value in every cell of each row
    pub fn with_uniform_variable(self, name: &str, per_row: &[f64]) -> Result<Self> {
        let cells = self.cells_per_row();
        let values = per_row
            .iter()
            .flat_map(|&v| std::iter::repeat(v).take(cells))
            .collect();
        self.with_variable(name, values)
    }
}

impl GriddedDataset for InMemoryDataset {
    fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    fn select_point(&self, lat_index: usize, lon_index: usize) -> Result<PointTable> {
        let latitude = *self.latitudes.get(lat_index).ok_or_else(|| {
            ProcessingError::InvalidCoordinate(format!("Latitude index {} out of range", lat_index))
        })?;
        let longitude = *self.longitudes.get(lon_index).ok_or_else(|| {
            ProcessingError::InvalidCoordinate(format!("Longitude index {} out of range", lon_index))
        })?;

        let cells = self.cells_per_row();
        let offset = lat_index * self.longitudes.len() + lon_index;

        let mut table = PointTable::new(latitude, longitude, self.row_times.clone());
        if let Some((name, levels)) = &self.level {
            table.insert_column(name, levels.clone())?;
        }
        for (name, values) in &self.variables {
            let column = (0..self.row_times.len())
                .map(|row| values[row * cells + offset])
                .collect();
            table.insert_column(name, column)?;
        }

        Ok(table)
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|(name, _)| name.clone()).collect()
    }
}
