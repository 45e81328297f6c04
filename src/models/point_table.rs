use crate::error::{ProcessingError, Result};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Columns that may carry the pressure level, in lookup order.
pub const LEVEL_COLUMNS: [&str; 3] = ["level", "pressure_level", "isobaricInhPa"];

/// Columns that may carry the row timestamp, in lookup order.
pub const TIME_COLUMNS: [&str; 2] = ["valid_time", "time"];

/// All rows of a dataset at one selected grid point.
///
/// Rows are kept in dataset order (time-major, then level). Every column
/// has exactly one value per timestamp; missing cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    latitude: f64,
    longitude: f64,
    times: Vec<NaiveDateTime>,
    columns: HashMap<String, Vec<f64>>,
}

impl PointTable {
    pub fn new(latitude: f64, longitude: f64, times: Vec<NaiveDateTime>) -> Self {
        Self {
            latitude,
            longitude,
            times,
            columns: HashMap::new(),
        }
    }

    /// Grid latitude the rows were selected at
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Grid longitude the rows were selected at
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.times.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} values, expected {}",
                name,
                values.len(),
                self.times.len()
            )));
        }

        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Values of a required column. Absence is a schema error.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(|values| values.as_slice())
            .ok_or_else(|| ProcessingError::Schema(name.to_string()))
    }

    /// Optional column, if present
    pub fn column_opt(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|values| values.as_slice())
    }

    /// First column present among `candidates`, with its name.
    pub fn first_column_of<'a>(&'a self, candidates: &[&'a str]) -> Result<(&'a str, &'a [f64])> {
        candidates
            .iter()
            .find_map(|name| self.column_opt(name).map(|values| (*name, values)))
            .ok_or_else(|| ProcessingError::Schema(format!("one of [{}]", candidates.join(", "))))
    }

    /// Copy of the table with rows stable-sorted by timestamp.
    pub fn sorted_by_time(&self) -> PointTable {
        let mut order: Vec<usize> = (0..self.times.len()).collect();
        order.sort_by_key(|&i| self.times[i]);

        let times = order.iter().map(|&i| self.times[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), order.iter().map(|&i| values[i]).collect()))
            .collect();

        PointTable {
            latitude: self.latitude,
            longitude: self.longitude,
            times,
            columns,
        }
    }
}
