use crate::error::{ProcessingError, Result};
use crate::models::{PointTable, TIME_COLUMNS};
use crate::readers::dataset::{DatasetOpener, GriddedDataset};
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::Path;
use tracing::debug;

const LATITUDE_COLUMNS: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_COLUMNS: [&str; 2] = ["longitude", "lon"];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a dataframe-style timestamp, e.g. `2025-01-01 06:00:00`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    let mut last_error = None;
    for format in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(value, format) {
            Ok(timestamp) => return Ok(timestamp),
            Err(e) => last_error = Some(e),
        }
    }
    match last_error {
        Some(e) => Err(ProcessingError::DateParse(e)),
        None => Err(ProcessingError::InvalidFormat(format!(
            "Invalid timestamp: '{}'",
            value
        ))),
    }
}

/// Opens flat CSV exports of a dataset (one row per
/// time/level/latitude/longitude cell).
pub struct CsvTableOpener {
    delimiter: u8,
}

impl CsvTableOpener {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }
}

impl Default for CsvTableOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetOpener for CsvTableOpener {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn GriddedDataset>> {
        let dataset = CsvGridDataset::read(path, self.delimiter)?;
        Ok(Box::new(dataset))
    }
}

/// Dataset backed by a flat CSV table.
#[derive(Debug, Clone)]
pub struct CsvGridDataset {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    row_lat: Vec<f64>,
    row_lon: Vec<f64>,
    row_times: Vec<NaiveDateTime>,
    columns: Vec<(String, Vec<f64>)>,
}

impl CsvGridDataset {
    pub fn read(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let find = |candidates: &[&str]| -> Result<usize> {
            headers
                .iter()
                .position(|h| candidates.contains(&h))
                .ok_or_else(|| ProcessingError::Schema(format!("one of [{}]", candidates.join(", "))))
        };

        let time_idx = find(&TIME_COLUMNS)?;
        let lat_idx = find(&LATITUDE_COLUMNS)?;
        let lon_idx = find(&LONGITUDE_COLUMNS)?;

        let value_indices: Vec<usize> = (0..headers.len())
            .filter(|&i| i != time_idx && i != lat_idx && i != lon_idx && !headers[i].is_empty())
            .collect();

        let mut row_times = Vec::new();
        let mut row_lat = Vec::new();
        let mut row_lon = Vec::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); value_indices.len()];
        let mut numeric: Vec<bool> = vec![true; value_indices.len()];

        for record in reader.records() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            row_times.push(parse_timestamp(record.get(time_idx).unwrap_or(""))?);
            row_lat.push(parse_coordinate_field(record.get(lat_idx), "latitude")?);
            row_lon.push(parse_coordinate_field(record.get(lon_idx), "longitude")?);

            for (slot, &col) in value_indices.iter().enumerate() {
                let field = record.get(col).unwrap_or("");
                let value = if field.is_empty() {
                    f64::NAN
                } else {
                    match field.parse::<f64>() {
                        Ok(v) => v,
                        Err(_) => {
                            numeric[slot] = false;
                            f64::NAN
                        }
                    }
                };
                values[slot].push(value);
            }
        }

        if row_times.is_empty() {
            return Err(ProcessingError::InvalidFormat(format!(
                "No data rows in '{}'",
                path.display()
            )));
        }

        let mut columns = Vec::new();
        for ((slot, &col), column) in value_indices.iter().enumerate().zip(values) {
            if numeric[slot] {
                columns.push((headers[col].to_string(), column));
            } else {
                debug!(column = &headers[col], "Skipping non-numeric column");
            }
        }

        Ok(Self {
            latitudes: unique_in_order(&row_lat),
            longitudes: unique_in_order(&row_lon),
            row_lat,
            row_lon,
            row_times,
            columns,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_times.len()
    }
}

impl GriddedDataset for CsvGridDataset {
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

        let rows: Vec<usize> = (0..self.row_times.len())
            .filter(|&i| self.row_lat[i] == latitude && self.row_lon[i] == longitude)
            .collect();

        let times = rows.iter().map(|&i| self.row_times[i]).collect();
        let mut table = PointTable::new(latitude, longitude, times);
        for (name, values) in &self.columns {
            table.insert_column(name, rows.iter().map(|&i| values[i]).collect())?;
        }

        Ok(table)
    }

    fn variable_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }
}

fn parse_coordinate_field(field: Option<&str>, name: &str) -> Result<f64> {
    let field = field.unwrap_or("");
    field
        .parse::<f64>()
        .map_err(|_| ProcessingError::InvalidCoordinate(format!("Invalid {}: '{}'", name, field)))
}

fn unique_in_order(values: &[f64]) -> Vec<f64> {
    let mut unique: Vec<f64> = Vec::new();
    for &value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}
