//! Native NetCDF access through libnetcdf (cargo feature `netcdf`).
//!
//! The whole area subset is read eagerly: reanalysis requests for a single
//! site are a few grid cells wide, so holding every variable in memory is
//! cheaper than re-opening the file per point.

use crate::error::{ProcessingError, Result};
use crate::models::{PointTable, LEVEL_COLUMNS, TIME_COLUMNS};
use crate::readers::cf_time::TimeUnits;
use crate::readers::dataset::{DatasetOpener, GriddedDataset};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::debug;

const LATITUDE_NAMES: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_NAMES: [&str; 2] = ["longitude", "lon"];

pub struct NetcdfOpener;

impl DatasetOpener for NetcdfOpener {
    fn name(&self) -> &'static str {
        "netcdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn GriddedDataset>> {
        Ok(Box::new(NetcdfDataset::read(path)?))
    }
}

/// A data variable laid out as `[time][level?][lat][lon]`.
#[derive(Debug, Clone)]
struct GridVariable {
    name: String,
    has_level: bool,
    values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct NetcdfDataset {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    times: Vec<NaiveDateTime>,
    level: Option<(String, Vec<f64>)>,
    variables: Vec<GridVariable>,
}

impl NetcdfDataset {
    pub fn read(path: &Path) -> Result<Self> {
        let file = netcdf::open(path)?;

        let (lat_name, latitudes) = read_axis(&file, &LATITUDE_NAMES)?;
        let (lon_name, longitudes) = read_axis(&file, &LONGITUDE_NAMES)?;
        let (time_name, raw_times) = read_axis(&file, &TIME_COLUMNS)?;
        let level = read_axis(&file, &LEVEL_COLUMNS).ok();

        let time_var = file
            .variable(&time_name)
            .ok_or_else(|| ProcessingError::Schema(time_name.clone()))?;
        let units = string_attr(&time_var, "units")
            .ok_or_else(|| ProcessingError::Schema(format!("{}:units", time_name)))?;
        let times = TimeUnits::parse(&units)?.decode_all(&raw_times)?;

        let level_name = level.as_ref().map(|(name, _)| name.clone());
        let mut variables = Vec::new();

        for var in file.variables() {
            let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
            let n = dims.len();
            if n < 3 || dims[n - 2] != lat_name || dims[n - 1] != lon_name || dims[0] != time_name {
                continue;
            }

            let has_level = match (n, &level_name) {
                (3, _) => false,
                (4, Some(level)) if &dims[1] == level => true,
                _ => {
                    debug!(variable = %var.name(), ?dims, "Skipping variable with unsupported dimensions");
                    continue;
                }
            };

            let raw: Vec<f64> = var.get_values::<f64, _>(..)?;
            let scale = f64_attr(&var, "scale_factor").unwrap_or(1.0);
            let offset = f64_attr(&var, "add_offset").unwrap_or(0.0);
            let fill = f64_attr(&var, "_FillValue");
            let missing = f64_attr(&var, "missing_value");

            let values = raw
                .into_iter()
                .map(|v| {
                    if Some(v) == fill || Some(v) == missing {
                        f64::NAN
                    } else {
                        v * scale + offset
                    }
                })
                .collect();

            variables.push(GridVariable {
                name: var.name(),
                has_level,
                values,
            });
        }

        debug!(
            path = %path.display(),
            variables = variables.len(),
            times = times.len(),
            "Read NetCDF dataset"
        );

        Ok(Self {
            latitudes,
            longitudes,
            times,
            level,
            variables,
        })
    }

    fn level_count(&self) -> usize {
        self.level.as_ref().map_or(1, |(_, levels)| levels.len())
    }
}

impl GriddedDataset for NetcdfDataset {
    fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    fn select_point(&self, lat_index: usize, lon_index: usize) -> Result<PointTable> {
        if lat_index >= self.latitudes.len() || lon_index >= self.longitudes.len() {
            return Err(ProcessingError::InvalidCoordinate(format!(
                "Grid index ({}, {}) out of range",
                lat_index, lon_index
            )));
        }

        let n_lat = self.latitudes.len();
        let n_lon = self.longitudes.len();
        let n_level = self.level_count();
        let cell = lat_index * n_lon + lon_index;

        let mut row_times = Vec::with_capacity(self.times.len() * n_level);
        for &time in &self.times {
            for _ in 0..n_level {
                row_times.push(time);
            }
        }

        let mut table = PointTable::new(
            self.latitudes[lat_index],
            self.longitudes[lon_index],
            row_times,
        );

        if let Some((name, levels)) = &self.level {
            let column = (0..self.times.len())
                .flat_map(|_| levels.iter().copied())
                .collect();
            table.insert_column(name, column)?;
        }

        for variable in &self.variables {
            let mut column = Vec::with_capacity(self.times.len() * n_level);
            for t in 0..self.times.len() {
                for l in 0..n_level {
                    let index = if variable.has_level {
                        ((t * n_level + l) * n_lat * n_lon) + cell
                    } else {
                        (t * n_lat * n_lon) + cell
                    };
                    column.push(variable.values.get(index).copied().unwrap_or(f64::NAN));
                }
            }
            table.insert_column(&variable.name, column)?;
        }

        Ok(table)
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }
}

fn read_axis(file: &netcdf::File, candidates: &[&str]) -> Result<(String, Vec<f64>)> {
    for name in candidates {
        if let Some(var) = file.variable(name) {
            let values: Vec<f64> = var.get_values::<f64, _>(..)?;
            return Ok((name.to_string(), values));
        }
    }
    Err(ProcessingError::Schema(format!(
        "one of [{}]",
        candidates.join(", ")
    )))
}

fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(value) => Some(value),
        _ => None,
    }
}
