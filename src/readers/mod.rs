pub mod cf_time;
pub mod csv_reader;
pub mod dataset;
pub mod location;
#[cfg(feature = "netcdf")]
pub mod netcdf_reader;

pub use cf_time::TimeUnits;
pub use csv_reader::{parse_timestamp, CsvGridDataset, CsvTableOpener};
pub use dataset::{default_openers, open_dataset, DatasetOpener, GriddedDataset, InMemoryDataset};
pub use location::{extract_point, resolve_nearest, GridPoint};
#[cfg(feature = "netcdf")]
pub use netcdf_reader::{NetcdfDataset, NetcdfOpener};
