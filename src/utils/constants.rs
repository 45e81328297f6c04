/// Kelvin offset of 0 °C
pub const KELVIN_OFFSET: f64 = 273.15;

/// Standard gravity (m/s²), converts geopotential to geopotential height
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Metres per second to knots
pub const MS_TO_KNOTS: f64 = 1.94384;

/// Fixed offset of the dewpoint approximation (°F below air temperature)
pub const DEWPOINT_DEPRESSION_F: f64 = 10.0;

/// Mandatory pressure levels kept in FSL soundings (hPa)
pub const SOUNDING_LEVELS_HPA: [i32; 5] = [1000, 925, 850, 700, 500];

/// Number of hourly records in the onsite file
pub const ONSITE_RECORD_COUNT: usize = 48;

/// Surface variable names (ERA5 single levels)
pub const VAR_T2M: &str = "t2m";
pub const VAR_U10: &str = "u10";
pub const VAR_V10: &str = "v10";
pub const VAR_MSL: &str = "msl";

/// Upper-air variable names (ERA5 pressure levels)
pub const VAR_T: &str = "t";
pub const VAR_U: &str = "u";
pub const VAR_V: &str = "v";
pub const VAR_Z: &str = "z";

/// Generated file names
pub const SURFACE_FILE_SUFFIX: &str = "surface.dat";
pub const UPPER_FILE_SUFFIX: &str = "upper.fsl";
pub const ONSITE_FILE_SUFFIX: &str = "onsite.dat";
pub const CONTROL_FILE_NAME: &str = "aermet_stage1.inp";

/// Data file extensions recognised inside archives
pub const DATA_FILE_EXTENSIONS: [&str; 2] = ["nc", "csv"];
