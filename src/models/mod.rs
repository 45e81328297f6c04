pub mod config;
pub mod control;
pub mod onsite;
pub mod point_table;
pub mod sounding;
pub mod surface;

pub use config::{ConversionConfig, InputConfig, OutputConfig, PeriodConfig, SiteConfig};
pub use control::{ControlFileSpec, QaRange, QaSettings, RangeBound};
pub use onsite::{OnsiteRecord, ONSITE_SITE_ID};
pub use point_table::{PointTable, LEVEL_COLUMNS, TIME_COLUMNS};
pub use sounding::{LevelObservation, Sounding};
pub use surface::SurfaceRecord;
