pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{align_longitude, haversine_distance, nearest_index, validate_coordinates};
pub use filename::OutputPaths;
pub use progress::ProgressReporter;
