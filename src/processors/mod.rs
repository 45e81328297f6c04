pub mod converter;
pub mod derived;
pub mod onsite_generator;
pub mod sounding_processor;
pub mod surface_processor;

pub use converter::{ConversionSummary, Converter};
pub use derived::{NonFinitePolicy, NumericGuard};
pub use onsite_generator::OnsiteGenerator;
pub use sounding_processor::SoundingProcessor;
pub use surface_processor::SurfaceProcessor;
