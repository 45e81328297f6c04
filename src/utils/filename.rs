use crate::models::ConversionConfig;
use crate::utils::constants::{
    CONTROL_FILE_NAME, ONSITE_FILE_SUFFIX, SURFACE_FILE_SUFFIX, UPPER_FILE_SUFFIX,
};
use std::path::PathBuf;

/// Paths of the four files a conversion run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub surface: PathBuf,
    pub upper_air: PathBuf,
    pub onsite: PathBuf,
    pub control: PathBuf,
}

impl OutputPaths {
    /// `{dir}/{prefix}_surface.dat`, `{dir}/{prefix}_upper.fsl`,
    /// `{dir}/{prefix}_onsite.dat` and `{dir}/aermet_stage1.inp`
    pub fn for_config(config: &ConversionConfig) -> Self {
        let dir = &config.output.directory;
        let prefix = config.file_prefix();

        Self {
            surface: dir.join(format!("{}_{}", prefix, SURFACE_FILE_SUFFIX)),
            upper_air: dir.join(format!("{}_{}", prefix, UPPER_FILE_SUFFIX)),
            onsite: dir.join(format!("{}_{}", prefix, ONSITE_FILE_SUFFIX)),
            control: dir.join(CONTROL_FILE_NAME),
        }
    }
}
