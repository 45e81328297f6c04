use crate::models::config::ConversionConfig;
use crate::models::onsite::ONSITE_SITE_ID;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeBound {
    Inclusive,
    Exclusive,
}

impl RangeBound {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeBound::Inclusive => "<=",
            RangeBound::Exclusive => "<",
        }
    }
}

/// Onsite QA `range` directive: `lower <bound> upper missing`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRange {
    pub variable: String,
    pub lower: i32,
    pub bound: RangeBound,
    pub upper: i32,
    pub missing: i32,
}

impl QaRange {
    pub fn new(variable: &str, lower: i32, bound: RangeBound, upper: i32, missing: i32) -> Self {
        Self {
            variable: variable.to_string(),
            lower,
            bound,
            upper,
            missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaSettings {
    pub threshold: f64,
    pub ranges: Vec<QaRange>,
    pub audit: String,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            ranges: vec![
                QaRange::new("tt", -30, RangeBound::Inclusive, 35, 999),
                QaRange::new("ws", 0, RangeBound::Exclusive, 50, 999),
                QaRange::new("wd", 0, RangeBound::Inclusive, 360, 999),
                QaRange::new("sa", 0, RangeBound::Inclusive, 360, 999),
            ],
            audit: "sa".to_string(),
        }
    }
}

/// Inputs to the AERMET stage 1 control script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFileSpec {
    pub surface_file_name: String,
    pub upper_file_name: String,
    pub onsite_file_name: String,
    pub site_id: String,
    pub site_name: String,
    pub onsite_site_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub file_prefix: String,
    pub messages_file: String,
    pub report_file: String,
    pub qa: QaSettings,
}

impl ControlFileSpec {
    /// Build from a run configuration and the paths of the generated files.
    /// Only base names end up in the script.
    pub fn from_config(
        config: &ConversionConfig,
        surface_file: &Path,
        upper_file: &Path,
        onsite_file: &Path,
    ) -> Self {
        Self {
            surface_file_name: base_name(surface_file),
            upper_file_name: base_name(upper_file),
            onsite_file_name: base_name(onsite_file),
            site_id: config.site.id.clone(),
            site_name: config.site.name.clone(),
            onsite_site_id: ONSITE_SITE_ID.to_string(),
            latitude: config.site.latitude,
            longitude: config.site.longitude,
            elevation_m: config.site.elevation,
            start: config.period.start,
            end: config.period.end,
            file_prefix: config.file_prefix(),
            messages_file: "aermet_st1.msg".to_string(),
            report_file: "aermet_st1.rpt".to_string(),
            qa: QaSettings::default(),
        }
    }

    pub fn upper_extract_file(&self) -> String {
        format!("{}_upper.iqa", self.file_prefix)
    }

    pub fn upper_qaout_file(&self) -> String {
        format!("{}_upper.oqa", self.file_prefix)
    }

    pub fn surface_extract_file(&self) -> String {
        format!("{}_surf.iqa", self.file_prefix)
    }

    pub fn surface_qaout_file(&self) -> String {
        format!("{}_surf.oqa", self.file_prefix)
    }

    pub fn onsite_qaout_file(&self) -> String {
        format!("{}_onsite.oqa", self.file_prefix)
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
