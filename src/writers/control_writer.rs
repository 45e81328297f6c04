//! AERMET stage 1 control script (`aermet_stage1.inp`).
//!
//! The script is keyword driven and whitespace sensitive, so it is built
//! line by line from a fixed template. File names are referenced as given;
//! nothing here checks that they exist.

use crate::error::Result;
use crate::models::{ControlFileSpec, QaRange};
use crate::writers::write_text_file;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

const DATE_FORMAT: &str = "%Y/%m/%d";

pub struct ControlFileWriter;

impl ControlFileWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the full script text.
    pub fn render(&self, spec: &ControlFileSpec) -> String {
        let mut out = String::new();
        self.render_job(&mut out, spec);
        self.render_upperair(&mut out, spec);
        self.render_surface(&mut out, spec);
        self.render_onsite(&mut out, spec);
        out.push_str("end\n");
        out
    }

    pub fn write(&self, spec: &ControlFileSpec, path: &Path) -> Result<()> {
        write_text_file(path, [self.render(spec)])?;
        info!(path = %path.display(), "Wrote AERMET control file");
        Ok(())
    }

    fn render_job(&self, out: &mut String, spec: &ControlFileSpec) {
        out.push_str("job\n");
        line(out, format_args!("  messages  {}", spec.messages_file));
        line(out, format_args!("  report    {}", spec.report_file));
        out.push_str("  \n");
    }

    fn render_upperair(&self, out: &mut String, spec: &ControlFileSpec) {
        out.push_str("upperair\n");
        line(out, format_args!("**          Upper air data for {} from ERA5", spec.site_name));
        line(out, format_args!("  data      {}  fsl", spec.upper_file_name));
        line(out, format_args!("  extract   {}", spec.upper_extract_file()));
        line(
            out,
            format_args!(
                "  location  {}  {:.2}n  {:.2}e  5 {:.1}",
                spec.site_id, spec.latitude, spec.longitude, spec.elevation_m
            ),
        );
        line(
            out,
            format_args!("  xdates    {} to {}", date(spec.start), date(spec.end)),
        );
        line(out, format_args!("  qaout     {}", spec.upper_qaout_file()));
        out.push('\n');
    }

    fn render_surface(&self, out: &mut String, spec: &ControlFileSpec) {
        out.push_str("surface\n");
        line(out, format_args!("**           Surface data for {} from ERA5", spec.site_name));
        line(out, format_args!("   data      {}  CD144", spec.surface_file_name));
        line(out, format_args!("   extract   {}", spec.surface_extract_file()));
        line(out, format_args!("   qaout     {}", spec.surface_qaout_file()));
        line(
            out,
            format_args!(
                "   location  {} {:.2}N {:.2}E 0",
                spec.site_id, spec.latitude, spec.longitude
            ),
        );
        line(
            out,
            format_args!("   xdates    {} TO {}", date(spec.start), date(spec.end)),
        );
        out.push('\n');
    }

    fn render_onsite(&self, out: &mut String, spec: &ControlFileSpec) {
        out.push_str("onsite\n");
        line(out, format_args!("  data      {}", spec.onsite_file_name));
        out.push('\n');
        line(
            out,
            format_args!(
                "  location  {}   {:.2}n  {:.2}e  0",
                spec.onsite_site_id, spec.latitude, spec.longitude
            ),
        );
        out.push('\n');
        line(
            out,
            format_args!("  xdates    {}  {}", date(spec.start), date(spec.end)),
        );
        line(out, format_args!("  qaout     {}", spec.onsite_qaout_file()));
        out.push_str("  read      1  osyr  osmo  osdy  oshr\n");
        out.push_str("  read      2  HT01  WD01  WS01  SA01  TT01\n");
        out.push_str(&" ".repeat(25));
        out.push('\n');
        out.push_str("  format    1  ( 2X,I2,I4,I4,I4 )\n");
        out.push_str("  format    2  ( 5F10.4 )\n");
        out.push('\n');
        line(out, format_args!("  threshold {}", spec.qa.threshold));
        out.push('\n');
        for range in &spec.qa.ranges {
            out.push_str(&format_range(range));
            out.push('\n');
        }
        out.push('\n');
        line(out, format_args!("  audit     {}", spec.qa.audit));
        out.push('\n');
    }
}

impl Default for ControlFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// `  range     tt    -30 <=  35  999`
pub fn format_range(range: &QaRange) -> String {
    format!(
        "  range     {:<2}{:>7} {:<2}{:>4}  {}",
        range.variable,
        range.lower,
        range.bound.as_str(),
        range.upper,
        range.missing
    )
}

fn date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

fn line(out: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail
    let _ = out.write_fmt(args);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QaSettings, RangeBound};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn ternopil() -> ControlFileSpec {
        ControlFileSpec {
            surface_file_name: "ternopil_surface.dat".to_string(),
            upper_file_name: "ternopil_upper.fsl".to_string(),
            onsite_file_name: "ternopil_onsite.dat".to_string(),
            site_id: "999999".to_string(),
            site_name: "Ternopil".to_string(),
            onsite_site_id: "000001".to_string(),
            latitude: 49.55,
            longitude: 25.60,
            elevation_m: 324.0,
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            file_prefix: "ternopil".to_string(),
            messages_file: "aermet_st1.msg".to_string(),
            report_file: "aermet_st1.rpt".to_string(),
            qa: QaSettings::default(),
        }
    }

    const EXPECTED: &str = "job
  messages  aermet_st1.msg
  report    aermet_st1.rpt
  \n\
upperair
**          Upper air data for Ternopil from ERA5
  data      ternopil_upper.fsl  fsl
  extract   ternopil_upper.iqa
  location  999999  49.55n  25.60e  5 324.0
  xdates    2025/01/01 to 2025/01/02
  qaout     ternopil_upper.oqa

surface
**           Surface data for Ternopil from ERA5
   data      ternopil_surface.dat  CD144
   extract   ternopil_surf.iqa
   qaout     ternopil_surf.oqa
   location  999999 49.55N 25.60E 0
   xdates    2025/01/01 TO 2025/01/02

onsite
  data      ternopil_onsite.dat

  location  000001   49.55n  25.60e  0

  xdates    2025/01/01  2025/01/02
  qaout     ternopil_onsite.oqa
  read      1  osyr  osmo  osdy  oshr
  read      2  HT01  WD01  WS01  SA01  TT01
                         \n\
\x20 format    1  ( 2X,I2,I4,I4,I4 )
  format    2  ( 5F10.4 )

  threshold 0.3

  range     tt    -30 <=  35  999
  range     ws      0 <   50  999
  range     wd      0 <= 360  999
  range     sa      0 <= 360  999

  audit     sa

end
";

    #[test]
    fn test_render_matches_template() {
        assert_eq!(ControlFileWriter::new().render(&ternopil()), EXPECTED);
    }

    #[test]
    fn test_blank_lines_keep_their_spaces() {
        let text = ControlFileWriter::new().render(&ternopil());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "  ");
        assert!(lines.contains(&" ".repeat(25).as_str()));
    }

    #[test]
    fn test_format_range() {
        assert_eq!(
            format_range(&QaRange::new("ws", 0, RangeBound::Exclusive, 50, 999)),
            "  range     ws      0 <   50  999"
        );
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aermet_stage1.inp");
        let writer = ControlFileWriter::new();

        writer.write(&ternopil(), &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        writer.write(&ternopil(), &path).unwrap();
        assert_eq!(first, std::fs::read(&path).unwrap());
    }
}
