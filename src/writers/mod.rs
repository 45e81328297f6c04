pub mod control_writer;
pub mod onsite_writer;
pub mod surface_writer;
pub mod upper_air_writer;

pub use control_writer::ControlFileWriter;
pub use onsite_writer::OnsiteWriter;
pub use surface_writer::SurfaceWriter;
pub use upper_air_writer::UpperAirWriter;

use crate::error::{ProcessingError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Create (or truncate) `path` and write `chunks` in order.
///
/// I/O failures are reported as `ProcessingError::Write` for `path`;
/// whatever was written before the failure stays on disk.
pub(crate) fn write_text_file<I, S>(path: &Path, chunks: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path).map_err(|e| ProcessingError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    for chunk in chunks {
        writer
            .write_all(chunk.as_ref().as_bytes())
            .map_err(|e| ProcessingError::write(path, e))?;
    }

    writer.flush().map_err(|e| ProcessingError::write(path, e))
}
