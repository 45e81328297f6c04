use crate::error::{ProcessingError, Result};
use crate::utils::constants::DATA_FILE_EXTENSIONS;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use zip::ZipArchive;

/// True when the file is a readable zip container (checked by content,
/// not by extension).
pub fn is_zip_archive(path: &Path) -> bool {
    match File::open(path) {
        Ok(file) => ZipArchive::new(file).is_ok(),
        Err(_) => false,
    }
}

/// Unpacks zipped dataset downloads.
///
/// Extracted files live in a temporary directory owned by the unpacker
/// unless an explicit destination is given. Each archive gets its own
/// subdirectory named after the archive, so entries with the same name in
/// different downloads never overwrite each other.
pub struct ArchiveUnpacker {
    temp_dir: Option<TempDir>,
    dest_dir: PathBuf,
    extracted: HashMap<PathBuf, PathBuf>,
    archive_dirs: HashSet<PathBuf>,
}

impl ArchiveUnpacker {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().map_err(|e| {
            ProcessingError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create temporary directory: {}", e),
            ))
        })?;
        let dest_dir = temp_dir.path().to_path_buf();

        Ok(Self {
            temp_dir: Some(temp_dir),
            dest_dir,
            extracted: HashMap::new(),
            archive_dirs: HashSet::new(),
        })
    }

    /// Extract into `dest_dir`, which is kept after the unpacker is dropped
    pub fn with_destination(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: None,
            dest_dir: dest_dir.into(),
            extracted: HashMap::new(),
            archive_dirs: HashSet::new(),
        }
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub fn is_temporary(&self) -> bool {
        self.temp_dir.is_some()
    }

    /// Path to the data file: the first `.nc`/`.csv` entry when `path` is a
    /// zip archive, otherwise `path` itself.
    pub fn unpack_if_zip(&mut self, path: &Path) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(ProcessingError::data_source(path, "file not found"));
        }

        if !is_zip_archive(path) {
            debug!(path = %path.display(), "Not a zip archive, using as-is");
            return Ok(path.to_path_buf());
        }

        if let Some(data_file) = self.extracted.get(path) {
            return Ok(data_file.clone());
        }

        let archive_dir = self.claim_archive_dir(path);
        let entries = self.extract_all(path, &archive_dir)?;
        let data_file = entries
            .into_iter()
            .find(|p| is_data_file(p))
            .ok_or_else(|| {
                ProcessingError::data_source(path, "archive contains no .nc or .csv file")
            })?;

        info!(
            archive = %path.display(),
            data_file = %data_file.display(),
            "Extracted dataset from zip archive"
        );
        self.extracted.insert(path.to_path_buf(), data_file.clone());
        Ok(data_file)
    }

    /// `dest_dir/<archive stem>`, suffixed `-2`, `-3`, ... when another
    /// archive with the same stem was already unpacked here.
    fn claim_archive_dir(&mut self, zip_path: &Path) -> PathBuf {
        let stem = zip_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("archive");

        let mut candidate = self.dest_dir.join(stem);
        let mut n = 2;
        while self.archive_dirs.contains(&candidate) {
            candidate = self.dest_dir.join(format!("{}-{}", stem, n));
            n += 1;
        }

        self.archive_dirs.insert(candidate.clone());
        candidate
    }

    /// Extract every file entry below `dest`; returns the extracted paths
    /// in archive order.
    pub fn extract_all(&self, zip_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
        let file = File::open(zip_path)?;
        let mut archive = ZipArchive::new(file)?;
        std::fs::create_dir_all(dest)?;

        let mut extracted_paths = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut zip_file = archive.by_index(i)?;
            if zip_file.is_dir() {
                continue;
            }

            // Entries with absolute paths or `..` components are refused
            let relative = match zip_file.enclosed_name() {
                Some(name) => name.to_path_buf(),
                None => {
                    return Err(ProcessingError::InvalidFormat(format!(
                        "Unsafe entry name '{}' in archive '{}'",
                        zip_file.name(),
                        zip_path.display()
                    )))
                }
            };

            let dest_path = dest.join(&relative);
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut dest_file = File::create(&dest_path)?;
            let mut writer = BufWriter::new(&mut dest_file);
            std::io::copy(&mut zip_file, &mut writer)?;
            writer.flush()?;

            extracted_paths.push(dest_path);
        }

        Ok(extracted_paths)
    }
}

fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DATA_FILE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
