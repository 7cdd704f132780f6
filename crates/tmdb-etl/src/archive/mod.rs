//! Archive detection and extraction.
//!
//! The container format is decided from the file name alone:
//! - `.zip` → zip archive
//! - `.tar.gz` / `.tgz` → gzip-compressed tarball
//!
//! Contents are always written next to the archive (its parent directory),
//! overwriting same-named files.

mod extract;

pub use extract::{extract_archive, unpack_archive};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported archive container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the file name suffix (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => write!(f, "zip"),
            Self::TarGz => write!(f, "tar.gz"),
        }
    }
}

/// What an extraction did.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub format: ArchiveFormat,
    /// Regular files written; directories and skipped entries are not counted.
    pub files_extracted: usize,
}
