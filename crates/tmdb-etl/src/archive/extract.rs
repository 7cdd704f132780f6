use super::{ArchiveFormat, ExtractionReport};
use crate::error::{EtlError, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Extract a `.zip`, `.tar.gz` or `.tgz` archive into its parent directory.
///
/// Existence is checked before the suffix, so a missing `data.rar` reports
/// `NotFound` rather than `UnsupportedFormat`. Nothing is written when the
/// format is not recognised.
pub fn extract_archive(archive_path: &Path) -> Result<ExtractionReport> {
    if !archive_path.exists() {
        return Err(EtlError::NotFound(archive_path.to_path_buf()));
    }

    let format = ArchiveFormat::from_path(archive_path)
        .ok_or_else(|| EtlError::UnsupportedFormat(archive_path.to_path_buf()))?;

    let destination = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    debug!(
        "Extracting {} archive {} into {}",
        format,
        archive_path.display(),
        destination.display()
    );

    let files_extracted = match format {
        ArchiveFormat::Zip => extract_zip(archive_path, &destination)?,
        ArchiveFormat::TarGz => extract_tar_gz(archive_path, &destination)?,
    };

    info!(
        "Extracted {} ({} files)",
        archive_path.display(),
        files_extracted
    );

    Ok(ExtractionReport {
        archive: archive_path.to_path_buf(),
        destination,
        format,
        files_extracted,
    })
}

/// Extract an archive, reporting failures through the log instead of returning them.
pub fn unpack_archive(archive_path: &Path) -> Option<ExtractionReport> {
    match extract_archive(archive_path) {
        Ok(report) => Some(report),
        Err(e) if e.is_input_condition() => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("Extraction of {} failed: {}", archive_path.display(), e);
            None
        }
    }
}

fn extract_zip(archive_path: &Path, dest_path: &Path) -> Result<usize> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    let mut count = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let Some(entry_path) = entry.enclosed_name() else {
            warn!("Skipping unsafe zip entry: {}", entry.name());
            continue;
        };
        let output_path = dest_path.join(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&output_path)?;
            io::copy(&mut entry, &mut outfile)?;
            count += 1;
        }
    }
    Ok(count)
}

fn extract_tar_gz(archive_path: &Path, dest_path: &Path) -> Result<usize> {
    let file = fs::File::open(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    archive.set_overwrite(true);

    let mut count = 0usize;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_file = entry.header().entry_type().is_file();
        // unpack_in refuses paths that would land outside dest_path
        if entry.unpack_in(dest_path)? {
            if is_file {
                count += 1;
            }
        } else {
            warn!("Skipping unsafe tar entry: {}", entry.path()?.display());
        }
    }
    Ok(count)
}
