use super::read::{Fragment, is_empty_file, read_fragment};
use super::scan::scan_fragments;
use crate::config::LoadOptions;
use crate::error::{EtlError, Result};
use crate::types::Timed;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// How a fold treats zero-byte fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFragmentPolicy {
    /// An empty first fragment aborts the fold; later empty ones are skipped.
    AbortIfFirst,
    /// No size check; an empty fragment fails when it is loaded.
    Reject,
    /// Every empty fragment is skipped.
    Skip,
}

/// Scan `dir`, load every CSV fragment and fold it into `acc` with `step`.
///
/// Timing starts before the scan and stops after the last fold step. Any
/// error aborts the whole fold and the partial accumulator is dropped.
pub fn fold_fragments<A, F>(
    dir: &Path,
    options: &LoadOptions,
    policy: EmptyFragmentPolicy,
    mut acc: A,
    mut step: F,
) -> Result<Timed<A>>
where
    F: FnMut(&mut A, Fragment) -> Result<()>,
{
    let started = Instant::now();

    let paths = scan_fragments(dir, options.fragment_order)?;
    if paths.is_empty() {
        return Err(EtlError::NoInputFiles(dir.to_path_buf()));
    }

    for (index, path) in paths.into_iter().enumerate() {
        if policy != EmptyFragmentPolicy::Reject && is_empty_file(&path)? {
            if index == 0 && policy == EmptyFragmentPolicy::AbortIfFirst {
                return Err(EtlError::EmptyFragment(path));
            }
            warn!("CSV file {} is empty, skipping", path.display());
            continue;
        }

        let frame = read_fragment(&path, options)?;
        debug!(
            "Loaded {} ({} rows x {} columns)",
            path.display(),
            frame.height(),
            frame.width()
        );
        step(&mut acc, Fragment { path, frame })?;
    }

    Ok(Timed::new(acc, started.elapsed()))
}
