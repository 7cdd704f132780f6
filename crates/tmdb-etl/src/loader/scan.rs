use crate::config::FragmentOrder;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CSV_SUFFIX: &str = ".csv";

/// List the `.csv` files directly inside `dir` (non-recursive).
///
/// Only regular files count; a directory called `x.csv` is ignored. The
/// suffix match is case-sensitive. An empty result is not an error here.
pub fn scan_fragments(dir: &Path, order: FragmentOrder) -> Result<Vec<PathBuf>> {
    let mut fragments = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(CSV_SUFFIX) {
            continue;
        }
        if entry.file_type()?.is_file() {
            fragments.push(entry.path());
        }
    }

    if order == FragmentOrder::Lexical {
        fragments.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    debug!("Found {} CSV fragments in {}", fragments.len(), dir.display());
    Ok(fragments)
}
