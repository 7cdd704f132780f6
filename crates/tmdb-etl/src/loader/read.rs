use crate::config::LoadOptions;
use crate::error::{EtlError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// One parsed CSV file.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub path: PathBuf,
    pub frame: DataFrame,
}

/// Whether the file at `path` has zero bytes.
pub fn is_empty_file(path: &Path) -> Result<bool> {
    Ok(fs::metadata(path)?.len() == 0)
}

/// Parse a comma-separated file with a header row into a `DataFrame`.
///
/// A zero-byte file yields `EmptyFragment`; content the CSV reader rejects
/// yields `ParseError`.
pub fn read_fragment(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    if is_empty_file(path)? {
        return Err(EtlError::EmptyFragment(path.to_path_buf()));
    }

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?;

    reader.finish().map_err(|e| EtlError::parse(path, e))
}
