//! CSV-to-structure integration routines.
//!
//! [`CsvIntegrator`] folds every CSV fragment of a directory into one of
//! three shapes:
//! - a unified `DataFrame` built by successive outer joins on the key column
//! - a [`RowKeyedMap`] (`id` -> column -> value, last write wins)
//! - a [`ColumnKeyedMap`] (column -> concatenated values)
//!
//! Each shape has a `try_*` method returning the typed error and a degrading
//! method that logs the error and returns an empty result with zero elapsed
//! time.

mod column_keyed;
mod merger;
mod row_keyed;

use crate::config::LoadOptions;
use crate::error::{EtlError, Result};
use crate::types::{ColumnKeyedMap, RowKeyedMap, Timed};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{error, info, warn};

/// Loads a directory of CSV fragments into the three integration shapes.
#[derive(Debug, Clone, Default)]
pub struct CsvIntegrator {
    options: LoadOptions,
}

impl CsvIntegrator {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Outer-join every fragment on the key column into one table.
    pub fn try_merge_table(&self, dir: &Path) -> Result<Timed<DataFrame>> {
        merger::merge_fragments(dir, &self.options)
    }

    /// [`Self::try_merge_table`], degrading to an empty table on error.
    pub fn merge_table(&self, dir: &Path) -> Timed<DataFrame> {
        degrade("merge_table", self.try_merge_table(dir))
    }

    /// Fold every record into an `id`-keyed map of column values.
    pub fn try_rows_by_key(&self, dir: &Path) -> Result<Timed<RowKeyedMap>> {
        row_keyed::collect_rows(dir, &self.options)
    }

    /// [`Self::try_rows_by_key`], degrading to an empty map on error.
    pub fn rows_by_key(&self, dir: &Path) -> Timed<RowKeyedMap> {
        degrade("rows_by_key", self.try_rows_by_key(dir))
    }

    /// Concatenate each column's values across every fragment.
    pub fn try_columns_by_name(&self, dir: &Path) -> Result<Timed<ColumnKeyedMap>> {
        column_keyed::collect_columns(dir, &self.options)
    }

    /// [`Self::try_columns_by_name`], degrading to an empty map on error.
    pub fn columns_by_name(&self, dir: &Path) -> Timed<ColumnKeyedMap> {
        degrade("columns_by_name", self.try_columns_by_name(dir))
    }
}

fn degrade<T: Default>(routine: &str, result: Result<Timed<T>>) -> Timed<T> {
    match result {
        Ok(timed) => {
            info!("{} finished in {:.3}s", routine, timed.elapsed_secs());
            timed
        }
        Err(e) => {
            report(routine, &e);
            Timed::degraded()
        }
    }
}

fn report(routine: &str, e: &EtlError) {
    if e.is_input_condition() {
        warn!("{}: {}", routine, e);
    } else {
        error!("{} failed: {}", routine, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_degrading_routines_on_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a fragment").unwrap();
        let integrator = CsvIntegrator::default();

        let table = integrator.merge_table(dir.path());
        assert_eq!(table.value.shape(), (0, 0));
        assert_eq!(table.elapsed, Duration::ZERO);

        let rows = integrator.rows_by_key(dir.path());
        assert!(rows.value.is_empty());
        assert_eq!(rows.elapsed, Duration::ZERO);

        let columns = integrator.columns_by_name(dir.path());
        assert!(columns.value.is_empty());
        assert_eq!(columns.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_try_routines_surface_no_input_files() {
        let dir = tempfile::tempdir().unwrap();
        let integrator = CsvIntegrator::default();

        for code in [
            integrator.try_merge_table(dir.path()).unwrap_err().error_code(),
            integrator.try_rows_by_key(dir.path()).unwrap_err().error_code(),
            integrator
                .try_columns_by_name(dir.path())
                .unwrap_err()
                .error_code(),
        ] {
            assert_eq!(code, "NO_INPUT_FILES");
        }
    }

    #[test]
    fn test_missing_directory_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let integrator = CsvIntegrator::default();

        assert_eq!(
            integrator.try_merge_table(&missing).unwrap_err().error_code(),
            "IO_FAILURE"
        );
        assert_eq!(integrator.merge_table(&missing).elapsed, Duration::ZERO);
    }
}
