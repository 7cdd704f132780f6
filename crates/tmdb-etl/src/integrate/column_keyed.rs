use crate::config::LoadOptions;
use crate::error::Result;
use crate::loader::{EmptyFragmentPolicy, fold_fragments};
use crate::types::{ColumnKeyedMap, Timed};
use crate::utils::column_cells;
use std::path::Path;

/// Append each fragment's column values onto a per-column sequence.
///
/// No alignment by key: a column's sequence is the concatenation of that
/// column across the fragments that have it.
pub(super) fn collect_columns(dir: &Path, options: &LoadOptions) -> Result<Timed<ColumnKeyedMap>> {
    fold_fragments(
        dir,
        options,
        EmptyFragmentPolicy::Skip,
        ColumnKeyedMap::new(),
        |columns, fragment| {
            for column in fragment.frame.get_columns() {
                let values = column_cells(column)?;
                columns
                    .entry(column.name().to_string())
                    .or_default()
                    .extend(values);
            }
            Ok(())
        },
    )
}
