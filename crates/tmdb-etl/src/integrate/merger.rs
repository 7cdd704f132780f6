use crate::config::LoadOptions;
use crate::error::{Result, ResultExt};
use crate::loader::{EmptyFragmentPolicy, fold_fragments};
use crate::types::Timed;
use crate::utils::require_columns;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Suffix for the accumulated side of a clashing column.
const LEFT_SUFFIX: &str = "_x";
/// Suffix for the incoming fragment's side of a clashing column.
const RIGHT_SUFFIX: &str = "_y";

/// Full outer join of every fragment in `dir` on the key column, sorted by key.
pub(super) fn merge_fragments(dir: &Path, options: &LoadOptions) -> Result<Timed<DataFrame>> {
    let key = options.key_column.as_str();

    let merged = fold_fragments(
        dir,
        options,
        EmptyFragmentPolicy::AbortIfFirst,
        None,
        |acc: &mut Option<DataFrame>, fragment| {
            require_columns(&fragment.frame, &[key])?;
            let next = match acc.take() {
                None => fragment.frame,
                Some(left) => join_on_key(left, fragment.frame, key)
                    .context(format!("Joining {}", fragment.path.display()))?,
            };
            debug!(
                "Merged {} -> {} rows x {} columns",
                fragment.path.display(),
                next.height(),
                next.width()
            );
            *acc = Some(next);
            Ok(())
        },
    )?;

    let table = match merged.value {
        Some(df) => df.sort([key], SortMultipleOptions::default())?,
        None => DataFrame::empty(),
    };
    Ok(Timed::new(table, merged.elapsed))
}

/// Outer-join `right` onto `left`, keeping both sides of clashing columns.
///
/// Non-key columns present on both sides are renamed `<name>_x` (left) and
/// `<name>_y` (right). Null keys match each other. Numeric keys of differing
/// dtypes are joined as numbers; any other key mismatch is joined as text.
fn join_on_key(mut left: DataFrame, mut right: DataFrame, key: &str) -> Result<DataFrame> {
    for name in overlapping_columns(&left, &right, key) {
        left.rename(&name, format!("{name}{LEFT_SUFFIX}").into())?;
        right.rename(&name, format!("{name}{RIGHT_SUFFIX}").into())?;
    }

    let key_dtype = common_key_dtype(left.column(key)?.dtype(), right.column(key)?.dtype());
    let (mut left, mut right) = (left.lazy(), right.lazy());
    if let Some(dtype) = key_dtype {
        debug!("Key column '{}' differs in type, joining as {}", key, dtype);
        left = left.with_column(col(key).cast(dtype.clone()));
        right = right.with_column(col(key).cast(dtype));
    }

    let mut args = JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns);
    args.nulls_equal = true;

    let joined = left
        .join(right, [col(key)], [col(key)], args)
        .collect()
        .context(format!("Outer join on '{key}'"))?;
    Ok(joined)
}

/// The dtype both key columns are cast to, or `None` when they already agree.
fn common_key_dtype(left: &DataType, right: &DataType) -> Option<DataType> {
    if left == right {
        return None;
    }
    let numeric = |d: &DataType| d.is_integer() || d.is_float();
    Some(match (numeric(left), numeric(right)) {
        (true, true) if left.is_float() || right.is_float() => DataType::Float64,
        (true, true) => DataType::Int64,
        _ => DataType::String,
    })
}

fn overlapping_columns(left: &DataFrame, right: &DataFrame, key: &str) -> Vec<String> {
    let right_names = right.get_column_names();
    left.get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != key && right_names.contains(name))
        .map(|name| name.to_string())
        .collect()
}
