//! Shared column helpers for the integration routines and the analysis views.
//!
//! Everything here reads a single `DataFrame` column into plain Rust values so
//! that the views can work with `Option<String>`, `Option<NaiveDate>` and
//! [`CellValue`] instead of polars chunked arrays.

use crate::error::{EtlError, Result};
use crate::types::CellValue;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Date layout used by the dataset (`2023-05-01`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days between 0001-01-01 and 1970-01-01, for polars `Date` physical values.
pub(crate) const EPOCH_DAYS_FROM_CE: i32 = 719_163;

// =============================================================================
// Column presence
// =============================================================================

/// Fail with `MissingColumn` for the first of `names` not present in `df`.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    match names.iter().find(|name| !has_column(df, name)) {
        Some(name) => Err(EtlError::MissingColumn((*name).to_string())),
        None => Ok(()),
    }
}

/// Whether `df` has a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

// =============================================================================
// Column extraction
// =============================================================================

/// Every value of a column as a [`CellValue`], in row order.
pub fn column_cells(column: &Column) -> Result<Vec<CellValue>> {
    (0..column.len())
        .map(|i| Ok(CellValue::from(column.get(i)?)))
        .collect()
}

/// A column rendered as optional strings; non-text columns are cast first.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    require_columns(df, &[name])?;
    let casted = df.column(name)?.cast(&DataType::String)?;
    let values = casted
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// A column read as calendar dates; unparsable or null cells become `None`.
///
/// `Date`/`Datetime` columns are converted through polars' `Date` type;
/// anything else is read as text and parsed with [`DATE_FORMAT`].
pub fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    require_columns(df, &[name])?;
    let column = df.column(name)?;

    if !is_date_dtype(column.dtype()) {
        let text = column.cast(&DataType::String)?;
        let values = text
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_date))
            .collect();
        return Ok(values);
    }

    let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    let values = days
        .as_materialized_series()
        .i32()?
        .into_iter()
        .map(|v| v.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + EPOCH_DAYS_FROM_CE)))
        .collect();
    Ok(values)
}

/// Parse a `YYYY-MM-DD` date, tolerating a trailing time component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|head| NaiveDate::parse_from_str(head, DATE_FORMAT).ok())
        })
}

/// Days since 1970-01-01, the physical value of a polars `Date`.
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Null or empty (after trimming) text.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType carries a calendar date.
#[inline]
pub fn is_date_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "id" => &[1i64, 2, 3],
            "first_air_date" => &[Some("2020-01-15"), None, Some("not a date")],
            "score" => &[Some(1.5f64), None, Some(3.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_require_columns() {
        let df = sample();
        assert!(require_columns(&df, &["id", "score"]).is_ok());
        let err = require_columns(&df, &["id", "homepage"]).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn(c) if c == "homepage"));
        assert!(has_column(&df, "score"));
        assert!(!has_column(&df, "name"));
    }

    #[test]
    fn test_column_cells() {
        let df = sample();
        let cells = column_cells(df.column("score").unwrap()).unwrap();
        assert_eq!(
            cells,
            vec![CellValue::Float(1.5), CellValue::Null, CellValue::Float(3.0)]
        );
    }

    #[test]
    fn test_string_values_casts_numbers() {
        let df = sample();
        let ids = string_values(&df, "id").unwrap();
        assert_eq!(
            ids,
            vec![
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string())
            ]
        );
    }

    #[test]
    fn test_date_values_from_text() {
        let df = sample();
        let dates = date_values(&df, "first_air_date").unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(dates[1], None);
        assert_eq!(dates[2], None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1999-12-31"), NaiveDate::from_ymd_opt(1999, 12, 31));
        assert_eq!(
            parse_date("2004-09-22 00:00:00"),
            NaiveDate::from_ymd_opt(2004, 9, 22)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("22/09/2004"), None);
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1970, 1, 31).unwrap()), 30);
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("/poster.jpg")));
    }

    #[test]
    fn test_is_date_dtype() {
        assert!(is_date_dtype(&DataType::Date));
        assert!(!is_date_dtype(&DataType::Time));
        assert!(!is_date_dtype(&DataType::String));
    }

    #[test]
    fn test_date_values_from_date_column() {
        let typed = Series::new("first_air_date".into(), &[Some(18_276i32), None])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![typed.into()]).unwrap();

        let dates = date_values(&df, "first_air_date").unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(dates[1], None);
    }

    #[test]
    fn test_date_values_from_numbers_are_null() {
        let dates = date_values(&sample(), "id").unwrap();
        assert_eq!(dates, vec![None, None, None]);
    }
}
