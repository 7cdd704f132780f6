use crate::error::Result;
use crate::types::{NOT_AVAILABLE, PosterLinks};
use crate::utils::{date_values, epoch_days, require_columns, string_values};
use indexmap::IndexMap;
use polars::prelude::*;
use tracing::{debug, warn};

pub const FIRST_AIR_DATE: &str = "first_air_date";
pub const LAST_AIR_DATE: &str = "last_air_date";
pub const TIME_ON_AIR: &str = "time_on_air";
pub const AIR_DAYS: &str = "air_days";

const MS_PER_DAY: i64 = 86_400_000;

/// Add `time_on_air` (duration) and `air_days` (whole days) to the table.
///
/// Both air-date columns are rewritten as `Date`; cells that do not parse as
/// `YYYY-MM-DD` become null, and so does the derived value for that row.
pub fn try_add_time_on_air(df: &DataFrame) -> Result<DataFrame> {
    require_columns(df, &[FIRST_AIR_DATE, LAST_AIR_DATE])?;

    let first = date_values(df, FIRST_AIR_DATE)?;
    let last = date_values(df, LAST_AIR_DATE)?;

    let air_days: Vec<Option<i64>> = first
        .iter()
        .zip(&last)
        .map(|(start, end)| match (start, end) {
            (Some(start), Some(end)) => Some((*end - *start).num_days()),
            _ => None,
        })
        .collect();
    let durations: Vec<Option<i64>> = air_days.iter().map(|d| d.map(|d| d * MS_PER_DAY)).collect();

    let mut out = df.clone();
    out.with_column(date_series(FIRST_AIR_DATE, &first)?)?;
    out.with_column(date_series(LAST_AIR_DATE, &last)?)?;
    out.with_column(
        Series::new(TIME_ON_AIR.into(), durations)
            .cast(&DataType::Duration(TimeUnit::Milliseconds))?,
    )?;
    out.with_column(Series::new(AIR_DAYS.into(), air_days))?;

    debug!("Added {} and {} to {} rows", TIME_ON_AIR, AIR_DAYS, out.height());
    Ok(out)
}

/// [`try_add_time_on_air`], returning the table unchanged when it fails.
pub fn add_time_on_air(df: DataFrame) -> DataFrame {
    match try_add_time_on_air(&df) {
        Ok(extended) => extended,
        Err(e) => {
            warn!("Cannot compute {}: {}", TIME_ON_AIR, e);
            df
        }
    }
}

fn date_series(name: &str, dates: &[Option<chrono::NaiveDate>]) -> Result<Series> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(epoch_days)).collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}

/// The `n` rows on air the longest, nulls last.
pub fn longest_running(df: &DataFrame, n: usize) -> Result<DataFrame> {
    require_columns(df, &[TIME_ON_AIR])?;
    let sorted = df.sort(
        [TIME_ON_AIR],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )?;
    Ok(sorted.head(Some(n)))
}

/// Series name -> homepage and poster path, in table row order.
///
/// Null or empty fields become [`NOT_AVAILABLE`]. A name seen twice keeps its
/// first position and takes the later row's links.
pub fn poster_lookup(df: &DataFrame) -> Result<IndexMap<String, PosterLinks>> {
    require_columns(df, &["name", "homepage", "poster_path"])?;

    let names = string_values(df, "name")?;
    let homepages = string_values(df, "homepage")?;
    let posters = string_values(df, "poster_path")?;

    let mut lookup = IndexMap::with_capacity(names.len());
    for ((name, homepage), poster_path) in names.into_iter().zip(homepages).zip(posters) {
        lookup.insert(
            or_not_available(name),
            PosterLinks {
                homepage: or_not_available(homepage),
                poster_path: or_not_available(poster_path),
            },
        );
    }
    Ok(lookup)
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// The first `n` entries of an ordered map.
pub fn preview<K, V>(map: &IndexMap<K, V>, n: usize) -> Vec<(&K, &V)> {
    map.iter().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series_table() -> DataFrame {
        df!(
            "id" => &[1i64, 2, 3, 4],
            "name" => &[Some("Dark"), Some("Lost"), Some("Dark"), None],
            "homepage" => &[Some("https://dark.example"), Some(""), None, Some("https://x.example")],
            "poster_path" => &[Some("/dark.jpg"), None, Some("/dark2.jpg"), Some("")],
            "first_air_date" => &[Some("2017-12-01"), Some("2004-09-22"), Some("bad"), None],
            "last_air_date" => &[Some("2020-06-27"), Some("2010-05-23"), Some("2020-01-01"), Some("2020-01-01")],
        )
        .unwrap()
    }

    #[test]
    fn test_add_time_on_air() {
        let df = try_add_time_on_air(&series_table()).unwrap();

        assert_eq!(df.column(FIRST_AIR_DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(
            df.column(TIME_ON_AIR).unwrap().dtype(),
            &DataType::Duration(TimeUnit::Milliseconds)
        );
        let days: Vec<Option<i64>> = df
            .column(AIR_DAYS)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(days, vec![Some(939), Some(2069), None, None]);
    }

    #[test]
    fn test_add_time_on_air_without_dates_is_unchanged() {
        let df = df!("id" => &[1i64], "first_air_date" => &["2020-01-01"]).unwrap();
        let err = try_add_time_on_air(&df).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_COLUMN");

        let same = add_time_on_air(df.clone());
        assert!(same.equals(&df));
    }

    #[test]
    fn test_longest_running_puts_nulls_last() {
        let df = try_add_time_on_air(&series_table()).unwrap();
        let top = longest_running(&df, 3).unwrap();

        let ids: Vec<Option<i64>> = top.column("id").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn test_longest_running_requires_duration() {
        let err = longest_running(&series_table(), 5).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_COLUMN");
    }

    #[test]
    fn test_poster_lookup() {
        let lookup = poster_lookup(&series_table()).unwrap();

        let names: Vec<_> = lookup.keys().cloned().collect();
        assert_eq!(names, vec!["Dark", "Lost", NOT_AVAILABLE]);
        assert_eq!(
            lookup["Dark"],
            PosterLinks {
                homepage: NOT_AVAILABLE.to_string(),
                poster_path: "/dark2.jpg".to_string(),
            }
        );
        assert_eq!(lookup["Lost"].homepage, NOT_AVAILABLE);
        assert_eq!(lookup["Lost"].poster_path, NOT_AVAILABLE);
        assert_eq!(lookup[NOT_AVAILABLE].poster_path, NOT_AVAILABLE);
    }

    #[test]
    fn test_poster_lookup_missing_column() {
        let df = df!("name" => &["Dark"], "homepage" => &["x"]).unwrap();
        let err = poster_lookup(&df).unwrap_err();
        assert!(err.to_string().contains("poster_path"));
    }

    #[test]
    fn test_preview() {
        let lookup = poster_lookup(&series_table()).unwrap();
        let first_two = preview(&lookup, 2);
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[0].0, "Dark");
        assert_eq!(preview(&lookup, 10).len(), 3);
    }
}
