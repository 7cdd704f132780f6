use crate::error::Result;
use crate::utils::{date_values, require_columns, string_values};
use chrono::Datelike;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Status value for series that were cancelled.
pub const CANCELED: &str = "Canceled";

/// Columns shown for the Japanese-language listing.
pub const JAPANESE_COLUMNS: [&str; 4] = ["name", "original_name", "networks", "production_companies"];

static MYSTERY_OR_CRIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mystery|crime").expect("Invalid regex: mystery|crime"));

/// Names of English-language series whose overview mentions mystery or crime.
pub fn english_mystery_or_crime(df: &DataFrame) -> Result<Vec<String>> {
    require_columns(df, &["name", "original_language", "overview"])?;

    let names = string_values(df, "name")?;
    let languages = string_values(df, "original_language")?;
    let overviews = string_values(df, "overview")?;

    let matches = names
        .into_iter()
        .zip(languages)
        .zip(overviews)
        .filter_map(|((name, language), overview)| {
            let english = language.is_some_and(|l| l.eq_ignore_ascii_case("en"));
            let topical = overview.is_some_and(|o| MYSTERY_OR_CRIME.is_match(&o));
            if english && topical { name } else { None }
        })
        .collect();
    Ok(matches)
}

/// Names of series first aired in `year` and since cancelled, at most `limit`.
pub fn cancelled_in_year(df: &DataFrame, year: i32, limit: usize) -> Result<Vec<String>> {
    require_columns(df, &["name", "first_air_date", "status"])?;

    let names = string_values(df, "name")?;
    let started = date_values(df, "first_air_date")?;
    let statuses = string_values(df, "status")?;

    let matches = names
        .into_iter()
        .zip(started)
        .zip(statuses)
        .filter_map(|((name, started), status)| {
            let in_year = started.is_some_and(|d| d.year() == year);
            let cancelled = status.as_deref() == Some(CANCELED);
            if in_year && cancelled { name } else { None }
        })
        .take(limit)
        .collect();
    Ok(matches)
}

/// Series with Japanese among their languages, projected to
/// [`JAPANESE_COLUMNS`], at most `limit` rows.
pub fn japanese_series(df: &DataFrame, limit: usize) -> Result<DataFrame> {
    require_columns(df, &["languages"])?;
    require_columns(df, &JAPANESE_COLUMNS)?;

    let mask: BooleanChunked = string_values(df, "languages")?
        .into_iter()
        .map(|langs| langs.is_some_and(|l| l.to_lowercase().contains("ja")))
        .collect();

    let selected = df.filter(&mask)?.select(JAPANESE_COLUMNS)?;
    Ok(selected.head(Some(limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series_table() -> DataFrame {
        df!(
            "name" => &["Sherlock", "Broadchurch", "Dark", "Naruto", "Money Heist", "Midnight Mass"],
            "original_name" => &["Sherlock", "Broadchurch", "Dark", "ナルト", "La casa de papel", "Midnight Mass"],
            "original_language" => &["en", "EN", "de", "ja", "es", "en"],
            "overview" => &[
                Some("A modern update finds the famous sleuth solving Crime in London."),
                Some("A murder MYSTERY in a small town."),
                Some("A missing child and a mystery spanning generations."),
                Some("A young ninja seeks recognition."),
                Some("A criminal mastermind plans a heist."),
                None,
            ],
            "first_air_date" => &[
                Some("2010-07-25"),
                Some("2023-03-02"),
                Some("2023-12-01"),
                None,
                Some("2023-05-02"),
                Some("2023-09-24"),
            ],
            "status" => &["Ended", "Canceled", "Canceled", "Ended", "Canceled", "Ended"],
            "languages" => &[Some("en"), Some("en"), Some("de, en"), Some("JA"), Some("es, ja, ko"), None],
            "networks" => &["BBC One", "ITV1", "Netflix", "TV Tokyo", "Antena 3", "Netflix"],
            "production_companies" => &["Hartswood", "Kudos", "Wiedemann & Berg", "Pierrot", "Vancouver", "Intrepid"],
        )
        .unwrap()
    }

    #[test]
    fn test_english_mystery_or_crime() {
        let names = english_mystery_or_crime(&series_table()).unwrap();
        assert_eq!(names, vec!["Sherlock", "Broadchurch"]);
    }

    #[test]
    fn test_cancelled_in_year() {
        let df = series_table();
        assert_eq!(
            cancelled_in_year(&df, 2023, 20).unwrap(),
            vec!["Broadchurch", "Dark", "Money Heist"]
        );
        assert_eq!(cancelled_in_year(&df, 2023, 1).unwrap(), vec!["Broadchurch"]);
        assert!(cancelled_in_year(&df, 1999, 20).unwrap().is_empty());
    }

    #[test]
    fn test_japanese_series() {
        let result = japanese_series(&series_table(), 20).unwrap();

        assert_eq!(result.shape(), (2, 4));
        let names: Vec<Option<&str>> = result.column("name").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(names, vec![Some("Naruto"), Some("Money Heist")]);

        let limited = japanese_series(&series_table(), 1).unwrap();
        assert_eq!(limited.height(), 1);
    }

    #[test]
    fn test_filters_report_missing_columns() {
        let df = df!("name" => &["Dark"]).unwrap();
        assert_eq!(
            english_mystery_or_crime(&df).unwrap_err().error_code(),
            "MISSING_COLUMN"
        );
        assert_eq!(
            cancelled_in_year(&df, 2023, 5).unwrap_err().error_code(),
            "MISSING_COLUMN"
        );
        assert_eq!(
            japanese_series(&df, 5).unwrap_err().error_code(),
            "MISSING_COLUMN"
        );
    }
}
