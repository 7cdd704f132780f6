//! Chart-ready aggregations. Rendering is left to the consumer; every type
//! here serializes to JSON.

use crate::error::Result;
use crate::utils::{date_values, is_blank, require_columns, string_values};
use chrono::Datelike;
use indexmap::IndexMap;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Label of the bucket collecting genres below the share threshold.
pub const OTHER_GENRE: &str = "Other";

/// Separator between genres in the `genres` column.
const GENRE_SEPARATOR: &str = ", ";

/// Number of series per start year, ascending by year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearCounts {
    pub counts: BTreeMap<i32, usize>,
}

impl YearCounts {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Number of series per decade and `type`, zero-filled.
///
/// Every decade row carries a count for every type seen across all decades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecadeTypeCounts {
    pub types: Vec<String>,
    pub decades: BTreeMap<i32, BTreeMap<String, usize>>,
}

impl DecadeTypeCounts {
    /// Count for one decade and type; zero when either is unknown.
    pub fn get(&self, decade: i32, series_type: &str) -> usize {
        self.decades
            .get(&decade)
            .and_then(|row| row.get(series_type))
            .copied()
            .unwrap_or(0)
    }
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSlice {
    pub genre: String,
    pub percent: f64,
}

/// Genre shares in percent, descending, with [`OTHER_GENRE`] last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenreShare {
    pub slices: Vec<GenreSlice>,
    /// Number of genre assignments the percentages are relative to.
    pub assignments: usize,
}

impl GenreShare {
    pub fn percent_of(&self, genre: &str) -> Option<f64> {
        self.slices
            .iter()
            .find(|s| s.genre == genre)
            .map(|s| s.percent)
    }
}

/// Count series per `first_air_date` year; rows without a valid date are dropped.
pub fn series_per_year(df: &DataFrame) -> Result<YearCounts> {
    let mut counts = BTreeMap::new();
    for date in date_values(df, "first_air_date")?.into_iter().flatten() {
        *counts.entry(date.year()).or_insert(0) += 1;
    }
    Ok(YearCounts { counts })
}

/// Count series per start decade and `type`, for start years `>= since`.
pub fn series_per_decade_and_type(df: &DataFrame, since: i32) -> Result<DecadeTypeCounts> {
    require_columns(df, &["first_air_date", "type"])?;

    let started = date_values(df, "first_air_date")?;
    let types = string_values(df, "type")?;

    let mut seen_types = BTreeSet::new();
    let mut decades: BTreeMap<i32, BTreeMap<String, usize>> = BTreeMap::new();
    for (date, series_type) in started.into_iter().zip(types) {
        let (Some(date), Some(series_type)) = (date, series_type) else {
            continue;
        };
        if date.year() < since {
            continue;
        }
        let decade = date.year().div_euclid(10) * 10;
        *decades
            .entry(decade)
            .or_default()
            .entry(series_type.clone())
            .or_insert(0) += 1;
        seen_types.insert(series_type);
    }

    for row in decades.values_mut() {
        for series_type in &seen_types {
            row.entry(series_type.clone()).or_insert(0);
        }
    }

    Ok(DecadeTypeCounts {
        types: seen_types.into_iter().collect(),
        decades,
    })
}

/// Percentage of genre assignments per genre.
///
/// A series listing several genres counts once in each. Null and empty
/// genre cells are ignored. Genres under `threshold_pct` are summed into
/// [`OTHER_GENRE`].
pub fn genre_share(df: &DataFrame, threshold_pct: f64) -> Result<GenreShare> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for genres in string_values(df, "genres")?.into_iter().flatten() {
        for genre in genres.split(GENRE_SEPARATOR) {
            if is_blank(Some(genre)) {
                continue;
            }
            *counts.entry(genre.trim().to_string()).or_insert(0) += 1;
        }
    }

    let assignments: usize = counts.values().sum();
    if assignments == 0 {
        return Ok(GenreShare::default());
    }

    let mut slices = Vec::with_capacity(counts.len());
    let mut other = 0.0;
    let mut folded = false;
    for (genre, count) in counts {
        let percent = count as f64 / assignments as f64 * 100.0;
        if percent < threshold_pct {
            other += percent;
            folded = true;
        } else {
            slices.push(GenreSlice { genre, percent });
        }
    }

    slices.sort_by(|a, b| {
        b.percent
            .partial_cmp(&a.percent)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.genre.cmp(&b.genre))
    });
    if folded {
        slices.push(GenreSlice {
            genre: OTHER_GENRE.to_string(),
            percent: other,
        });
    }

    Ok(GenreShare {
        slices,
        assignments,
    })
}
