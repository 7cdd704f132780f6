//! Configuration types for loading and analysing the series dataset.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Order in which CSV fragments found in a directory are processed.
///
/// Processing order decides which fragment wins when the row-keyed
/// aggregator sees the same key twice, and which side of a merge gets the
/// `_x`/`_y` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FragmentOrder {
    /// Sort fragments by file name.
    #[default]
    Lexical,
    /// Whatever order the operating system lists them in.
    Listing,
}

/// Options shared by every CSV integration routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Column used as join/group key across fragments.
    /// Default: "id"
    pub key_column: String,

    /// Order in which fragments are processed.
    /// Default: Lexical
    pub fragment_order: FragmentOrder,

    /// Number of rows used for schema inference; `None` scans the whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            key_column: "id".to_string(),
            fragment_order: FragmentOrder::default(),
            infer_schema_length: None,
        }
    }
}

/// Configuration for a full extraction and analysis run.
///
/// Use [`EtlConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tmdb_etl::config::{EtlConfig, FragmentOrder};
///
/// let config = EtlConfig::builder()
///     .data_dir("data")
///     .fragment_order(FragmentOrder::Listing)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Directory holding the CSV fragments once the archive is extracted.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Compressed dataset to extract.
    /// Default: "data/TMDB.zip"
    pub archive_path: PathBuf,

    /// Directory holding the plain-text reports.
    /// Default: "docs"
    pub reports_dir: PathBuf,

    /// Report file names, echoed in order.
    /// Default: ["Ejercicio_1.4.txt", "Ejercicio_5.txt"]
    pub report_files: Vec<String>,

    /// Fragment loading options.
    pub load: LoadOptions,

    /// Rows shown for the longest-running series.
    /// Default: 10
    pub top_n: usize,

    /// Entries shown from the poster lookup.
    /// Default: 5
    pub preview_len: usize,

    /// Maximum entries shown from a filtered listing.
    /// Default: 20
    pub listing_limit: usize,

    /// Start year used by the cancelled-series filter.
    /// Default: 2023
    pub cancelled_year: i32,

    /// First decade of the decade/type chart.
    /// Default: 1940
    pub decade_start: i32,

    /// Genres below this share (percent) are folded into "Other".
    /// Default: 1.0
    pub genre_other_threshold: f64,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            archive_path: PathBuf::from("data/TMDB.zip"),
            reports_dir: PathBuf::from("docs"),
            report_files: default_report_files(),
            load: LoadOptions::default(),
            top_n: 10,
            preview_len: 5,
            listing_limit: 20,
            cancelled_year: 2023,
            decade_start: 1940,
            genre_other_threshold: 1.0,
        }
    }
}

fn default_report_files() -> Vec<String> {
    vec!["Ejercicio_1.4.txt".to_string(), "Ejercicio_5.txt".to_string()]
}

impl EtlConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EtlConfigBuilder {
        EtlConfigBuilder::default()
    }

    /// Full paths of the configured reports.
    pub fn report_paths(&self) -> Vec<PathBuf> {
        self.report_files
            .iter()
            .map(|name| self.reports_dir.join(name))
            .collect()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.load.key_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyKeyColumn);
        }

        if !(0.0..=100.0).contains(&self.genre_other_threshold) {
            return Err(ConfigValidationError::InvalidThreshold(
                self.genre_other_threshold,
            ));
        }

        for (field, value) in [
            ("top_n", self.top_n),
            ("preview_len", self.preview_len),
            ("listing_limit", self.listing_limit),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroLimit(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Key column must not be empty")]
    EmptyKeyColumn,

    #[error("Invalid genre threshold: {0} (must be between 0.0 and 100.0)")]
    InvalidThreshold(f64),

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroLimit(String),
}

/// Builder for [`EtlConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EtlConfigBuilder {
    data_dir: Option<PathBuf>,
    archive_path: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    report_files: Option<Vec<String>>,
    key_column: Option<String>,
    fragment_order: Option<FragmentOrder>,
    infer_schema_length: Option<usize>,
    top_n: Option<usize>,
    preview_len: Option<usize>,
    listing_limit: Option<usize>,
    cancelled_year: Option<i32>,
    decade_start: Option<i32>,
    genre_other_threshold: Option<f64>,
}

impl EtlConfigBuilder {
    /// Set the directory holding the CSV fragments.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the archive to extract.
    ///
    /// If not set, `<data_dir>/TMDB.zip` is used.
    pub fn archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    /// Set the directory holding the text reports.
    pub fn reports_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.reports_dir = Some(path.into());
        self
    }

    /// Replace the list of report files.
    pub fn report_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report_files = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the join/group key column.
    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = Some(column.into());
        self
    }

    /// Set the fragment processing order.
    pub fn fragment_order(mut self, order: FragmentOrder) -> Self {
        self.fragment_order = Some(order);
        self
    }

    /// Limit schema inference to the first `rows` rows of each fragment.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn preview_len(mut self, n: usize) -> Self {
        self.preview_len = Some(n);
        self
    }

    pub fn listing_limit(mut self, n: usize) -> Self {
        self.listing_limit = Some(n);
        self
    }

    pub fn cancelled_year(mut self, year: i32) -> Self {
        self.cancelled_year = Some(year);
        self
    }

    pub fn decade_start(mut self, year: i32) -> Self {
        self.decade_start = Some(year);
        self
    }

    /// Set the share (percent) below which genres are grouped as "Other".
    pub fn genre_other_threshold(mut self, pct: f64) -> Self {
        self.genre_other_threshold = Some(pct);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EtlConfig` or an error if validation fails.
    pub fn build(self) -> Result<EtlConfig, ConfigValidationError> {
        let defaults = EtlConfig::default();
        let data_dir = self.data_dir.unwrap_or(defaults.data_dir);
        let archive_path = self
            .archive_path
            .unwrap_or_else(|| data_dir.join("TMDB.zip"));

        let config = EtlConfig {
            data_dir,
            archive_path,
            reports_dir: self.reports_dir.unwrap_or(defaults.reports_dir),
            report_files: self.report_files.unwrap_or(defaults.report_files),
            load: LoadOptions {
                key_column: self.key_column.unwrap_or(defaults.load.key_column),
                fragment_order: self.fragment_order.unwrap_or_default(),
                infer_schema_length: self.infer_schema_length,
            },
            top_n: self.top_n.unwrap_or(defaults.top_n),
            preview_len: self.preview_len.unwrap_or(defaults.preview_len),
            listing_limit: self.listing_limit.unwrap_or(defaults.listing_limit),
            cancelled_year: self.cancelled_year.unwrap_or(defaults.cancelled_year),
            decade_start: self.decade_start.unwrap_or(defaults.decade_start),
            genre_other_threshold: self
                .genre_other_threshold
                .unwrap_or(defaults.genre_other_threshold),
        };

        config.validate()?;
        Ok(config)
    }
}
