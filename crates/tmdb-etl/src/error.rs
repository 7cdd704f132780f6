//! Error types for archive extraction, fragment loading and analysis views.
//!
//! Every fallible operation in the crate returns [`EtlError`]. The public
//! "degrading" entry points (for example [`crate::CsvIntegrator::merge_table`])
//! catch these errors at their boundary, log them and hand back an empty
//! result instead, so a single bad input never aborts a whole run.
//!
//! Errors serialize as `{ code, message }` so they can be dumped next to the
//! JSON chart data.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the loader and the analysis views.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Archive or report file is absent.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Archive suffix is not one of `.zip`, `.tar.gz`, `.tgz`.
    #[error("Unsupported archive format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Directory contains no CSV fragments.
    #[error("No CSV files found in {}", .0.display())]
    NoInputFiles(PathBuf),

    /// Zero-byte CSV fragment where none is tolerated.
    #[error("CSV file {} is empty", .0.display())]
    EmptyFragment(PathBuf),

    /// Malformed CSV content.
    #[error("Failed to parse CSV {}: {reason}", .path.display())]
    ParseError { path: PathBuf, reason: String },

    /// Column required by a computation is absent.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// Any other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error outside of CSV parsing (joins, casts, filters).
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Corrupt or unreadable zip archive.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EtlError>,
    },
}

impl EtlError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EtlError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::NoInputFiles(_) => "NO_INPUT_FILES",
            Self::EmptyFragment(_) => "EMPTY_FRAGMENT",
            Self::ParseError { .. } => "PARSE_ERROR",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::Io(_) => "IO_FAILURE",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Zip(_) => "ZIP_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error describes an expected input condition rather than a failure.
    ///
    /// Degrading callers log these at `warn` and everything else at `error`.
    pub fn is_input_condition(&self) -> bool {
        match self {
            Self::NotFound(_)
            | Self::UnsupportedFormat(_)
            | Self::NoInputFiles(_)
            | Self::EmptyFragment(_)
            | Self::MissingColumn(_) => true,
            Self::WithContext { source, .. } => source.is_input_condition(),
            _ => false,
        }
    }

    /// Build a parse error for a fragment from the underlying reader error.
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EtlError::ParseError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl Serialize for EtlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EtlError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for loader and view operations.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Polars(e).with_context(context))
    }
}

static_assertions::assert_impl_all!(EtlError: Send, Sync);
