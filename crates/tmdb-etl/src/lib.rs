//! TV-Series Dataset ETL Library
//!
//! Unpacks a compressed TMDB series dataset, integrates its CSV fragments and
//! derives the tables and chart data used in the analysis.
//!
//! # Overview
//!
//! - **Archive extraction**: `.zip`, `.tar.gz` and `.tgz` detected by suffix
//! - **CSV integration**: one directory of fragments folded into a merged
//!   `DataFrame`, a row-keyed map or a column-keyed map, each timed
//! - **Derived views**: time on air, longest-running series, poster lookup
//! - **Filters**: English mystery/crime series, cancelled series of a year,
//!   Japanese-language series
//! - **Chart data**: series per year, per decade and type, genre shares
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tmdb_etl::{CsvIntegrator, EtlConfig, unpack_archive, views};
//!
//! let config = EtlConfig::default();
//! unpack_archive(&config.archive_path);
//!
//! let integrator = CsvIntegrator::new(config.load.clone());
//! let merged = integrator.merge_table(&config.data_dir);
//! println!("Merged in {} s", merged.elapsed_secs());
//!
//! let df = views::add_time_on_air(merged.into_value());
//! let top = views::longest_running(&df, config.top_n)?;
//! println!("{top}");
//! ```
//!
//! # Error handling
//!
//! Fallible operations return [`EtlError`]. The integration routines and the
//! archive/report readers also come in a degrading flavour that logs the
//! error through `tracing` and returns an empty value, so a run continues
//! past a bad input.

pub mod archive;
pub mod config;
pub mod error;
pub mod integrate;
pub mod loader;
pub mod reports;
pub mod types;
pub mod utils;
pub mod views;

// Re-exports for convenient access
pub use archive::{ArchiveFormat, ExtractionReport, extract_archive, unpack_archive};
pub use config::{ConfigValidationError, EtlConfig, EtlConfigBuilder, FragmentOrder, LoadOptions};
pub use error::{EtlError, Result as EtlResult, ResultExt};
pub use integrate::CsvIntegrator;
pub use loader::{EmptyFragmentPolicy, fold_fragments, read_fragment, scan_fragments};
pub use reports::{echo_report, read_report};
pub use types::{CellValue, ColumnKeyedMap, NOT_AVAILABLE, PosterLinks, RowKeyedMap, Timed};
