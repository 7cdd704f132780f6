//! Analysis views over the merged series table.
//!
//! - [`derived`]: air-time columns, longest-running series, poster lookup
//! - [`filters`]: name listings and projections selected by row predicates
//! - [`charts`]: chart-ready counts and shares (data only)

pub mod charts;
pub mod derived;
pub mod filters;

pub use charts::{
    DecadeTypeCounts, GenreShare, GenreSlice, OTHER_GENRE, YearCounts, genre_share,
    series_per_decade_and_type, series_per_year,
};
pub use derived::{
    AIR_DAYS, TIME_ON_AIR, add_time_on_air, longest_running, poster_lookup, preview,
    try_add_time_on_air,
};
pub use filters::{cancelled_in_year, english_mystery_or_crime, japanese_series};
