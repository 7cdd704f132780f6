//! CSV fragment discovery, loading, and the shared fold driver.
//!
//! All three integration routines in [`crate::integrate`] go through
//! [`fold_fragments`]: it scans the directory, applies the routine's
//! empty-fragment policy, loads every fragment into a `DataFrame` and hands it
//! to a fold closure, timing the whole run.

mod fold;
mod read;
mod scan;

pub use fold::{EmptyFragmentPolicy, fold_fragments};
pub use read::{Fragment, is_empty_file, read_fragment};
pub use scan::scan_fragments;
