#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cleaning and derived-totals stages.
//!
//! Turns raw partition rows into [`CleanedRecord`]s: state labels are
//! resolved against the canonical region set, dates are parsed with a
//! primary and fallback format, calendar features are derived, and
//! per-record totals are summed from the declared counter columns.
//!
//! Rows that cannot be resolved or parsed are dropped and counted —
//! data quality is a reporting concern here, never an error. An empty
//! input table cleans to an empty output table.
//!
//! [`CleanedRecord`]: identity_pulse_records_models::CleanedRecord

mod clean;
mod totals;

pub use clean::{CleaningReport, clean_table};
pub use totals::compute_totals;

use identity_pulse_records_models::{CleanedTable, RawTable};

/// Runs the cleaning and derived-totals stages back to back, using
/// today as the upper bound for plausible dates.
#[must_use]
pub fn clean_and_total(raw: &RawTable) -> (CleanedTable, CleaningReport) {
    let today = chrono::Local::now().date_naive();
    let (mut table, report) = clean_table(raw, today);
    compute_totals(&mut table);
    (table, report)
}
