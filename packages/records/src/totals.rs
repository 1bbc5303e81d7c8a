//! The derived-totals stage.
//!
//! Each dataset's per-record "total" is the sum of its declared
//! age-bracket counters: two brackets for biometric and demographic
//! updates, three for enrolments. The stage short-circuits on the
//! table's schema declaration — a table loaded without its declared
//! counter columns keeps zero totals, matching the independent-load
//! contract where any one dataset may legitimately be empty or partial.

use identity_pulse_records_models::CleanedTable;

/// Fills in the per-record `total` field from the declared counters.
pub fn compute_totals(table: &mut CleanedTable) {
    if !table.counters_present {
        log::debug!(
            "{}: declared counter columns absent, totals stay zero",
            table.dataset
        );
        return;
    }

    for record in &mut table.records {
        record.total = record.counters.iter().sum();
    }
}
