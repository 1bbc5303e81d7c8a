//! Dashboard summary statistics.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::collections::BTreeSet;

use identity_pulse_analytics_models::{
    DateRange, PincodeAggregate, StateAggregate, SummaryStats,
};
use identity_pulse_records_models::CleanedTable;

/// Condenses the cleaned tables and finished aggregates into the
/// headline numbers. All-empty inputs yield the zeroed default.
#[must_use]
pub fn compute_summary(
    bio: &CleanedTable,
    demo: &CleanedTable,
    enrol: &CleanedTable,
    pincodes: &[PincodeAggregate],
    states: &[StateAggregate],
) -> SummaryStats {
    let unique_states = bio
        .records
        .iter()
        .map(|r| r.state)
        .collect::<BTreeSet<_>>()
        .len() as u64;
    let unique_districts = bio
        .records
        .iter()
        .map(|r| r.district.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u64;

    let (avg_ivi, avg_bsi) = if pincodes.is_empty() {
        (0.0, 0.0)
    } else {
        let n = pincodes.len() as f64;
        (
            pincodes.iter().map(|p| p.identity_velocity_index).sum::<f64>() / n,
            pincodes.iter().map(|p| p.biometric_stress_index).sum::<f64>() / n,
        )
    };

    SummaryStats {
        total_bio_updates: bio.grand_total(),
        total_demo_updates: demo.grand_total(),
        total_enrolments: enrol.grand_total(),
        unique_pincodes: pincodes.len() as u64,
        unique_states,
        unique_districts,
        date_range: date_range(&[bio, demo, enrol]),
        avg_ivi,
        avg_bsi,
        top_state: max_by_metric(states, |s| s.total_updates as f64),
        high_stress_state: max_by_metric(states, |s| s.biometric_stress_index),
    }
}

fn date_range(tables: &[&CleanedTable]) -> DateRange {
    let dates = tables
        .iter()
        .flat_map(|t| t.records.iter().map(|r| r.date));
    DateRange {
        start: dates.clone().min(),
        end: dates.max(),
    }
}

fn max_by_metric(
    states: &[StateAggregate],
    metric: impl Fn(&StateAggregate) -> f64,
) -> Option<identity_pulse_region::Region> {
    states
        .iter()
        .max_by(|a, b| metric(a).total_cmp(&metric(b)))
        .map(|s| s.state)
}
