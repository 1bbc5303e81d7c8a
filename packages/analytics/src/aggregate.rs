//! Pincode and state aggregation.
//!
//! Each aggregate is an outer join of the three cleaned tables on the
//! grouping key: a key present in any one source produces a row, with
//! the counters of absent sources zero-filled. Rows are never dropped
//! for missing a source.

#![allow(clippy::cast_possible_truncation)]

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use identity_pulse_analytics_models::{PincodeAggregate, StateAggregate};
use identity_pulse_records_models::{CleanedRecord, CleanedTable};
use identity_pulse_region::Region;

use crate::indices;

#[derive(Default)]
struct CounterSums {
    bio_age_5_17: u64,
    bio_age_17_plus: u64,
    total_bio_updates: u64,
    demo_age_5_17: u64,
    demo_age_17_plus: u64,
    total_demo_updates: u64,
    enrol_age_0_5: u64,
    enrol_age_5_17: u64,
    enrol_age_18_plus: u64,
    total_enrolments: u64,
}

impl CounterSums {
    fn add_bio(&mut self, rec: &CleanedRecord) {
        self.bio_age_5_17 += counter(rec, 0);
        self.bio_age_17_plus += counter(rec, 1);
        self.total_bio_updates += rec.total;
    }

    fn add_demo(&mut self, rec: &CleanedRecord) {
        self.demo_age_5_17 += counter(rec, 0);
        self.demo_age_17_plus += counter(rec, 1);
        self.total_demo_updates += rec.total;
    }

    fn add_enrol(&mut self, rec: &CleanedRecord) {
        self.enrol_age_0_5 += counter(rec, 0);
        self.enrol_age_5_17 += counter(rec, 1);
        self.enrol_age_18_plus += counter(rec, 2);
        self.total_enrolments += rec.total;
    }
}

/// Counter value at a declared column position, zero when the source
/// lacked the column.
fn counter(rec: &CleanedRecord, idx: usize) -> u64 {
    rec.counters.get(idx).copied().unwrap_or(0)
}

struct PincodeAcc {
    state: Region,
    district: String,
    sums: CounterSums,
    bio_dates: BTreeSet<NaiveDate>,
}

impl PincodeAcc {
    fn new(rec: &CleanedRecord) -> Self {
        Self {
            state: rec.state,
            district: rec.district.clone(),
            sums: CounterSums::default(),
            bio_dates: BTreeSet::new(),
        }
    }
}

/// Builds the pincode-granularity aggregate across the three cleaned
/// tables, indices included.
#[must_use]
pub fn aggregate_pincodes(
    bio: &CleanedTable,
    demo: &CleanedTable,
    enrol: &CleanedTable,
) -> Vec<PincodeAggregate> {
    let mut groups: BTreeMap<i64, PincodeAcc> = BTreeMap::new();

    // Insertion order fixes each pincode's state and district: the
    // biometric source wins, then demographic, then enrolment.
    for rec in &bio.records {
        let acc = groups
            .entry(rec.pincode)
            .or_insert_with(|| PincodeAcc::new(rec));
        acc.sums.add_bio(rec);
        acc.bio_dates.insert(rec.date);
    }
    for rec in &demo.records {
        groups
            .entry(rec.pincode)
            .or_insert_with(|| PincodeAcc::new(rec))
            .sums
            .add_demo(rec);
    }
    for rec in &enrol.records {
        groups
            .entry(rec.pincode)
            .or_insert_with(|| PincodeAcc::new(rec))
            .sums
            .add_enrol(rec);
    }

    let mut rows: Vec<PincodeAggregate> = groups
        .into_iter()
        .map(|(pincode, acc)| {
            let s = acc.sums;
            let total_updates = s.total_bio_updates + s.total_demo_updates;
            let bio_days = acc.bio_dates.len() as u64;
            PincodeAggregate {
                pincode,
                state: acc.state,
                district: acc.district,
                bio_age_5_17: s.bio_age_5_17,
                bio_age_17_plus: s.bio_age_17_plus,
                total_bio_updates: s.total_bio_updates,
                bio_days,
                demo_age_5_17: s.demo_age_5_17,
                demo_age_17_plus: s.demo_age_17_plus,
                total_demo_updates: s.total_demo_updates,
                enrol_age_0_5: s.enrol_age_0_5,
                enrol_age_5_17: s.enrol_age_5_17,
                enrol_age_18_plus: s.enrol_age_18_plus,
                total_enrolments: s.total_enrolments,
                total_updates,
                identity_velocity_index: indices::velocity_index(
                    total_updates,
                    s.total_enrolments,
                ),
                biometric_stress_index: indices::stress_index(
                    s.total_bio_updates,
                    s.total_demo_updates,
                ),
                youth_update_ratio: indices::youth_ratio(
                    s.bio_age_5_17,
                    s.demo_age_5_17,
                    total_updates,
                ),
                update_intensity: indices::update_intensity(total_updates, bio_days),
                stability_score: 0.0,
            }
        })
        .collect();

    indices::apply_stability(
        &mut rows,
        |row| row.identity_velocity_index,
        |row, score| row.stability_score = score,
    );

    log::debug!("aggregated {} pincode rows", rows.len());
    rows
}

/// Builds the state-granularity aggregate across the three cleaned
/// tables, indices included.
#[must_use]
pub fn aggregate_states(
    bio: &CleanedTable,
    demo: &CleanedTable,
    enrol: &CleanedTable,
) -> Vec<StateAggregate> {
    let mut groups: BTreeMap<Region, CounterSums> = BTreeMap::new();

    for rec in &bio.records {
        groups.entry(rec.state).or_default().add_bio(rec);
    }
    for rec in &demo.records {
        groups.entry(rec.state).or_default().add_demo(rec);
    }
    for rec in &enrol.records {
        groups.entry(rec.state).or_default().add_enrol(rec);
    }

    let mut rows: Vec<StateAggregate> = groups
        .into_iter()
        .map(|(state, s)| {
            let total_updates = s.total_bio_updates + s.total_demo_updates;
            StateAggregate {
                state,
                bio_age_5_17: s.bio_age_5_17,
                bio_age_17_plus: s.bio_age_17_plus,
                total_bio_updates: s.total_bio_updates,
                demo_age_5_17: s.demo_age_5_17,
                demo_age_17_plus: s.demo_age_17_plus,
                total_demo_updates: s.total_demo_updates,
                enrol_age_0_5: s.enrol_age_0_5,
                enrol_age_5_17: s.enrol_age_5_17,
                enrol_age_18_plus: s.enrol_age_18_plus,
                total_enrolments: s.total_enrolments,
                total_updates,
                identity_velocity_index: indices::velocity_index(
                    total_updates,
                    s.total_enrolments,
                ),
                biometric_stress_index: indices::stress_index(
                    s.total_bio_updates,
                    s.total_demo_updates,
                ),
                youth_update_ratio: indices::youth_ratio(
                    s.bio_age_5_17,
                    s.demo_age_5_17,
                    total_updates,
                ),
                stability_score: 0.0,
            }
        })
        .collect();

    indices::apply_stability(
        &mut rows,
        |row| row.identity_velocity_index,
        |row, score| row.stability_score = score,
    );

    log::debug!("aggregated {} state rows", rows.len());
    rows
}
