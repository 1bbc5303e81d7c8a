#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine and derived indices.
//!
//! Consumes cleaned tables and produces the pincode, state, temporal,
//! and summary views. Aggregation is pure computation over in-memory
//! tables; caching and reload policy live in the pipeline facade.

mod aggregate;
mod indices;
mod summary;
mod temporal;

pub use aggregate::{aggregate_pincodes, aggregate_states};
pub use indices::{stress_index, update_intensity, velocity_index, youth_ratio};
pub use summary::compute_summary;
pub use temporal::compute_temporal;

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, NaiveDate};
    use identity_pulse_records_models::{CleanedRecord, CleanedTable, Dataset, MonthKey};
    use identity_pulse_region::Region;

    use super::*;

    fn record(
        date: (i32, u32, u32),
        state: Region,
        pincode: i64,
        counters: Vec<u64>,
    ) -> CleanedRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let total = counters.iter().sum();
        CleanedRecord {
            date,
            state,
            district: "Test District".to_string(),
            pincode,
            year: date.year(),
            month: date.month(),
            month_year: MonthKey::from_date(date),
            day_of_week: date.weekday().num_days_from_monday(),
            week_of_year: date.iso_week().week(),
            counters,
            total,
        }
    }

    fn table(dataset: Dataset, records: Vec<CleanedRecord>) -> CleanedTable {
        CleanedTable {
            dataset,
            counters_present: true,
            records,
        }
    }

    fn empty(dataset: Dataset) -> CleanedTable {
        CleanedTable::empty(dataset)
    }

    #[test]
    fn pincode_indices_from_known_counters() {
        // 560001: bio 10+5=15 across two days, demo 3+2=5, enrol 2+3+5=10
        let bio = table(
            Dataset::Biometric,
            vec![
                record((2024, 1, 15), Region::Karnataka, 560_001, vec![10, 0]),
                record((2024, 1, 16), Region::Karnataka, 560_001, vec![0, 5]),
            ],
        );
        let demo = table(
            Dataset::Demographic,
            vec![record((2024, 1, 15), Region::Karnataka, 560_001, vec![3, 2])],
        );
        let enrol = table(
            Dataset::Enrolment,
            vec![record(
                (2024, 1, 15),
                Region::Karnataka,
                560_001,
                vec![2, 3, 5],
            )],
        );

        let rows = aggregate_pincodes(&bio, &demo, &enrol);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        assert_eq!(row.state, Region::Karnataka);
        assert_eq!(row.total_bio_updates, 15);
        assert_eq!(row.total_demo_updates, 5);
        assert_eq!(row.total_enrolments, 10);
        assert_eq!(row.total_updates, 20);
        assert_eq!(row.bio_days, 2);

        // 20 / (10 + 1) * 100
        assert!((row.identity_velocity_index - 181.818_181).abs() < 1e-4);
        // 15 / (5 + 1)
        assert!((row.biometric_stress_index - 2.5).abs() < f64::EPSILON);
        // (10 + 3) / (20 + 1)
        assert!((row.youth_update_ratio - 13.0 / 21.0).abs() < 1e-9);
        // 20 / (2 + 1)
        assert!((row.update_intensity - 20.0 / 3.0).abs() < 1e-9);
        // sole row carries the table max velocity
        assert!(row.stability_score.abs() < f64::EPSILON);
    }

    #[test]
    fn outer_join_keeps_single_source_pincodes() {
        let bio = table(
            Dataset::Biometric,
            vec![record((2024, 1, 15), Region::Kerala, 682_001, vec![4, 4])],
        );
        let demo = table(
            Dataset::Demographic,
            vec![record((2024, 1, 15), Region::Punjab, 143_001, vec![2, 1])],
        );
        let enrol = table(
            Dataset::Enrolment,
            vec![record((2024, 1, 15), Region::Goa, 403_001, vec![1, 1, 1])],
        );

        let rows = aggregate_pincodes(&bio, &demo, &enrol);
        assert_eq!(rows.len(), 3);

        let demo_only = rows.iter().find(|r| r.pincode == 143_001).unwrap();
        assert_eq!(demo_only.state, Region::Punjab);
        assert_eq!(demo_only.total_bio_updates, 0);
        assert_eq!(demo_only.bio_days, 0);
        assert_eq!(demo_only.total_demo_updates, 3);
        assert_eq!(demo_only.total_enrolments, 0);

        let enrol_only = rows.iter().find(|r| r.pincode == 403_001).unwrap();
        assert_eq!(enrol_only.total_updates, 0);
        assert_eq!(enrol_only.total_enrolments, 3);
    }

    #[test]
    fn zero_activity_row_has_finite_indices() {
        let enrol = table(
            Dataset::Enrolment,
            vec![record((2024, 1, 15), Region::Bihar, 800_001, vec![0, 0, 0])],
        );

        let rows = aggregate_pincodes(
            &empty(Dataset::Biometric),
            &empty(Dataset::Demographic),
            &enrol,
        );

        let row = &rows[0];
        assert!(row.identity_velocity_index.is_finite());
        assert!(row.biometric_stress_index.is_finite());
        assert!(row.youth_update_ratio.is_finite());
        assert!(row.update_intensity.is_finite());
        assert!((row.stability_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stability_scores_stay_in_range() {
        let bio = table(
            Dataset::Biometric,
            vec![
                record((2024, 1, 15), Region::Karnataka, 560_001, vec![100, 50]),
                record((2024, 1, 15), Region::Karnataka, 560_002, vec![10, 5]),
                record((2024, 1, 15), Region::Kerala, 682_001, vec![1, 0]),
            ],
        );
        let rows = aggregate_pincodes(
            &bio,
            &empty(Dataset::Demographic),
            &empty(Dataset::Enrolment),
        );

        assert!(
            rows.iter()
                .all(|r| r.stability_score >= 0.0 && r.stability_score <= 100.0)
        );
        let busiest = rows.iter().find(|r| r.pincode == 560_001).unwrap();
        assert!(busiest.stability_score.abs() < f64::EPSILON);
    }

    #[test]
    fn state_rows_outer_join_and_rank() {
        let bio = table(
            Dataset::Biometric,
            vec![
                record((2024, 1, 15), Region::Karnataka, 560_001, vec![10, 10]),
                record((2024, 1, 16), Region::Karnataka, 560_002, vec![5, 5]),
            ],
        );
        let enrol = table(
            Dataset::Enrolment,
            vec![record(
                (2024, 1, 15),
                Region::TamilNadu,
                600_001,
                vec![1, 2, 3],
            )],
        );

        let rows = aggregate_states(&bio, &empty(Dataset::Demographic), &enrol);
        assert_eq!(rows.len(), 2);

        let karnataka = rows.iter().find(|r| r.state == Region::Karnataka).unwrap();
        assert_eq!(karnataka.total_bio_updates, 30);
        assert_eq!(karnataka.total_enrolments, 0);

        let tn = rows.iter().find(|r| r.state == Region::TamilNadu).unwrap();
        assert_eq!(tn.total_updates, 0);
        assert_eq!(tn.total_enrolments, 6);
        // no updates anywhere near TN, velocity 0, fully stable
        assert!((tn.stability_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn temporal_daily_unions_dates_with_zero_fill() {
        let bio = table(
            Dataset::Biometric,
            vec![record((2024, 1, 15), Region::Karnataka, 560_001, vec![5, 5])],
        );
        let enrol = table(
            Dataset::Enrolment,
            vec![record(
                (2024, 1, 17),
                Region::Karnataka,
                560_001,
                vec![1, 1, 1],
            )],
        );

        let temporal = compute_temporal(&bio, &empty(Dataset::Demographic), &enrol);

        assert_eq!(temporal.daily.len(), 2);
        assert_eq!(
            temporal.daily[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(temporal.daily[0].total_bio_updates, 10);
        assert_eq!(temporal.daily[0].total_enrolments, 0);
        assert_eq!(temporal.daily[1].total_bio_updates, 0);
        assert_eq!(temporal.daily[1].total_enrolments, 3);
        assert_eq!(temporal.daily[1].total_activity, 3);

        // 2024-01-15 Monday, 2024-01-17 Wednesday
        assert_eq!(temporal.day_of_week.len(), 2);
        assert_eq!(temporal.day_of_week[0].day_of_week, 0);
        assert_eq!(temporal.day_of_week[1].day_of_week, 2);

        assert_eq!(temporal.bio_monthly.len(), 1);
        assert_eq!(temporal.bio_monthly[0].total, 10);
        assert!(temporal.demo_monthly.is_empty());
    }

    #[test]
    fn summary_over_empty_tables_is_zeroed() {
        let summary = compute_summary(
            &empty(Dataset::Biometric),
            &empty(Dataset::Demographic),
            &empty(Dataset::Enrolment),
            &[],
            &[],
        );

        assert_eq!(summary.unique_pincodes, 0);
        assert!(summary.avg_ivi.abs() < f64::EPSILON);
        assert!(summary.date_range.start.is_none());
        assert!(summary.top_state.is_none());
    }

    #[test]
    fn summary_headline_numbers() {
        let bio = table(
            Dataset::Biometric,
            vec![
                record((2024, 1, 15), Region::Karnataka, 560_001, vec![10, 5]),
                record((2024, 2, 1), Region::Kerala, 682_001, vec![2, 2]),
            ],
        );
        let demo = table(
            Dataset::Demographic,
            vec![record((2024, 1, 20), Region::Karnataka, 560_001, vec![3, 1])],
        );
        let enrol = empty(Dataset::Enrolment);

        let pincodes = aggregate_pincodes(&bio, &demo, &enrol);
        let states = aggregate_states(&bio, &demo, &enrol);
        let summary = compute_summary(&bio, &demo, &enrol, &pincodes, &states);

        assert_eq!(summary.total_bio_updates, 19);
        assert_eq!(summary.total_demo_updates, 4);
        assert_eq!(summary.unique_pincodes, 2);
        assert_eq!(summary.unique_states, 2);
        assert_eq!(
            summary.date_range.start,
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(
            summary.date_range.end,
            Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        assert_eq!(summary.top_state, Some(Region::Karnataka));
        assert_eq!(summary.high_stress_state, Some(Region::Kerala));
    }
}
