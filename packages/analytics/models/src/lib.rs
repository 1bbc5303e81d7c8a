#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate and summary result types for registry analytics.
//!
//! These are the rows the aggregation engine produces and every
//! downstream consumer (dashboard, AI agent context, forecasting)
//! reads. Indices are always recomputed from the summed counters,
//! never carried over from a previous aggregation.

use chrono::NaiveDate;
use identity_pulse_records_models::MonthKey;
use identity_pulse_region::Region;
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// One row per distinct pincode, counters outer-joined across the
/// three source datasets (missing sources zero-filled, never dropped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PincodeAggregate {
    /// Postal code.
    pub pincode: i64,
    /// State of the pincode, from the first source that carried it.
    pub state: Region,
    /// District of the pincode, from the first source that carried it.
    pub district: String,
    /// Summed biometric 5-17 bracket.
    pub bio_age_5_17: u64,
    /// Summed biometric 17+ bracket.
    pub bio_age_17_plus: u64,
    /// Summed biometric update total.
    pub total_bio_updates: u64,
    /// Distinct dates with biometric activity.
    pub bio_days: u64,
    /// Summed demographic 5-17 bracket.
    pub demo_age_5_17: u64,
    /// Summed demographic 17+ bracket.
    pub demo_age_17_plus: u64,
    /// Summed demographic update total.
    pub total_demo_updates: u64,
    /// Summed enrolment 0-5 bracket.
    pub enrol_age_0_5: u64,
    /// Summed enrolment 5-17 bracket.
    pub enrol_age_5_17: u64,
    /// Summed enrolment 18+ bracket.
    pub enrol_age_18_plus: u64,
    /// Summed enrolment total.
    pub total_enrolments: u64,
    /// `total_bio_updates + total_demo_updates`.
    pub total_updates: u64,
    /// Identity velocity index.
    pub identity_velocity_index: f64,
    /// Biometric stress index.
    pub biometric_stress_index: f64,
    /// Youth update ratio.
    pub youth_update_ratio: f64,
    /// Updates per biometric-active day.
    pub update_intensity: f64,
    /// Stability score, normalized against this table's max velocity.
    pub stability_score: f64,
}

/// One row per canonical region, counters outer-joined across the
/// three source datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateAggregate {
    /// Canonical region.
    pub state: Region,
    /// Summed biometric 5-17 bracket.
    pub bio_age_5_17: u64,
    /// Summed biometric 17+ bracket.
    pub bio_age_17_plus: u64,
    /// Summed biometric update total.
    pub total_bio_updates: u64,
    /// Summed demographic 5-17 bracket.
    pub demo_age_5_17: u64,
    /// Summed demographic 17+ bracket.
    pub demo_age_17_plus: u64,
    /// Summed demographic update total.
    pub total_demo_updates: u64,
    /// Summed enrolment 0-5 bracket.
    pub enrol_age_0_5: u64,
    /// Summed enrolment 5-17 bracket.
    pub enrol_age_5_17: u64,
    /// Summed enrolment 18+ bracket.
    pub enrol_age_18_plus: u64,
    /// Summed enrolment total.
    pub total_enrolments: u64,
    /// `total_bio_updates + total_demo_updates`.
    pub total_updates: u64,
    /// Identity velocity index.
    pub identity_velocity_index: f64,
    /// Biometric stress index.
    pub biometric_stress_index: f64,
    /// Youth update ratio.
    pub youth_update_ratio: f64,
    /// Stability score, normalized against this table's max velocity.
    pub stability_score: f64,
}

/// Combined activity for one calendar date, across all three sources.
///
/// Doubles as the data contract consumed by the forecasting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    /// The date.
    pub date: NaiveDate,
    /// Biometric update total for the date.
    pub total_bio_updates: u64,
    /// Demographic update total for the date.
    pub total_demo_updates: u64,
    /// Enrolment total for the date.
    pub total_enrolments: u64,
    /// Sum of the three.
    pub total_activity: u64,
}

/// Summed activity for one day of the week (0 = Monday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekActivity {
    /// Day of week, 0 = Monday through 6 = Sunday.
    pub day_of_week: u32,
    /// Biometric update total.
    pub total_bio_updates: u64,
    /// Demographic update total.
    pub total_demo_updates: u64,
    /// Enrolment total.
    pub total_enrolments: u64,
}

/// Per-source monthly sum, keyed by year-month period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// Year-month period.
    pub month: MonthKey,
    /// Summed total for the period.
    pub total: u64,
}

/// The three temporal views: daily, day-of-week, and monthly per
/// source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAnalytics {
    /// One row per distinct calendar date, ascending.
    pub daily: Vec<DailyActivity>,
    /// One row per day of week present in the data.
    pub day_of_week: Vec<DayOfWeekActivity>,
    /// Monthly biometric update sums, ascending.
    pub bio_monthly: Vec<MonthlyTotal>,
    /// Monthly demographic update sums, ascending.
    pub demo_monthly: Vec<MonthlyTotal>,
    /// Monthly enrolment sums, ascending.
    pub enrol_monthly: Vec<MonthlyTotal>,
}

/// Observed date range of the loaded data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Earliest date, if any data is loaded.
    pub start: Option<NaiveDate>,
    /// Latest date, if any data is loaded.
    pub end: Option<NaiveDate>,
}

/// Dashboard-level summary statistics.
///
/// All-empty inputs produce the zeroed default rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Grand total of biometric updates.
    pub total_bio_updates: u64,
    /// Grand total of demographic updates.
    pub total_demo_updates: u64,
    /// Grand total of enrolments.
    pub total_enrolments: u64,
    /// Distinct pincodes in the pincode aggregate.
    pub unique_pincodes: u64,
    /// Distinct states in the biometric data.
    pub unique_states: u64,
    /// Distinct districts in the biometric data.
    pub unique_districts: u64,
    /// Observed date range across all sources.
    pub date_range: DateRange,
    /// Mean identity velocity index over the pincode table.
    pub avg_ivi: f64,
    /// Mean biometric stress index over the pincode table.
    pub avg_bsi: f64,
    /// State with the highest total updates.
    pub top_state: Option<Region>,
    /// State with the highest biometric stress index.
    pub high_stress_state: Option<Region>,
}

/// Metric by which pincode rows can be ranked.
///
/// An unrecognized metric name fails to parse; that is a contract
/// error for the caller, not a data-quality condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RankMetric {
    /// Identity velocity index.
    IdentityVelocityIndex,
    /// Biometric stress index.
    BiometricStressIndex,
    /// Updates per biometric-active day.
    UpdateIntensity,
    /// Raw update volume.
    TotalUpdates,
}

/// Two state aggregate rows side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateComparison {
    /// First state's row.
    pub a: StateAggregate,
    /// Second state's row.
    pub b: StateAggregate,
}
