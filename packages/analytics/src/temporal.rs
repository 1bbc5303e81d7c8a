//! Temporal views: daily, day-of-week, and monthly activity.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use identity_pulse_analytics_models::{
    DailyActivity, DayOfWeekActivity, MonthlyTotal, TemporalAnalytics,
};
use identity_pulse_records_models::{CleanedTable, MonthKey};

#[derive(Default)]
struct SourceTotals {
    bio: u64,
    demo: u64,
    enrol: u64,
}

/// Builds all three temporal views in one pass over the cleaned
/// tables.
///
/// The daily view is the union of dates across sources, zero-filled
/// where a source had no activity, sorted ascending. The day-of-week
/// view covers only days actually present in the data.
#[must_use]
pub fn compute_temporal(
    bio: &CleanedTable,
    demo: &CleanedTable,
    enrol: &CleanedTable,
) -> TemporalAnalytics {
    let mut daily: BTreeMap<NaiveDate, SourceTotals> = BTreeMap::new();
    let mut day_of_week: BTreeMap<u32, SourceTotals> = BTreeMap::new();
    let mut bio_monthly: BTreeMap<MonthKey, u64> = BTreeMap::new();
    let mut demo_monthly: BTreeMap<MonthKey, u64> = BTreeMap::new();
    let mut enrol_monthly: BTreeMap<MonthKey, u64> = BTreeMap::new();

    for rec in &bio.records {
        daily.entry(rec.date).or_default().bio += rec.total;
        day_of_week.entry(rec.day_of_week).or_default().bio += rec.total;
        *bio_monthly.entry(rec.month_year).or_default() += rec.total;
    }
    for rec in &demo.records {
        daily.entry(rec.date).or_default().demo += rec.total;
        day_of_week.entry(rec.day_of_week).or_default().demo += rec.total;
        *demo_monthly.entry(rec.month_year).or_default() += rec.total;
    }
    for rec in &enrol.records {
        daily.entry(rec.date).or_default().enrol += rec.total;
        day_of_week.entry(rec.day_of_week).or_default().enrol += rec.total;
        *enrol_monthly.entry(rec.month_year).or_default() += rec.total;
    }

    TemporalAnalytics {
        daily: daily
            .into_iter()
            .map(|(date, t)| DailyActivity {
                date,
                total_bio_updates: t.bio,
                total_demo_updates: t.demo,
                total_enrolments: t.enrol,
                total_activity: t.bio + t.demo + t.enrol,
            })
            .collect(),
        day_of_week: day_of_week
            .into_iter()
            .map(|(day, t)| DayOfWeekActivity {
                day_of_week: day,
                total_bio_updates: t.bio,
                total_demo_updates: t.demo,
                total_enrolments: t.enrol,
            })
            .collect(),
        bio_monthly: monthly_rows(bio_monthly),
        demo_monthly: monthly_rows(demo_monthly),
        enrol_monthly: monthly_rows(enrol_monthly),
    }
}

fn monthly_rows(totals: BTreeMap<MonthKey, u64>) -> Vec<MonthlyTotal> {
    totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}
