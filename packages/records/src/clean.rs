//! The cleaning stage: region resolution, date parsing, calendar
//! feature derivation.

use chrono::{Datelike as _, NaiveDate};
use identity_pulse_records_models::{CleanedRecord, CleanedTable, MonthKey, RawTable};
use identity_pulse_region::RegionResolver;
use serde::Serialize;

/// Per-table data-quality accounting for one cleaning pass.
///
/// Dropped rows are counted by reason and logged; they never fail the
/// load.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningReport {
    /// Rows in the raw input.
    pub rows_in: usize,
    /// Rows surviving every check.
    pub rows_out: usize,
    /// Rows dropped for an unresolvable or invalid state label.
    pub dropped_state: u64,
    /// Rows dropped for an unparseable date.
    pub dropped_date: u64,
    /// Rows dropped for a date after the load date.
    pub dropped_future_date: u64,
    /// Rows dropped for an unparseable pincode.
    pub dropped_pincode: u64,
    /// Distinct raw state labels seen (resolver cache size).
    pub distinct_state_labels: usize,
}

/// Cleans one raw table.
///
/// State labels are resolved once per distinct value through a
/// memoizing [`RegionResolver`] — the row-to-distinct-value ratio in
/// registry data is high enough that per-row resolution would dominate
/// the load. Dates are parsed as DD-MM-YYYY first, ISO YYYY-MM-DD as a
/// fallback, and must not be later than `today`.
#[must_use]
pub fn clean_table(raw: &RawTable, today: NaiveDate) -> (CleanedTable, CleaningReport) {
    let mut resolver = RegionResolver::new();
    let mut report = CleaningReport {
        rows_in: raw.records.len(),
        ..CleaningReport::default()
    };

    let mut records = Vec::with_capacity(raw.records.len());

    for row in &raw.records {
        let Some(state) = resolver.resolve(&row.state) else {
            report.dropped_state += 1;
            continue;
        };

        let Some(date) = parse_date(&row.date) else {
            report.dropped_date += 1;
            continue;
        };

        if date > today {
            report.dropped_future_date += 1;
            continue;
        }

        let Some(pincode) = parse_pincode(&row.pincode) else {
            report.dropped_pincode += 1;
            continue;
        };

        records.push(CleanedRecord {
            date,
            state,
            district: row.district.clone(),
            pincode,
            year: date.year(),
            month: date.month(),
            month_year: MonthKey::from_date(date),
            day_of_week: date.weekday().num_days_from_monday(),
            week_of_year: date.iso_week().week(),
            counters: row.counters.clone(),
            total: 0,
        });
    }

    report.rows_out = records.len();
    report.distinct_state_labels = resolver.distinct_labels();

    let dropped = report.rows_in - report.rows_out;
    if dropped > 0 {
        log::info!(
            "{}: cleaned {} -> {} rows ({} state, {} date, {} future, {} pincode drops)",
            raw.dataset,
            report.rows_in,
            report.rows_out,
            report.dropped_state,
            report.dropped_date,
            report.dropped_future_date,
            report.dropped_pincode,
        );
    }

    (
        CleanedTable {
            dataset: raw.dataset,
            counters_present: raw.counters_present,
            records,
        },
        report,
    )
}

/// Parses a transaction date: DD-MM-YYYY primary, ISO fallback.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

/// Parses an integer-like pincode, tolerating float-typed exports
/// (`"560001.0"`).
#[allow(clippy::cast_possible_truncation)]
fn parse_pincode(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();

    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }

    match trimmed.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use identity_pulse_records_models::{Dataset, RawRecord};
    use identity_pulse_region::Region;

    use super::*;

    fn raw_row(date: &str, state: &str, pincode: &str) -> RawRecord {
        RawRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: "Bengaluru Urban".to_string(),
            pincode: pincode.to_string(),
            counters: vec![10, 5],
        }
    }

    fn raw_table(records: Vec<RawRecord>) -> RawTable {
        RawTable {
            dataset: Dataset::Biometric,
            counters_present: true,
            records,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn resolves_and_derives_calendar_fields() {
        let raw = raw_table(vec![raw_row("15-01-2024", "KARNATAKA", "560001")]);
        let (table, report) = clean_table(&raw, today());

        assert_eq!(report.rows_out, 1);
        let rec = &table.records[0];
        assert_eq!(rec.state, Region::Karnataka);
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(rec.year, 2024);
        assert_eq!(rec.month, 1);
        assert_eq!(rec.month_year.to_string(), "2024-01");
        // 2024-01-15 is a Monday
        assert_eq!(rec.day_of_week, 0);
        assert_eq!(rec.week_of_year, 3);
        assert_eq!(rec.pincode, 560_001);
    }

    #[test]
    fn iso_date_fallback() {
        let raw = raw_table(vec![raw_row("2024-01-15", "Karnataka", "560001")]);
        let (table, _) = clean_table(&raw, today());
        assert_eq!(
            table.records[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn drops_by_reason() {
        let raw = raw_table(vec![
            raw_row("15-01-2024", "Karnataka", "560001"),
            raw_row("15-01-2024", "Jaipur", "302001"),
            raw_row("not-a-date", "Karnataka", "560001"),
            raw_row("15-01-2030", "Karnataka", "560001"),
            raw_row("15-01-2024", "Karnataka", "unknown"),
        ]);

        let (table, report) = clean_table(&raw, today());

        assert_eq!(table.records.len(), 1);
        assert_eq!(report.dropped_state, 1);
        assert_eq!(report.dropped_date, 1);
        assert_eq!(report.dropped_future_date, 1);
        assert_eq!(report.dropped_pincode, 1);
    }

    #[test]
    fn float_typed_pincode_is_accepted() {
        let raw = raw_table(vec![raw_row("15-01-2024", "Karnataka", "560001.0")]);
        let (table, _) = clean_table(&raw, today());
        assert_eq!(table.records[0].pincode, 560_001);
    }

    #[test]
    fn empty_input_cleans_to_empty() {
        let (table, report) = clean_table(&raw_table(vec![]), today());
        assert!(table.is_empty());
        assert_eq!(report.rows_in, 0);
        assert_eq!(report.rows_out, 0);
    }

    #[test]
    fn distinct_labels_are_amortized() {
        let rows: Vec<RawRecord> = (0..100)
            .map(|_| raw_row("15-01-2024", "WEST BENGAL", "700001"))
            .collect();
        let (_, report) = clean_table(&raw_table(rows), today());
        assert_eq!(report.distinct_state_labels, 1);
    }
}
