//! CSV partition file reading.
//!
//! Maps the partition header onto the dataset's declared schema once,
//! then reads rows positionally. Malformed rows are skipped and
//! counted, never fatal.

use std::path::Path;

use identity_pulse_records_models::{Dataset, RawRecord, RawTable};

use crate::LoaderError;

/// Core columns every partition must carry.
const CORE_COLUMNS: [&str; 4] = ["date", "state", "district", "pincode"];

/// Positions of the core and counter columns within a partition header.
struct ColumnMap {
    date: usize,
    state: usize,
    district: usize,
    pincode: usize,
    /// Indices of the declared counter columns, in declaration order;
    /// `None` when any declared column is absent from the header.
    counters: Option<Vec<usize>>,
}

impl ColumnMap {
    fn from_headers(dataset: Dataset, headers: &csv::StringRecord) -> Result<Self, LoaderError> {
        let find = |name: &'static str| -> Result<usize, LoaderError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoaderError::MissingColumn {
                    dataset,
                    column: name,
                })
        };

        let counters = dataset
            .counter_columns()
            .iter()
            .map(|name| headers.iter().position(|h| h.trim() == *name))
            .collect::<Option<Vec<usize>>>();

        Ok(Self {
            date: find(CORE_COLUMNS[0])?,
            state: find(CORE_COLUMNS[1])?,
            district: find(CORE_COLUMNS[2])?,
            pincode: find(CORE_COLUMNS[3])?,
            counters,
        })
    }
}

/// Reads a single partition file into a [`RawTable`].
///
/// The header is validated against the dataset's schema contract: the
/// four core columns are required; the declared counter columns are
/// optional as a group — when any is missing, rows carry no counters
/// and `counters_present` is `false`.
///
/// # Errors
///
/// Returns [`LoaderError`] if the file cannot be opened, the header
/// cannot be read, or a core column is absent.
pub fn read_partition(dataset: Dataset, path: &Path) -> Result<RawTable, LoaderError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = ColumnMap::from_headers(dataset, reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0u64;

    for row in reader.records() {
        let Ok(row) = row else {
            skipped += 1;
            continue;
        };

        match parse_row(&columns, &row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!(
            "{dataset}: skipped {skipped} malformed rows in {}",
            path.display()
        );
    }

    Ok(RawTable {
        dataset,
        counters_present: columns.counters.is_some(),
        records,
    })
}

/// Parses one CSV row against the column map. Returns `None` when a
/// referenced field is out of range or a counter value is not numeric.
fn parse_row(columns: &ColumnMap, row: &csv::StringRecord) -> Option<RawRecord> {
    let field = |idx: usize| row.get(idx).map(str::trim);

    let counters = match &columns.counters {
        Some(indices) => indices
            .iter()
            .map(|&idx| field(idx).and_then(parse_count))
            .collect::<Option<Vec<u64>>>()?,
        None => Vec::new(),
    };

    Some(RawRecord {
        date: field(columns.date)?.to_string(),
        state: field(columns.state)?.to_string(),
        district: field(columns.district)?.to_string(),
        pincode: field(columns.pincode)?.to_string(),
        counters,
    })
}

/// Parses a counter cell. Empty cells count as zero; values exported
/// through float-typed tooling (`"12.0"`) are accepted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(cell: &str) -> Option<u64> {
    if cell.is_empty() {
        return Some(0);
    }

    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }

    match cell.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(tag: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "identity-pulse-csv-{tag}-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn reads_declared_counters() {
        let path = write_temp(
            "counters",
            "date,state,district,pincode,bio_age_5_17,bio_age_17_\n\
             01-06-2024,Karnataka,Bengaluru Urban,560001,7,3\n\
             02-06-2024,Karnataka,Bengaluru Urban,560001,,1\n",
        );

        let table = read_partition(Dataset::Biometric, &path).unwrap();
        assert!(table.counters_present);
        assert_eq!(table.records[0].counters, vec![7, 3]);
        assert_eq!(table.records[1].counters, vec![0, 1]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn absent_counter_columns_short_circuit() {
        let path = write_temp(
            "nocounters",
            "date,state,district,pincode\n01-06-2024,Karnataka,Bengaluru Urban,560001\n",
        );

        let table = read_partition(Dataset::Biometric, &path).unwrap();
        assert!(!table.counters_present);
        assert!(table.records[0].counters.is_empty());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_core_column_is_an_error() {
        let path = write_temp("nocore", "date,district,pincode\n01-06-2024,Thane,400601\n");

        let err = read_partition(Dataset::Demographic, &path).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MissingColumn {
                column: "state",
                ..
            }
        ));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_counter_rows_are_skipped() {
        let path = write_temp(
            "badrows",
            "date,state,district,pincode,demo_age_5_17,demo_age_17_\n\
             01-06-2024,Kerala,Ernakulam,682001,4,2\n\
             02-06-2024,Kerala,Ernakulam,682001,x,2\n\
             03-06-2024,Kerala,Ernakulam,682001,6.0,2\n",
        );

        let table = read_partition(Dataset::Demographic, &path).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].counters, vec![6, 2]);

        std::fs::remove_file(path).ok();
    }
}
