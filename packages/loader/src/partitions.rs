//! Partition path conventions and on-disk discovery.

use std::path::{Path, PathBuf};

use identity_pulse_records_models::Dataset;

use crate::LoaderError;

/// Builds the canonical path of one partition:
/// `<root>/<dataset-dir>/<year>/<month:02>.csv`.
#[must_use]
pub fn partition_path(data_dir: &Path, dataset: Dataset, year: i32, month: u32) -> PathBuf {
    data_dir
        .join(dataset.dir_name())
        .join(year.to_string())
        .join(format!("{month:02}.csv"))
}

/// Scans the partition trees of all three datasets and returns the
/// distinct (year, month) pairs present on disk, sorted descending so
/// the first entry is the latest available slice.
///
/// Missing dataset directories are simply skipped; an empty data root
/// yields an empty list.
#[must_use]
pub fn available_months(data_dir: &Path) -> Vec<(i32, u32)> {
    let mut months = std::collections::BTreeSet::new();

    for dataset in Dataset::ALL {
        let base = data_dir.join(dataset.dir_name());
        let Ok(year_dirs) = std::fs::read_dir(&base) else {
            continue;
        };

        for year_entry in year_dirs.flatten() {
            let Some(year) = year_entry
                .file_name()
                .to_str()
                .and_then(|s| s.parse::<i32>().ok())
            else {
                continue;
            };

            let Ok(month_files) = std::fs::read_dir(year_entry.path()) else {
                continue;
            };

            for month_entry in month_files.flatten() {
                let path = month_entry.path();
                if path.extension().is_some_and(|e| e == "csv")
                    && let Some(month) = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .and_then(|s| s.parse::<u32>().ok())
                {
                    months.insert((year, month));
                }
            }
        }
    }

    let mut sorted: Vec<(i32, u32)> = months.into_iter().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

/// Recursively collects every `.csv` file under `dir` into `out`.
pub(crate) fn collect_csv_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoaderError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_csv_files(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "csv") {
            out.push(path);
        }
    }
    Ok(())
}
