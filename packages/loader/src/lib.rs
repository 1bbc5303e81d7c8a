#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loader for partitioned registry transaction files.
//!
//! Partitions live in a hierarchical on-disk layout,
//! `<data-root>/<dataset-dir>/<year>/<month:02>.csv`. A load either
//! targets one partition (with a remote-fetch fallback when it is
//! missing locally) or concatenates every partition under the dataset's
//! tree — the expensive path callers should avoid when "latest only"
//! will do.
//!
//! Partition absence is an expected, recoverable condition: a missing
//! or unfetchable slice loads as an empty table and is logged, never
//! raised. Structural problems (a partition file that exists but cannot
//! be read, a header missing the core columns) are errors — the caller
//! decides whether to degrade.

mod csv_read;
mod fetch;
mod partitions;

pub use csv_read::read_partition;
pub use fetch::fetch_partition;
pub use partitions::{available_months, partition_path};

use std::path::PathBuf;
use std::time::Duration;

use identity_pulse_records_models::{Dataset, RawTable};

/// Errors that can occur while loading partition data.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// I/O failure reading a partition file or directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level failure reading a partition file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A partition header is missing one of the core columns.
    #[error("Partition for {dataset} is missing required column '{column}'")]
    MissingColumn {
        /// Dataset being read.
        dataset: Dataset,
        /// Name of the absent column.
        column: &'static str,
    },

    /// A blocking read task was cancelled or panicked.
    #[error("Load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Default per-request timeout for remote partition fetches, seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Loader configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Root directory of the partition trees.
    pub data_dir: PathBuf,
    /// Base URL of the remote partition artifact store. `None` disables
    /// the fetch fallback.
    pub remote_base_url: Option<String>,
    /// Bound on each remote fetch request.
    pub fetch_timeout: Duration,
}

impl LoaderConfig {
    /// Builds a config from environment variables:
    /// `IDENTITY_PULSE_DATA_DIR` (default `data`),
    /// `IDENTITY_PULSE_REMOTE_BASE_URL` (default: no remote), and
    /// `IDENTITY_PULSE_FETCH_TIMEOUT_SECS` (default 10).
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir = std::env::var("IDENTITY_PULSE_DATA_DIR")
            .map_or_else(|_| PathBuf::from("data"), PathBuf::from);
        let remote_base_url = std::env::var("IDENTITY_PULSE_REMOTE_BASE_URL").ok();
        let fetch_timeout = std::env::var("IDENTITY_PULSE_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(
                Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
                Duration::from_secs,
            );

        Self {
            data_dir,
            remote_base_url,
            fetch_timeout,
        }
    }

    /// Builds a config rooted at `data_dir` with no remote store.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            remote_base_url: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

/// Builds the HTTP client used for remote partition fetches, with the
/// configured request timeout applied.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the client cannot be constructed.
pub fn http_client(config: &LoaderConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent("identity-pulse/0.1 (https://github.com/identity-pulse/identity-pulse)")
        .timeout(config.fetch_timeout)
        .build()
}

/// Loads one dataset, optionally filtered to a single (year, month)
/// partition or to one year.
///
/// With both filters given, reads exactly one partition file, first
/// attempting a remote fetch if it is missing locally; an absent
/// partition yields an empty table. With only a year, reads every
/// partition under that year's subtree. With no filters, recursively
/// reads and concatenates every partition under the dataset directory.
///
/// # Errors
///
/// Returns [`LoaderError`] if a partition file that exists on disk
/// cannot be read or its header lacks a core column. Partition absence
/// is not an error.
pub async fn load_dataset(
    config: &LoaderConfig,
    client: &reqwest::Client,
    dataset: Dataset,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<RawTable, LoaderError> {
    if let (Some(year), Some(month)) = (year, month) {
        let path = partition_path(&config.data_dir, dataset, year, month);

        if !path.exists() {
            if let Some(base_url) = &config.remote_base_url {
                fetch_partition(client, base_url, dataset, year, month, &path).await;
            }
        }

        if !path.exists() {
            log::info!("{dataset}: no partition for {year}-{month:02}, loading empty");
            return Ok(RawTable::empty(dataset));
        }

        return tokio::task::spawn_blocking(move || read_partition(dataset, &path)).await?;
    }

    // Scan the year subtree when a year is given, the whole dataset
    // tree otherwise.
    let base = match year {
        Some(year) => config
            .data_dir
            .join(dataset.dir_name())
            .join(year.to_string()),
        None => config.data_dir.join(dataset.dir_name()),
    };
    tokio::task::spawn_blocking(move || read_all_partitions(dataset, &base)).await?
}

/// Reads and concatenates every `.csv` partition under `base`,
/// recursively. A missing dataset directory yields an empty table.
fn read_all_partitions(dataset: Dataset, base: &std::path::Path) -> Result<RawTable, LoaderError> {
    if !base.is_dir() {
        log::warn!("{dataset}: dataset directory {} not found", base.display());
        return Ok(RawTable::empty(dataset));
    }

    let mut files = Vec::new();
    partitions::collect_csv_files(base, &mut files)?;
    files.sort();

    let mut table = RawTable::empty(dataset);

    for path in files {
        let part = read_partition(dataset, &path)?;
        table.counters_present |= part.counters_present;
        table.records.extend(part.records);
    }

    log::info!(
        "{dataset}: loaded {} rows from full partition scan",
        table.records.len()
    );

    Ok(table)
}
