#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types and the per-dataset schema contract.
//!
//! Each source dataset declares up front which counter columns it
//! guarantees ([`Dataset::counter_columns`]); downstream stages
//! short-circuit on that declaration instead of probing column presence
//! at runtime. Counter values travel positionally, aligned to the
//! declared column order.

use chrono::NaiveDate;
use identity_pulse_region::Region;
use serde::{Deserialize, Serialize};

/// One of the three independently collected registry transaction
/// datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Biometric update transactions.
    Biometric,
    /// Demographic update transactions.
    Demographic,
    /// New enrolment transactions.
    Enrolment,
}

impl Dataset {
    /// All datasets, in loading order.
    pub const ALL: [Self; 3] = [Self::Biometric, Self::Demographic, Self::Enrolment];

    /// Directory name under the data root holding this dataset's
    /// partition tree.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Biometric => "biometric-dataset",
            Self::Demographic => "demographic-dataset",
            Self::Enrolment => "enrolment-dataset",
        }
    }

    /// Key used in remote partition artifact names
    /// (`{key}_{year}_{month:02}.csv`).
    #[must_use]
    pub const fn remote_key(self) -> &'static str {
        match self {
            Self::Biometric => "biometric",
            Self::Demographic => "demographic",
            Self::Enrolment => "enrolment",
        }
    }

    /// Age-bracket counter columns this dataset guarantees, in the
    /// positional order used by [`RawRecord::counters`].
    #[must_use]
    pub const fn counter_columns(self) -> &'static [&'static str] {
        match self {
            Self::Biometric => &["bio_age_5_17", "bio_age_17_"],
            Self::Demographic => &["demo_age_5_17", "demo_age_17_"],
            Self::Enrolment => &["age_0_5", "age_5_17", "age_18_greater"],
        }
    }

    /// Position of the 5-17 age bracket within
    /// [`counter_columns`](Self::counter_columns), where the dataset
    /// has one that feeds the youth update ratio.
    #[must_use]
    pub const fn youth_bracket(self) -> Option<usize> {
        match self {
            Self::Biometric | Self::Demographic => Some(0),
            Self::Enrolment => Some(1),
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.remote_key())
    }
}

/// A raw row as read from a partition file. Free-text fields are kept
/// verbatim; nothing is validated until the cleaning stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Transaction date, free text (DD-MM-YYYY preferred).
    pub date: String,
    /// State label, free text and unreliable.
    pub state: String,
    /// District label, free text.
    pub district: String,
    /// Postal code, integer-like but may arrive as a string.
    pub pincode: String,
    /// Counter values aligned to [`Dataset::counter_columns`]. Empty
    /// when the partition lacked the declared columns.
    pub counters: Vec<u64>,
}

/// A loaded raw table for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    /// Which dataset these rows belong to.
    pub dataset: Dataset,
    /// Whether every declared counter column was present in the source
    /// header. When `false`, derived totals short-circuit to zero.
    pub counters_present: bool,
    /// The rows.
    pub records: Vec<RawRecord>,
}

impl RawTable {
    /// An empty table for the given dataset (missing partition,
    /// unreadable source, failed load).
    #[must_use]
    pub const fn empty(dataset: Dataset) -> Self {
        Self {
            dataset,
            counters_present: false,
            records: Vec::new(),
        }
    }

    /// Returns `true` if the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered year-month period key. Displays as `YYYY-MM`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

impl MonthKey {
    /// Builds the period key for a date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike as _;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A record that survived the cleaning stage.
///
/// Invariants: `date` is a valid calendar date no later than the load
/// date, `state` is canonical, and `total` is the sum of `counters`
/// when the table's declared columns were present (zero otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedRecord {
    /// Parsed transaction date.
    pub date: NaiveDate,
    /// Resolved canonical region.
    pub state: Region,
    /// District label, passed through.
    pub district: String,
    /// Parsed postal code.
    pub pincode: i64,
    /// Calendar year of `date`.
    pub year: i32,
    /// Calendar month of `date` (1-12).
    pub month: u32,
    /// Year-month period key.
    pub month_year: MonthKey,
    /// Day of week, 0 = Monday.
    pub day_of_week: u32,
    /// ISO week of year.
    pub week_of_year: u32,
    /// Counter values aligned to the dataset's declared columns.
    pub counters: Vec<u64>,
    /// Per-record summed counter (the dataset's "total" column).
    pub total: u64,
}

/// A cleaned-and-totaled table for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedTable {
    /// Which dataset these rows belong to.
    pub dataset: Dataset,
    /// Carried through from the raw table's schema declaration.
    pub counters_present: bool,
    /// The rows.
    pub records: Vec<CleanedRecord>,
}

impl CleanedTable {
    /// An empty cleaned table for the given dataset.
    #[must_use]
    pub const fn empty(dataset: Dataset) -> Self {
        Self {
            dataset,
            counters_present: false,
            records: Vec::new(),
        }
    }

    /// Returns `true` if the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of the per-record totals.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.records.iter().map(|r| r.total).sum()
    }
}
