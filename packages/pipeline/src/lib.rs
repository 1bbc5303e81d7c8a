#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline facade over the loader, cleaning, and aggregation stages.
//!
//! A [`Pipeline`] owns its loader configuration and HTTP client and is
//! passed explicitly to whatever hosts it. The three source datasets
//! load concurrently; a dataset whose load fails outright degrades to
//! an empty table and is logged, so one bad source never takes down
//! the other two.
//!
//! Cleaned tables and aggregates are cached behind [`Arc`]s and
//! recomputed only when the requested month filter differs from the
//! cached one. [`Pipeline::refresh`] discards the cache
//! unconditionally.

mod context;

pub use context::AgentContext;

use std::sync::Arc;

use identity_pulse_analytics::{
    aggregate_pincodes, aggregate_states, compute_summary, compute_temporal,
};
use identity_pulse_analytics_models::{
    PincodeAggregate, RankMetric, StateAggregate, StateComparison, SummaryStats,
    TemporalAnalytics,
};
use identity_pulse_loader::{LoaderConfig, LoaderError, http_client, load_dataset};
use identity_pulse_records::clean_and_total;
use identity_pulse_records_models::{CleanedTable, Dataset, RawTable};
use identity_pulse_region::{Region, resolve_region};

/// Errors surfaced by the pipeline facade.
///
/// Data-quality conditions (missing partitions, unreadable rows,
/// unloadable sources) never appear here; they degrade to empty data.
/// These are contract errors for the caller.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A free-text state label did not resolve to any canonical region.
    #[error("Unrecognized state label '{label}'")]
    UnknownState {
        /// The label as given.
        label: String,
    },

    /// The state resolved but has no data under the current filter.
    #[error("No data loaded for state {state}")]
    StateMissing {
        /// The resolved region.
        state: Region,
    },

    /// The pincode has no data under the current filter.
    #[error("No data loaded for pincode {pincode}")]
    PincodeMissing {
        /// The pincode as given.
        pincode: i64,
    },
}

/// Month filter a load was performed under. `None` fields mean
/// unfiltered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MonthFilter {
    year: Option<i32>,
    month: Option<u32>,
}

/// Cleaned tables and aggregates from one load, shared out by cheap
/// `Arc` clones.
struct LoadedData {
    bio: Arc<CleanedTable>,
    demo: Arc<CleanedTable>,
    enrol: Arc<CleanedTable>,
    pincodes: Arc<Vec<PincodeAggregate>>,
    states: Arc<Vec<StateAggregate>>,
    temporal: Arc<TemporalAnalytics>,
    summary: Arc<SummaryStats>,
}

impl LoadedData {
    fn empty() -> Self {
        Self {
            bio: Arc::new(CleanedTable::empty(Dataset::Biometric)),
            demo: Arc::new(CleanedTable::empty(Dataset::Demographic)),
            enrol: Arc::new(CleanedTable::empty(Dataset::Enrolment)),
            pincodes: Arc::new(Vec::new()),
            states: Arc::new(Vec::new()),
            temporal: Arc::new(TemporalAnalytics::default()),
            summary: Arc::new(SummaryStats::default()),
        }
    }
}

/// The analytics pipeline: loading, cleaning, aggregation, and cached
/// results behind one handle.
pub struct Pipeline {
    config: LoaderConfig,
    client: reqwest::Client,
    filter: Option<MonthFilter>,
    data: LoadedData,
}

impl Pipeline {
    /// Creates a pipeline over the given loader configuration. No data
    /// is loaded until the first query.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: LoaderConfig) -> Result<Self, PipelineError> {
        let client = http_client(&config)?;
        Ok(Self {
            config,
            client,
            filter: None,
            data: LoadedData::empty(),
        })
    }

    /// Loads all three datasets concurrently under the given month
    /// filter, then cleans, totals, and aggregates them. Replaces any
    /// cached aggregates and returns the three cleaned tables.
    pub async fn load_all_data(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> (Arc<CleanedTable>, Arc<CleanedTable>, Arc<CleanedTable>) {
        let filter = MonthFilter { year, month };
        self.data = self.build(filter).await;
        self.filter = Some(filter);
        (
            Arc::clone(&self.data.bio),
            Arc::clone(&self.data.demo),
            Arc::clone(&self.data.enrol),
        )
    }

    /// Discards the cache and reloads under the current filter.
    pub async fn refresh(&mut self) {
        let filter = self.filter.unwrap_or_default();
        self.load_all_data(filter.year, filter.month).await;
    }

    /// Pincode-granularity aggregate under the given filter. Reloads
    /// only when the filter differs from the cached one.
    pub async fn get_pincode_analytics(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Arc<Vec<PincodeAggregate>> {
        self.ensure_loaded(year, month).await;
        Arc::clone(&self.data.pincodes)
    }

    /// State-granularity aggregate under the given filter.
    pub async fn get_state_analytics(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Arc<Vec<StateAggregate>> {
        self.ensure_loaded(year, month).await;
        Arc::clone(&self.data.states)
    }

    /// Temporal views under the given filter.
    pub async fn get_temporal_analytics(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Arc<TemporalAnalytics> {
        self.ensure_loaded(year, month).await;
        Arc::clone(&self.data.temporal)
    }

    /// Headline summary statistics under the given filter.
    pub async fn get_summary_stats(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Arc<SummaryStats> {
        self.ensure_loaded(year, month).await;
        Arc::clone(&self.data.summary)
    }

    /// Distinct (year, month) partitions present on disk across all
    /// three datasets, latest first.
    #[must_use]
    pub fn get_available_months(&self) -> Vec<(i32, u32)> {
        identity_pulse_loader::available_months(&self.config.data_dir)
    }

    /// Looks up one state's aggregate row by free-text label, resolved
    /// the same way the cleaning stage resolves source labels.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownState`] if the label resolves to no
    /// canonical region, [`PipelineError::StateMissing`] if the region
    /// has no data under the current filter.
    pub async fn find_state(&mut self, label: &str) -> Result<StateAggregate, PipelineError> {
        self.ensure_current().await;
        let state = resolve_region(label).ok_or_else(|| PipelineError::UnknownState {
            label: label.to_string(),
        })?;
        self.data
            .states
            .iter()
            .find(|row| row.state == state)
            .cloned()
            .ok_or(PipelineError::StateMissing { state })
    }

    /// Looks up two states side by side.
    ///
    /// # Errors
    ///
    /// As [`find_state`](Self::find_state), for either label.
    pub async fn compare_states(
        &mut self,
        a: &str,
        b: &str,
    ) -> Result<StateComparison, PipelineError> {
        let a = self.find_state(a).await?;
        let b = self.find_state(b).await?;
        Ok(StateComparison { a, b })
    }

    /// The `limit` pincode rows ranking highest on `metric`, descending.
    pub async fn top_pincodes(
        &mut self,
        metric: RankMetric,
        limit: usize,
    ) -> Vec<PincodeAggregate> {
        self.ensure_current().await;
        let mut rows: Vec<PincodeAggregate> = self.data.pincodes.as_ref().clone();
        rows.sort_by(|a, b| metric_value(b, metric).total_cmp(&metric_value(a, metric)));
        rows.truncate(limit);
        rows
    }

    /// Looks up one pincode's aggregate row.
    ///
    /// # Errors
    ///
    /// [`PipelineError::PincodeMissing`] if the pincode has no data
    /// under the current filter.
    pub async fn find_pincode(&mut self, pincode: i64) -> Result<PincodeAggregate, PipelineError> {
        self.ensure_current().await;
        self.data
            .pincodes
            .iter()
            .find(|row| row.pincode == pincode)
            .cloned()
            .ok_or(PipelineError::PincodeMissing { pincode })
    }

    /// Builds the rendered context block handed to an AI assistant as
    /// grounding for registry questions.
    pub async fn build_agent_context(&mut self) -> AgentContext {
        self.ensure_current().await;
        let top_states = {
            let mut rows: Vec<StateAggregate> = self.data.states.as_ref().clone();
            rows.sort_by(|a, b| b.total_updates.cmp(&a.total_updates));
            rows.truncate(5);
            rows
        };
        let top_pincodes = self.top_pincodes(RankMetric::IdentityVelocityIndex, 5).await;
        AgentContext {
            available_months: self.get_available_months(),
            summary: self.data.summary.as_ref().clone(),
            top_states,
            top_pincodes,
        }
    }

    /// Reloads only when the requested filter differs from the cached
    /// one or nothing has been loaded yet.
    async fn ensure_loaded(&mut self, year: Option<i32>, month: Option<u32>) {
        let filter = MonthFilter { year, month };
        if self.filter != Some(filter) {
            self.load_all_data(year, month).await;
        }
    }

    /// Loads under the current filter, unfiltered when nothing has been
    /// loaded yet.
    async fn ensure_current(&mut self) {
        let filter = self.filter.unwrap_or_default();
        self.ensure_loaded(filter.year, filter.month).await;
    }

    async fn build(&self, filter: MonthFilter) -> LoadedData {
        let (bio, demo, enrol) = tokio::join!(
            load_dataset(
                &self.config,
                &self.client,
                Dataset::Biometric,
                filter.year,
                filter.month
            ),
            load_dataset(
                &self.config,
                &self.client,
                Dataset::Demographic,
                filter.year,
                filter.month
            ),
            load_dataset(
                &self.config,
                &self.client,
                Dataset::Enrolment,
                filter.year,
                filter.month
            ),
        );

        let bio = table_or_empty(Dataset::Biometric, bio);
        let demo = table_or_empty(Dataset::Demographic, demo);
        let enrol = table_or_empty(Dataset::Enrolment, enrol);

        let (bio, _) = clean_and_total(&bio);
        let (demo, _) = clean_and_total(&demo);
        let (enrol, _) = clean_and_total(&enrol);

        let pincodes = Arc::new(aggregate_pincodes(&bio, &demo, &enrol));
        let states = Arc::new(aggregate_states(&bio, &demo, &enrol));
        let temporal = Arc::new(compute_temporal(&bio, &demo, &enrol));
        let summary = Arc::new(compute_summary(&bio, &demo, &enrol, &pincodes, &states));

        log::info!(
            "pipeline loaded: {} pincodes, {} states, {} days",
            pincodes.len(),
            states.len(),
            temporal.daily.len()
        );

        LoadedData {
            bio: Arc::new(bio),
            demo: Arc::new(demo),
            enrol: Arc::new(enrol),
            pincodes,
            states,
            temporal,
            summary,
        }
    }
}

/// Collapses a failed dataset load to an empty table. One bad source
/// must not take down the other two.
fn table_or_empty(dataset: Dataset, result: Result<RawTable, LoaderError>) -> RawTable {
    match result {
        Ok(table) => table,
        Err(err) => {
            log::error!("{dataset}: load failed, continuing with empty table: {err}");
            RawTable::empty(dataset)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn metric_value(row: &PincodeAggregate, metric: RankMetric) -> f64 {
    match metric {
        RankMetric::IdentityVelocityIndex => row.identity_velocity_index,
        RankMetric::BiometricStressIndex => row.biometric_stress_index,
        RankMetric::UpdateIntensity => row.update_intensity,
        RankMetric::TotalUpdates => row.total_updates as f64,
    }
}
