//! Grounding context for an AI assistant.
//!
//! The assistant answers registry questions against a rendered text
//! block rather than raw tables; this keeps the prompt bounded no
//! matter how much data is loaded.

use std::fmt::Write as _;

use identity_pulse_analytics_models::{PincodeAggregate, StateAggregate, SummaryStats};

/// The slices of the loaded data an assistant gets to see.
#[derive(Debug, Clone)]
pub struct AgentContext {
    /// (year, month) partitions available on disk, latest first.
    pub available_months: Vec<(i32, u32)>,
    /// Headline numbers.
    pub summary: SummaryStats,
    /// Top states by total updates, busiest first.
    pub top_states: Vec<StateAggregate>,
    /// Top pincodes by identity velocity, highest first.
    pub top_pincodes: Vec<PincodeAggregate>,
}

impl AgentContext {
    /// Renders the context as the plain-text block placed ahead of the
    /// user's question.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;

        let _ = writeln!(out, "Registry activity summary:");
        let _ = writeln!(
            out,
            "- {} biometric updates, {} demographic updates, {} enrolments",
            s.total_bio_updates, s.total_demo_updates, s.total_enrolments
        );
        let _ = writeln!(
            out,
            "- {} pincodes across {} states and {} districts",
            s.unique_pincodes, s.unique_states, s.unique_districts
        );
        if let (Some(start), Some(end)) = (s.date_range.start, s.date_range.end) {
            let _ = writeln!(out, "- covering {start} to {end}");
        }
        let _ = writeln!(
            out,
            "- mean velocity index {:.2}, mean stress index {:.2}",
            s.avg_ivi, s.avg_bsi
        );

        if !self.available_months.is_empty() {
            let months: Vec<String> = self
                .available_months
                .iter()
                .map(|(year, month)| format!("{year:04}-{month:02}"))
                .collect();
            let _ = writeln!(out, "- partitions on disk: {}", months.join(", "));
        }

        if !self.top_states.is_empty() {
            let _ = writeln!(out, "\nBusiest states by update volume:");
            for row in &self.top_states {
                let _ = writeln!(
                    out,
                    "- {}: {} updates, {} enrolments, stress {:.2}",
                    row.state, row.total_updates, row.total_enrolments,
                    row.biometric_stress_index
                );
            }
        }

        if !self.top_pincodes.is_empty() {
            let _ = writeln!(out, "\nHighest-velocity pincodes:");
            for row in &self.top_pincodes {
                let _ = writeln!(
                    out,
                    "- {} ({}, {}): velocity {:.2}, {} updates",
                    row.pincode, row.district, row.state,
                    row.identity_velocity_index, row.total_updates
                );
            }
        }

        out
    }
}
