#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line interface for the identity pulse analytics pipeline.
//!
//! Each subcommand runs one query against a freshly constructed
//! [`Pipeline`] and prints the result as JSON, so the output can be
//! piped into `jq` or saved as a fixture.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use identity_pulse_analytics_models::RankMetric;
use identity_pulse_loader::LoaderConfig;
use identity_pulse_pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "identity-pulse", about = "Identity registry analytics")]
struct Cli {
    /// Root directory of the partition trees. Overrides
    /// `IDENTITY_PULSE_DATA_DIR`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Restrict the load to one calendar year.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Restrict the load to one month within `--year`.
    #[arg(long, global = true, requires = "year")]
    month: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the (year, month) partitions available on disk.
    Months,
    /// Print the headline summary statistics.
    Summary,
    /// Print the state-granularity aggregate.
    States,
    /// Print the pincode-granularity aggregate.
    Pincodes,
    /// Print the temporal views (daily, day-of-week, monthly).
    Temporal,
    /// Look up one state by free-text label.
    State {
        /// State label, matched the same way source labels are.
        label: String,
    },
    /// Compare two states side by side.
    Compare {
        /// First state label.
        a: String,
        /// Second state label.
        b: String,
    },
    /// Rank pincodes by a derived metric.
    Top {
        /// One of: identity_velocity_index, biometric_stress_index,
        /// update_intensity, total_updates.
        #[arg(long, default_value = "identity_velocity_index")]
        metric: String,
        /// Number of rows to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Look up one pincode's aggregate row.
    Pincode {
        /// The pincode.
        pincode: i64,
    },
    /// Print the rendered AI assistant grounding context.
    Context,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let mut config = LoaderConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let mut pipeline = Pipeline::new(config)?;
    let (year, month) = (cli.year, cli.month);

    match cli.command {
        Command::Months => {
            let months: Vec<String> = pipeline
                .get_available_months()
                .into_iter()
                .map(|(year, month)| format!("{year:04}-{month:02}"))
                .collect();
            print_json(&months)?;
        }
        Command::Summary => {
            print_json(&*pipeline.get_summary_stats(year, month).await)?;
        }
        Command::States => {
            print_json(&*pipeline.get_state_analytics(year, month).await)?;
        }
        Command::Pincodes => {
            print_json(&*pipeline.get_pincode_analytics(year, month).await)?;
        }
        Command::Temporal => {
            print_json(&*pipeline.get_temporal_analytics(year, month).await)?;
        }
        Command::State { label } => {
            pipeline.load_all_data(year, month).await;
            print_json(&pipeline.find_state(&label).await?)?;
        }
        Command::Compare { a, b } => {
            pipeline.load_all_data(year, month).await;
            print_json(&pipeline.compare_states(&a, &b).await?)?;
        }
        Command::Top { metric, limit } => {
            let metric: RankMetric = metric.parse()?;
            pipeline.load_all_data(year, month).await;
            print_json(&pipeline.top_pincodes(metric, limit).await)?;
        }
        Command::Pincode { pincode } => {
            pipeline.load_all_data(year, month).await;
            print_json(&pipeline.find_pincode(pincode).await?)?;
        }
        Command::Context => {
            pipeline.load_all_data(year, month).await;
            println!("{}", pipeline.build_agent_context().await.render());
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
