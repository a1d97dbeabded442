#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line host for the EV registration dashboard engine.
//!
//! Loads the dataset once, then either answers a single query (`snapshot`,
//! `insights`, `export`, `manufacturers`) or, with no subcommand, starts an
//! interactive session that drives the cross-filter controller the way the
//! dashboard UI does.
//!
//! Uses `indicatif-log-bridge` (via [`ev_dashboard_cli_utils::init_logger`])
//! so that log lines and the load progress bar share the terminal.

mod interactive;
mod output;
mod terminal;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use ev_dashboard_aggregate::manufacturer_suggestions;
use ev_dashboard_aggregate_models::ChartKind;
use ev_dashboard_cli_utils::{IndicatifProgress, MultiProgress};
use ev_dashboard_crossfilter::{Controller, DashboardConfig};
use ev_dashboard_filter_models::FilterAction;
use ev_dashboard_insights::format_count;
use ev_dashboard_vehicle_models::VehicleRecord;

#[derive(Parser)]
#[command(name = "ev_dashboard", about = "EV registration dashboard engine")]
struct Cli {
    /// Dataset path or http(s) URL (overrides the config file and `EV_DASHBOARD_DATA`)
    #[arg(long, global = true)]
    data: Option<String>,
    /// Configuration file (overrides `EV_DASHBOARD_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Filter flags shared by the query subcommands.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Manufacturer substring (case-insensitive)
    #[arg(long)]
    search: Option<String>,
    /// Lowest model year to include
    #[arg(long)]
    year_min: Option<i32>,
    /// Highest model year to include
    #[arg(long)]
    year_max: Option<i32>,
    /// Exclude battery electric vehicles
    #[arg(long)]
    no_bev: bool,
    /// Exclude plug-in hybrids
    #[arg(long)]
    no_phev: bool,
}

impl FilterArgs {
    /// Translates the flags into the actions the dashboard would emit.
    fn actions(&self) -> Vec<FilterAction> {
        let mut actions = Vec::new();
        if let Some(search) = &self.search {
            actions.push(FilterAction::SetSearch(search.clone()));
        }
        match (self.year_min, self.year_max) {
            (Some(min), Some(max)) => actions.push(FilterAction::SetYearRange { min, max }),
            (Some(min), None) => actions.push(FilterAction::SetYearMin(min)),
            (None, Some(max)) => actions.push(FilterAction::SetYearMax(max)),
            (None, None) => {}
        }
        if self.no_bev {
            actions.push(FilterAction::SetIncludeBev(false));
        }
        if self.no_phev {
            actions.push(FilterAction::SetIncludePhev(false));
        }
        actions
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every chart's data for the given filters as JSON
    Snapshot {
        #[command(flatten)]
        filters: FilterArgs,
        /// Manufacturer to drill down into
        #[arg(long)]
        drill_down: Option<String>,
        /// Only print one chart (e.g., `top_makes`, `range_trend`)
        #[arg(long)]
        chart: Option<ChartKind>,
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Print the summary cards and insights feed
    Insights {
        #[command(flatten)]
        filters: FilterArgs,
        /// Manufacturer to drill down into
        #[arg(long)]
        drill_down: Option<String>,
    },
    /// Write the filtered rows to a CSV file
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output CSV path
        #[arg(long, short)]
        output: PathBuf,
        /// Maximum rows to write (defaults to the configured export limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List manufacturers matching a query, with registration counts
    Manufacturers {
        /// Case-insensitive substring; lists all manufacturers when omitted
        query: Option<String>,
    },
}

/// Loads the configured dataset behind a progress bar.
async fn load_records(
    config: &DashboardConfig,
    multi: &MultiProgress,
) -> Result<Vec<VehicleRecord>, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let source = config.data_location().source();
    let progress = IndicatifProgress::rows_bar(multi, &format!("Loading {}", source.location()));

    let records = source.load(&progress).await?;

    log::info!(
        "Loaded {} records in {:.1}s",
        format_count(records.len() as u64),
        start.elapsed().as_secs_f64()
    );
    Ok(records)
}

fn build_controller(
    config: &DashboardConfig,
    records: Vec<VehicleRecord>,
    filters: &FilterArgs,
    drill_down: Option<String>,
) -> Controller {
    let mut controller = Controller::new(records, config.initial_state())
        .with_export_limit(config.crossfilter.export_limit);

    let mut actions = filters.actions();
    actions.extend(drill_down.map(FilterAction::ToggleDrillDown));
    controller.dispatch_batch(actions);

    controller
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = ev_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data.location = data;
    }

    let records = load_records(&config, &multi).await?;

    let Some(command) = cli.command else {
        return interactive::run(&config, records).await;
    };

    match command {
        Commands::Snapshot {
            filters,
            drill_down,
            chart,
            compact,
        } => {
            let controller = build_controller(&config, records, &filters, drill_down);
            let json = output::snapshot_json(controller.snapshot(), chart)?;
            if compact {
                println!("{}", serde_json::to_string(&json)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Commands::Insights {
            filters,
            drill_down,
        } => {
            let controller = build_controller(&config, records, &filters, drill_down);
            let snapshot = controller.snapshot();
            println!("{}", snapshot.state.describe());
            println!();
            print!("{}", output::summary_text(&snapshot.summary, &snapshot.insights));
        }
        Commands::Export {
            filters,
            output,
            limit,
        } => {
            let mut controller = build_controller(&config, records, &filters, None);
            if let Some(limit) = limit {
                controller = controller.with_export_limit(limit);
            }
            let writer = BufWriter::new(File::create(&output)?);
            let written = controller.export(writer)?;
            println!(
                "Wrote {} rows to {}",
                format_count(written as u64),
                output.display()
            );
        }
        Commands::Manufacturers { query } => {
            let suggestions = manufacturer_suggestions(&records, query.as_deref().unwrap_or(""));
            if suggestions.is_empty() {
                println!("No manufacturers match.");
            }
            for suggestion in &suggestions {
                println!("{:<30} {:>10}", suggestion.make, format_count(suggestion.count));
            }
        }
    }

    Ok(())
}
