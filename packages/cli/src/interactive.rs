//! Interactive dashboard session.
//!
//! Provides a menu-driven stand-in for the browser dashboard using
//! `dialoguer`. Each menu choice becomes the [`FilterAction`] the UI would
//! emit, and the charts are re-rendered through a [`TerminalSink`].

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use dialoguer::{Input, Select};
use ev_dashboard_aggregate::manufacturer_suggestions;
use ev_dashboard_aggregate_models::ChartKind;
use ev_dashboard_crossfilter::{Controller, DashboardConfig, DebouncedController};
use ev_dashboard_filter_models::FilterAction;
use ev_dashboard_insights::format_count;
use ev_dashboard_vehicle_models::VehicleRecord;

use crate::output::snapshot_json;
use crate::terminal::TerminalSink;

/// Rows printed per list-like chart.
const TERMINAL_ROWS: usize = 10;

/// Manufacturers offered by the search prompt.
const SUGGESTION_LIMIT: usize = 15;

/// Top-level actions available in the session menu.
enum SessionAction {
    Search,
    YearRange,
    ToggleBev,
    TogglePhev,
    DrillDown,
    ClearDrillDown,
    ShowChart,
    Reset,
    Export,
    Quit,
}

impl SessionAction {
    const ALL: &[Self] = &[
        Self::Search,
        Self::YearRange,
        Self::ToggleBev,
        Self::TogglePhev,
        Self::DrillDown,
        Self::ClearDrillDown,
        Self::ShowChart,
        Self::Reset,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search manufacturers",
            Self::YearRange => "Set model year range",
            Self::ToggleBev => "Toggle BEV",
            Self::TogglePhev => "Toggle PHEV",
            Self::DrillDown => "Select manufacturer (drill down)",
            Self::ClearDrillDown => "Clear manufacturer selection",
            Self::ShowChart => "Show chart data (JSON)",
            Self::Reset => "Reset filters",
            Self::Export => "Export filtered rows (CSV)",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt, the controller task, or an export fails.
#[allow(clippy::future_not_send)]
pub async fn run(
    config: &DashboardConfig,
    records: Vec<VehicleRecord>,
) -> Result<(), Box<dyn std::error::Error>> {
    let records: Arc<[VehicleRecord]> = records.into();
    let mut controller = Controller::new(Arc::clone(&records), config.initial_state())
        .with_export_limit(config.crossfilter.export_limit);
    controller.subscribe(Box::new(TerminalSink::new(TERMINAL_ROWS)));

    let dashboard = DebouncedController::spawn(controller, config.debounce_window());
    let labels: Vec<&str> = SessionAction::ALL.iter().map(SessionAction::label).collect();

    loop {
        let snapshot = dashboard.snapshot().await?;
        println!();
        println!("Filters: {}", snapshot.state.describe());

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match SessionAction::ALL[idx] {
            SessionAction::Search => {
                let text: String = Input::new()
                    .with_prompt("Manufacturer contains (empty for all)")
                    .allow_empty(true)
                    .interact_text()?;
                print_suggestions(&records, &text);
                dashboard.dispatch(FilterAction::SetSearch(text))?;
            }
            SessionAction::YearRange => {
                let criteria = &snapshot.state.criteria;
                let min: i32 = Input::new()
                    .with_prompt("From model year")
                    .default(criteria.year_min)
                    .interact_text()?;
                let max: i32 = Input::new()
                    .with_prompt("To model year")
                    .default(criteria.year_max)
                    .interact_text()?;
                dashboard.dispatch(FilterAction::SetYearRange { min, max })?;
            }
            SessionAction::ToggleBev => {
                let include = !snapshot.state.criteria.include_bev;
                dashboard.dispatch(FilterAction::SetIncludeBev(include))?;
            }
            SessionAction::TogglePhev => {
                let include = !snapshot.state.criteria.include_phev;
                dashboard.dispatch(FilterAction::SetIncludePhev(include))?;
            }
            SessionAction::DrillDown => {
                let makes = &snapshot.charts.top_makes;
                if makes.is_empty() {
                    println!("No manufacturers match the current filters.");
                    continue;
                }
                let items: Vec<String> = makes
                    .iter()
                    .map(|m| format!("{} ({})", m.make, format_count(m.count)))
                    .collect();
                let pick = Select::new()
                    .with_prompt("Manufacturer")
                    .items(&items)
                    .default(0)
                    .interact()?;
                dashboard.dispatch(FilterAction::ToggleDrillDown(makes[pick].make.clone()))?;
            }
            SessionAction::ClearDrillDown => dashboard.dispatch(FilterAction::ClearDrillDown)?,
            SessionAction::ShowChart => {
                let kinds = ChartKind::all();
                let names: Vec<&str> = kinds.iter().map(|kind| kind.as_ref()).collect();
                let pick = Select::new()
                    .with_prompt("Chart")
                    .items(&names)
                    .default(0)
                    .interact()?;
                let json = snapshot_json(&snapshot, Some(kinds[pick]))?;
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            SessionAction::Reset => dashboard.dispatch(FilterAction::Reset)?,
            SessionAction::Export => {
                let path: String = Input::new()
                    .with_prompt("Output file")
                    .default("ev_export.csv".to_string())
                    .interact_text()?;
                let written = dashboard
                    .export(BufWriter::new(File::create(&path)?))
                    .await?;
                println!(
                    "Wrote {} rows to {path} (limit {})",
                    format_count(written as u64),
                    format_count(config.crossfilter.export_limit as u64)
                );
            }
            SessionAction::Quit => break,
        }
    }

    dashboard.shutdown().await?;
    Ok(())
}

/// Prints the manufacturers matching `query`, like the search dropdown.
fn print_suggestions(records: &[VehicleRecord], query: &str) {
    if query.trim().is_empty() {
        return;
    }
    let suggestions = manufacturer_suggestions(records, query);
    if suggestions.is_empty() {
        println!("No manufacturers match \"{query}\"");
        return;
    }
    let shown: Vec<String> = suggestions
        .iter()
        .take(SUGGESTION_LIMIT)
        .map(|m| format!("{} ({})", m.make, format_count(m.count)))
        .collect();
    println!("Matching: {}", shown.join(", "));
}
