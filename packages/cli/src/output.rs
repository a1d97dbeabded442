//! Text and JSON rendering of snapshots for the command line.

use ev_dashboard_aggregate_models::{ChartKind, Insight, Summary};
use ev_dashboard_crossfilter::DashboardSnapshot;
use ev_dashboard_insights::format_count;
use serde_json::Value;

/// The whole snapshot, or only one chart's data when `chart` is given.
pub fn snapshot_json(
    snapshot: &DashboardSnapshot,
    chart: Option<ChartKind>,
) -> serde_json::Result<Value> {
    let charts = &snapshot.charts;
    match chart {
        None => serde_json::to_value(snapshot),
        Some(ChartKind::TopMakes) => serde_json::to_value(&charts.top_makes),
        Some(ChartKind::TypeDistribution) => serde_json::to_value(&charts.type_distribution),
        Some(ChartKind::MakeModelHierarchy) => serde_json::to_value(&charts.make_model_hierarchy),
        Some(ChartKind::MakeTimeSeries) => serde_json::to_value(&charts.make_time_series),
        Some(ChartKind::YearTypeStack) => serde_json::to_value(&charts.year_type_stack),
        Some(ChartKind::YearTypeGroups) => serde_json::to_value(&charts.year_type_groups),
        Some(ChartKind::RangeTrend) => serde_json::to_value(&charts.range_trend),
        Some(ChartKind::BrandPerformance) => serde_json::to_value(&charts.brand_performance),
        Some(ChartKind::GeoPoints) => serde_json::to_value(&charts.geo_points),
    }
}

/// Summary cards followed by one insight per line.
#[allow(clippy::cast_possible_truncation)]
pub fn summary_text(summary: &Summary, insights: &[Insight]) -> String {
    let growth = summary.yoy_growth_percent.round() as i64;
    let sign = if growth > 0 { "+" } else { "" };

    let mut out = format!(
        "Vehicles: {} | Manufacturers: {} | Avg range: {} mi | YoY: {sign}{growth}%\n",
        format_count(summary.total_vehicles),
        summary.manufacturers,
        summary.average_range,
    );
    for insight in insights {
        out.push_str(&format!("  - {}\n", insight.text));
    }
    out
}
