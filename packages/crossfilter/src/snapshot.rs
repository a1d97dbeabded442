//! One consistent view of every chart for a given filter state.

use ev_dashboard_aggregate::{
    brand_performance, geo_points, make_model_hierarchy, make_time_series, range_trend,
    top_makes, type_distribution, year_type_groups, year_type_stack,
};
use ev_dashboard_aggregate_models::{ChartSet, Insight, Summary};
use ev_dashboard_filter::select;
use ev_dashboard_filter_models::FilterState;
use ev_dashboard_insights::{generate_insights, summarize};
use ev_dashboard_vehicle_models::VehicleRecord;
use serde::{Deserialize, Serialize};

/// All chart data, summary and insights for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// State the snapshot was computed from.
    pub state: FilterState,
    /// Size of the filtered record set.
    pub filtered_count: u64,
    /// Size of the filtered set restricted to the drill-down make.
    pub effective_count: u64,
    /// Chart data.
    pub charts: ChartSet,
    /// Summary cards over the effective set.
    pub summary: Summary,
    /// Insights feed over the effective set.
    pub insights: Vec<Insight>,
}

impl DashboardSnapshot {
    /// Computes every view for `state`.
    ///
    /// `filtered` are the indices of `records` that pass the criteria. Top
    /// makes are computed over that whole set; everything else is
    /// restricted to the drill-down make when one is selected.
    #[must_use]
    pub fn compute(records: &[VehicleRecord], filtered: &[usize], state: &FilterState) -> Self {
        let drill_down = state.drill_down_make.as_deref();
        let all_filtered = select(records, filtered, None);
        let effective = select(records, filtered, drill_down);
        let allow_list: Option<Vec<String>> = drill_down.map(|make| vec![make.to_owned()]);

        let charts = ChartSet {
            top_makes: top_makes(all_filtered, None),
            type_distribution: type_distribution(effective.clone()),
            make_model_hierarchy: make_model_hierarchy(effective.clone()),
            make_time_series: make_time_series(effective.clone(), allow_list.as_deref()),
            year_type_stack: year_type_stack(effective.clone()),
            year_type_groups: year_type_groups(effective.clone()),
            range_trend: range_trend(effective.clone()),
            brand_performance: brand_performance(effective.clone()),
            geo_points: geo_points(effective.clone()),
        };

        Self {
            state: state.clone(),
            filtered_count: filtered.len() as u64,
            effective_count: effective.clone().count() as u64,
            charts,
            summary: summarize(effective.clone()),
            insights: generate_insights(effective),
        }
    }

    /// The drill-down make highlighted in the top makes chart.
    #[must_use]
    pub fn highlighted_make(&self) -> Option<&str> {
        self.state.drill_down_make.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use ev_dashboard_filter::apply;
    use ev_dashboard_filter_models::FilterAction;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::fleet;

    fn compute(records: &[VehicleRecord], state: &FilterState) -> DashboardSnapshot {
        let filtered = apply(records, &state.criteria);
        DashboardSnapshot::compute(records, &filtered, state)
    }

    #[test]
    fn drill_down_restricts_everything_but_top_makes() {
        let records = fleet();
        let state = FilterState::default().reduce(FilterAction::ToggleDrillDown("Tesla".to_string()));
        let snapshot = compute(&records, &state);

        assert_eq!(snapshot.filtered_count, 5);
        assert_eq!(snapshot.effective_count, 2);
        assert_eq!(snapshot.charts.top_makes.len(), 4);
        assert_eq!(snapshot.charts.make_time_series.len(), 1);
        assert_eq!(snapshot.charts.make_time_series[0].make, "Tesla");
        assert_eq!(snapshot.charts.geo_points.len(), 2);
        assert_eq!(snapshot.summary.total_vehicles, 2);
        assert_eq!(snapshot.highlighted_make(), Some("Tesla"));
    }

    #[test]
    fn no_drill_down_uses_filtered_set() {
        let records = fleet();
        let state = FilterState::default().reduce(FilterAction::SetIncludePhev(false));
        let snapshot = compute(&records, &state);

        assert_eq!(snapshot.filtered_count, 3);
        assert_eq!(snapshot.effective_count, 3);
        assert_eq!(snapshot.charts.type_distribution.len(), 1);
        assert_eq!(snapshot.highlighted_make(), None);
    }

    #[test]
    fn serializes_camel_case() {
        let records = fleet();
        let snapshot = compute(&records, &FilterState::default());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["filteredCount"], 5);
        assert!(json["charts"]["topMakes"].is_array());
        assert_eq!(json["state"]["criteria"]["yearMin"], 2010);
    }
}
