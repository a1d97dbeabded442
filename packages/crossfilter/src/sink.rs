//! Rendering seam between the controller and chart implementations.

use ev_dashboard_aggregate_models::{
    BrandPerformance, ChartKind, GeoPoint, Insight, MakeCount, MakeSeries, RangePoint, Summary,
    TreeNode, TypeShare, YearTypeGroup, YearTypeStack,
};

use crate::DashboardSnapshot;

/// Receives chart data whenever the dashboard state changes.
///
/// Each method is called once per recompute with data from the same
/// snapshot. Implementations must not assume any particular call order
/// beyond that.
pub trait ChartSink: Send {
    /// Top manufacturers; `highlighted` is the drill-down make, if any.
    fn top_makes(&mut self, data: &[MakeCount], highlighted: Option<&str>);

    /// BEV/PHEV shares.
    fn type_distribution(&mut self, data: &[TypeShare]);

    /// Make → model tree.
    fn make_model_hierarchy(&mut self, data: &TreeNode);

    /// Registrations per year for each make.
    fn make_time_series(&mut self, data: &[MakeSeries]);

    /// Stacked per-year type counts.
    fn year_type_stack(&mut self, data: &[YearTypeStack]);

    /// Grouped per-year type counts.
    fn year_type_groups(&mut self, data: &[YearTypeGroup]);

    /// Average range per year.
    fn range_trend(&mut self, data: &[RangePoint]);

    /// Brand performance matrix.
    fn brand_performance(&mut self, data: &[BrandPerformance]);

    /// Geolocated registrations.
    fn geo_points(&mut self, data: &[GeoPoint]);

    /// Summary cards and insights feed.
    fn summary(&mut self, _summary: &Summary, _insights: &[Insight]) {}

    /// Active drill-down banner; `None` hides it.
    fn active_filter(&mut self, _make: Option<&str>) {}
}

/// Pushes every chart of `snapshot` to `sink`.
pub fn render(sink: &mut dyn ChartSink, snapshot: &DashboardSnapshot) {
    let charts = &snapshot.charts;

    for kind in ChartKind::all() {
        match kind {
            ChartKind::TopMakes => {
                sink.top_makes(&charts.top_makes, snapshot.highlighted_make());
            }
            ChartKind::TypeDistribution => sink.type_distribution(&charts.type_distribution),
            ChartKind::MakeModelHierarchy => {
                sink.make_model_hierarchy(&charts.make_model_hierarchy);
            }
            ChartKind::MakeTimeSeries => sink.make_time_series(&charts.make_time_series),
            ChartKind::YearTypeStack => sink.year_type_stack(&charts.year_type_stack),
            ChartKind::YearTypeGroups => sink.year_type_groups(&charts.year_type_groups),
            ChartKind::RangeTrend => sink.range_trend(&charts.range_trend),
            ChartKind::BrandPerformance => sink.brand_performance(&charts.brand_performance),
            ChartKind::GeoPoints => sink.geo_points(&charts.geo_points),
        }
    }

    sink.summary(&snapshot.summary, &snapshot.insights);
    sink.active_filter(snapshot.highlighted_make());
}
