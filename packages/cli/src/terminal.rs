//! A [`ChartSink`] that prints a compact text rendition of each chart.

use ev_dashboard_aggregate::city_clusters;
use ev_dashboard_aggregate_models::{
    BrandPerformance, GeoPoint, Insight, MakeCount, MakeSeries, RangePoint, Summary, TreeNode,
    TypeShare, YearTypeGroup, YearTypeStack,
};
use ev_dashboard_crossfilter::ChartSink;
use ev_dashboard_insights::format_count;

use crate::output::summary_text;

const BAR_WIDTH: u64 = 30;

/// Prints every chart to stdout.
pub struct TerminalSink {
    /// Rows shown for list-like charts.
    rows: usize,
}

impl TerminalSink {
    pub const fn new(rows: usize) -> Self {
        Self { rows }
    }
}

/// Scales `value` against `max` into a `#` bar.
#[allow(clippy::cast_possible_truncation)]
fn bar(value: u64, max: u64) -> String {
    let width = value.saturating_mul(BAR_WIDTH) / max.max(1);
    "#".repeat(width as usize)
}

/// `BEV 1,204 | PHEV 310` for the types present in one year.
fn group_line(row: &YearTypeGroup) -> String {
    row.groups
        .iter()
        .map(|group| format!("{} {}", group.vehicle_type, format_count(group.count)))
        .collect::<Vec<_>>()
        .join(" | ")
}

impl ChartSink for TerminalSink {
    fn top_makes(&mut self, data: &[MakeCount], highlighted: Option<&str>) {
        println!();
        println!("Top manufacturers");
        let max = data.first().map_or(0, |m| m.count);
        for make in data.iter().take(self.rows) {
            let marker = if highlighted == Some(make.make.as_str()) {
                '>'
            } else {
                ' '
            };
            println!(
                "{marker} {:<22} {:>9} {}",
                make.make,
                format_count(make.count),
                bar(make.count, max)
            );
        }
    }

    fn type_distribution(&mut self, data: &[TypeShare]) {
        let parts: Vec<String> = data
            .iter()
            .map(|share| {
                format!(
                    "{} {}% ({})",
                    share.vehicle_type,
                    share.percentage,
                    format_count(share.count)
                )
            })
            .collect();
        println!("Types: {}", parts.join(" | "));
    }

    fn make_model_hierarchy(&mut self, data: &TreeNode) {
        println!("Top models per manufacturer");
        for make in data.children.iter().take(self.rows) {
            let models: Vec<&str> = make.children.iter().map(|m| m.name.as_str()).collect();
            println!(
                "  {:<22} {:>9}  {}",
                make.name,
                format_count(make.total()),
                models.join(", ")
            );
        }
    }

    fn make_time_series(&mut self, data: &[MakeSeries]) {
        println!("Peak model year per manufacturer");
        for series in data.iter().take(self.rows) {
            let peak = series.values.iter().max_by_key(|point| point.count);
            if let Some(peak) = peak {
                println!(
                    "  {:<22} peak {} ({} registrations)",
                    series.make,
                    peak.year,
                    format_count(peak.count)
                );
            }
        }
    }

    fn year_type_stack(&mut self, data: &[YearTypeStack]) {
        println!("Registrations by model year (BEV/PHEV)");
        let max = data.iter().map(|row| row.bev + row.phev).max().unwrap_or(0);
        for row in data.iter().rev().take(self.rows) {
            println!(
                "  {} {:>9} / {:<9} {}",
                row.year,
                format_count(row.bev),
                format_count(row.phev),
                bar(row.bev + row.phev, max)
            );
        }
    }

    fn year_type_groups(&mut self, data: &[YearTypeGroup]) {
        println!("BEV vs PHEV by model year");
        for row in data.iter().rev().take(self.rows) {
            println!("  {} {}", row.year, group_line(row));
        }
    }

    fn range_trend(&mut self, data: &[RangePoint]) {
        let points: Vec<String> = data
            .iter()
            .rev()
            .take(self.rows)
            .rev()
            .map(|point| format!("{} {:.0} mi", point.year, point.average_range))
            .collect();
        if !points.is_empty() {
            println!("Average range: {}", points.join(", "));
        }
    }

    fn brand_performance(&mut self, data: &[BrandPerformance]) {
        if !data.is_empty() {
            println!("Brand performance");
        }
        for brand in data.iter().take(self.rows) {
            println!(
                "  {:<22} {:>9} vehicles, avg year {:.1}, avg range {:.0} mi",
                brand.make,
                format_count(brand.count),
                brand.average_year,
                brand.average_range
            );
        }
    }

    fn geo_points(&mut self, data: &[GeoPoint]) {
        let clusters = city_clusters(data);
        let top: Vec<String> = clusters
            .iter()
            .take(3)
            .map(|cluster| format!("{} ({})", cluster.city, format_count(cluster.count)))
            .collect();
        println!(
            "Map: {} located vehicles in {} cities. Densest: {}",
            format_count(data.len() as u64),
            clusters.len(),
            top.join(", ")
        );
    }

    fn summary(&mut self, summary: &Summary, insights: &[Insight]) {
        println!();
        print!("{}", summary_text(summary, insights));
    }

    fn active_filter(&mut self, make: Option<&str>) {
        if let Some(make) = make {
            println!("Showing {make} only (select it again to clear)");
        }
    }
}

#[cfg(test)]
mod tests {
    use ev_dashboard_aggregate_models::TypeCount;
    use ev_dashboard_vehicle_models::VehicleType;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn group_line_lists_present_types() {
        let row = YearTypeGroup {
            year: 2021,
            groups: vec![
                TypeCount {
                    vehicle_type: VehicleType::Bev,
                    count: 1_204,
                },
                TypeCount {
                    vehicle_type: VehicleType::Phev,
                    count: 310,
                },
            ],
        };
        assert_eq!(group_line(&row), "BEV 1,204 | PHEV 310");

        let row = YearTypeGroup {
            year: 2012,
            groups: vec![TypeCount {
                vehicle_type: VehicleType::Phev,
                count: 7,
            }],
        };
        assert_eq!(group_line(&row), "PHEV 7");
    }

    #[test]
    fn bars_scale_to_max() {
        assert_eq!(bar(10, 10).len(), 30);
        assert_eq!(bar(5, 10).len(), 15);
        assert_eq!(bar(0, 0), "");
    }
}
