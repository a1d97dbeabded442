#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart-ready result types produced by the EV dashboard aggregations.
//!
//! Each chart consumes exactly one of these shapes. They serialize to the
//! camelCase JSON the chart layer expects.

use ev_dashboard_vehicle_models::VehicleType;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifies one of the nine dashboard charts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Top manufacturers bar chart (also the drill-down selector).
    TopMakes,
    /// BEV/PHEV donut.
    TypeDistribution,
    /// Make → model treemap.
    MakeModelHierarchy,
    /// Registrations per year, one line per make.
    MakeTimeSeries,
    /// Stacked BEV/PHEV bars per year.
    YearTypeStack,
    /// Side-by-side BEV/PHEV bars per year.
    YearTypeGroups,
    /// Average range per year.
    RangeTrend,
    /// Count vs. year vs. range bubbles per make.
    BrandPerformance,
    /// Registration locations.
    GeoPoints,
}

impl ChartKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TopMakes,
            Self::TypeDistribution,
            Self::MakeModelHierarchy,
            Self::MakeTimeSeries,
            Self::YearTypeStack,
            Self::YearTypeGroups,
            Self::RangeTrend,
            Self::BrandPerformance,
            Self::GeoPoints,
        ]
    }
}

/// Registration count for one manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeCount {
    /// Manufacturer name (`"Unknown"` for records without one).
    pub make: String,
    /// Number of registrations.
    pub count: u64,
}

/// Share of one vehicle type in the current set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShare {
    /// Vehicle type bucket.
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    /// Number of registrations.
    pub count: u64,
    /// Percentage of the grand total, formatted to one decimal place.
    pub percentage: String,
}

/// A node in the make → model tree.
///
/// The root and make nodes carry children; model leaves carry a `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Node label.
    pub name: String,
    /// Leaf count (models only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    /// Child nodes (empty for leaves).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
}

impl TreeNode {
    /// Creates an inner node.
    #[must_use]
    pub fn branch(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }

    /// Creates a leaf node.
    #[must_use]
    pub fn leaf(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// Sum of all leaf values under this node.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.value.unwrap_or(0) + self.children.iter().map(Self::total).sum::<u64>()
    }
}

/// Count for one model year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Model year.
    pub year: i32,
    /// Number of registrations.
    pub count: u64,
}

/// One manufacturer's registrations over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeSeries {
    /// Manufacturer name.
    pub make: String,
    /// Points sorted by ascending year.
    pub values: Vec<YearCount>,
}

/// BEV/PHEV counts for one year, flattened for stacked bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTypeStack {
    /// Model year.
    pub year: i32,
    /// Battery electric count.
    #[serde(rename = "BEV")]
    pub bev: u64,
    /// Plug-in hybrid count.
    #[serde(rename = "PHEV")]
    pub phev: u64,
}

/// Count for one vehicle type within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    /// Vehicle type bucket.
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    /// Number of registrations.
    pub count: u64,
}

/// BEV/PHEV counts for one year as parallel pairs, for grouped bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTypeGroup {
    /// Model year.
    pub year: i32,
    /// One entry per type present that year.
    pub groups: Vec<TypeCount>,
}

/// Mean electric range for one model year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePoint {
    /// Model year.
    pub year: i32,
    /// Mean of the strictly positive ranges that year.
    pub average_range: f64,
}

/// Fleet-size/age/range profile of one manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPerformance {
    /// Manufacturer name.
    pub make: String,
    /// Number of registrations.
    pub count: u64,
    /// Mean model year.
    pub average_year: f64,
    /// Mean of the strictly positive ranges.
    pub average_range: f64,
}

/// One geolocated registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// City (`"Unknown"` when missing).
    pub city: String,
    /// Manufacturer (`"Unknown"` when missing).
    pub make: String,
}

/// Registrations aggregated per city for the map overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCluster {
    /// City name.
    pub city: String,
    /// Mean longitude of the city's points.
    pub lon: f64,
    /// Mean latitude of the city's points.
    pub lat: f64,
    /// Number of points in the city.
    pub count: u64,
}

/// Every chart's data for one logical filter snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    /// Top manufacturers (always over the full filtered set).
    pub top_makes: Vec<MakeCount>,
    /// BEV/PHEV shares.
    pub type_distribution: Vec<TypeShare>,
    /// Make → model tree.
    pub make_model_hierarchy: TreeNode,
    /// Per-make time series.
    pub make_time_series: Vec<MakeSeries>,
    /// Stacked year/type counts.
    pub year_type_stack: Vec<YearTypeStack>,
    /// Grouped year/type counts.
    pub year_type_groups: Vec<YearTypeGroup>,
    /// Average range per year.
    pub range_trend: Vec<RangePoint>,
    /// Brand performance matrix.
    pub brand_performance: Vec<BrandPerformance>,
    /// Geolocated points.
    pub geo_points: Vec<GeoPoint>,
}

/// Headline statistics for the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of vehicles in the set.
    pub total_vehicles: u64,
    /// Number of distinct manufacturers.
    pub manufacturers: u64,
    /// Mean of the strictly positive ranges (0 when none).
    pub average_range: f64,
    /// Growth between the two most recent model years, in percent
    /// (0 when undefined).
    pub yoy_growth_percent: f64,
}

/// Counts for the two most recent model years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOverYear {
    /// Second most recent year.
    pub prior_year: i32,
    /// Registrations in `prior_year`.
    pub prior_count: u64,
    /// Most recent year.
    pub latest_year: i32,
    /// Registrations in `latest_year`.
    pub latest_count: u64,
}

impl YearOverYear {
    /// Growth from prior to latest year in percent, or `None` when the
    /// prior year has no registrations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn growth_percent(&self) -> Option<f64> {
        if self.prior_count == 0 {
            return None;
        }
        let prior = self.prior_count as f64;
        Some((self.latest_count as f64 - prior) / prior * 100.0)
    }
}

/// Category of a natural-language insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InsightKind {
    /// Leading manufacturer and its share.
    LeadingManufacturer,
    /// BEV vs PHEV split.
    TypeSplit,
    /// Average and maximum range.
    Range,
    /// Peak model year and year span.
    PeakYear,
    /// City with the most registrations.
    TopCity,
    /// Distinct manufacturer and model counts.
    Catalog,
    /// Year-over-year growth.
    Growth,
    /// Nothing matches the current filters.
    NoData,
}

/// One line of the insights feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// What this insight is about.
    pub kind: InsightKind,
    /// Rendered sentence.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_serializes_with_bucket_keys() {
        let row = YearTypeStack {
            year: 2021,
            bev: 3,
            phev: 1,
        };
        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json, serde_json::json!({ "year": 2021, "BEV": 3, "PHEV": 1 }));
    }

    #[test]
    fn type_share_serializes_type_key() {
        let share = TypeShare {
            vehicle_type: VehicleType::Bev,
            count: 2,
            percentage: "66.7".to_string(),
        };
        let json = serde_json::to_value(share).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "BEV", "count": 2, "percentage": "66.7" })
        );
    }

    #[test]
    fn tree_total_sums_leaves() {
        let tree = TreeNode::branch(
            "root",
            vec![
                TreeNode::branch("a", vec![TreeNode::leaf("a1", 3), TreeNode::leaf("a2", 2)]),
                TreeNode::branch("b", vec![TreeNode::leaf("b1", 4)]),
            ],
        );
        assert_eq!(tree.total(), 9);
    }

    #[test]
    fn growth_requires_prior_registrations() {
        let yoy = YearOverYear {
            prior_year: 2022,
            prior_count: 0,
            latest_year: 2023,
            latest_count: 5,
        };
        assert_eq!(yoy.growth_percent(), None);

        let yoy = YearOverYear {
            prior_count: 4,
            ..yoy
        };
        assert_eq!(yoy.growth_percent(), Some(25.0));
    }

    #[test]
    fn chart_kinds_are_distinct() {
        let names: std::collections::BTreeSet<String> =
            ChartKind::all().iter().map(ToString::to_string).collect();
        assert_eq!(names.len(), 9);
        assert!(names.contains("top_makes"));
    }
}
