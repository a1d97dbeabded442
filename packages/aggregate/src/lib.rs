#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure aggregation functions turning registration records into chart data.
//!
//! Every function takes any iterator of `&VehicleRecord`, is deterministic
//! for a given input order, and never fails: empty or fully filtered input
//! yields an empty (or zero-valued) structure. Ties are always broken by
//! first-encounter order.

pub mod geo;
pub mod grouping;
pub mod makes;
pub mod trends;
pub mod vehicle_types;

pub use geo::{city_clusters, geo_points};
pub use makes::{
    brand_performance, make_model_hierarchy, make_time_series, manufacturer_suggestions,
    top_makes,
};
pub use trends::range_trend;
pub use vehicle_types::{type_distribution, year_type_groups, year_type_stack};

/// Number of bars in the top manufacturers chart.
pub const TOP_MAKES_LIMIT: usize = 15;

/// Models kept per make in the hierarchy.
pub const MODELS_PER_MAKE: usize = 5;

/// Makes kept in the hierarchy.
pub const HIERARCHY_MAKES: usize = 8;

/// Lines in the per-make time series.
pub const TIME_SERIES_MAKES: usize = 10;

/// Makes kept in the brand performance matrix.
pub const BRAND_PERFORMANCE_LIMIT: usize = 20;

/// A make needs strictly more registrations than this to appear in the
/// brand performance matrix.
pub const BRAND_PERFORMANCE_MIN_COUNT: u64 = 50;

/// Average model year reported for a make with no valid years.
pub const DEFAULT_AVERAGE_YEAR: f64 = 2020.0;

/// Rounds to one decimal place, halves away from zero.
///
/// `format!("{:.1}")` alone rounds exact ties to even (`0.25` → `"0.2"`);
/// percentages are rounded with this first so ties go up.
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean, or `None` for an empty input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0_u64), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}

#[cfg(test)]
pub(crate) mod test_support {
    use ev_dashboard_vehicle_models::VehicleRecord;

    pub const BEV_LABEL: &str = "Battery Electric Vehicle (BEV)";
    pub const PHEV_LABEL: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

    pub fn vehicle(make: &str, year: Option<i32>, bev: bool, range: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            make: Some(make.to_string()),
            model: Some(format!("{make} MODEL")),
            model_year: year,
            vehicle_type: Some(if bev { BEV_LABEL } else { PHEV_LABEL }.to_string()),
            electric_range: range,
            ..VehicleRecord::default()
        }
    }

    /// The three-record fixture used across the aggregation tests.
    pub fn tesla_ford() -> Vec<VehicleRecord> {
        vec![
            vehicle("Tesla", Some(2020), true, Some(250.0)),
            vehicle("Tesla", Some(2021), true, Some(300.0)),
            vehicle("Ford", Some(2021), false, Some(30.0)),
        ]
    }
}
