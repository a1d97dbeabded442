//! Manufacturer-keyed aggregations.

use std::collections::BTreeMap;

use ev_dashboard_aggregate_models::{BrandPerformance, MakeCount, MakeSeries, TreeNode, YearCount};
use ev_dashboard_vehicle_models::VehicleRecord;

use crate::grouping::{count_by, group_by, sort_by_count_desc};
use crate::{
    BRAND_PERFORMANCE_LIMIT, BRAND_PERFORMANCE_MIN_COUNT, DEFAULT_AVERAGE_YEAR, HIERARCHY_MAKES,
    MODELS_PER_MAKE, TIME_SERIES_MAKES, TOP_MAKES_LIMIT, mean,
};

/// Name of the hierarchy root.
pub const HIERARCHY_ROOT: &str = "EV Market";

/// Returns `true` if `record` passes the optional manufacturer allow-list.
///
/// A missing or empty list allows everything; otherwise only records whose
/// make is listed pass.
fn allowed(record: &VehicleRecord, allow_list: Option<&[String]>) -> bool {
    match allow_list {
        Some(list) if !list.is_empty() => record
            .make
            .as_ref()
            .is_some_and(|make| list.contains(make)),
        _ => true,
    }
}

/// Registrations per manufacturer, highest first, capped at
/// [`TOP_MAKES_LIMIT`]. Records without a make count as `"Unknown"`.
#[must_use]
pub fn top_makes<'a, I>(records: I, allow_list: Option<&[String]>) -> Vec<MakeCount>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let mut counts = count_by(
        records.into_iter().filter(|r| allowed(r, allow_list)),
        |r: &'a VehicleRecord| Some(r.make_or_unknown()),
    );
    sort_by_count_desc(&mut counts);

    counts
        .into_iter()
        .take(TOP_MAKES_LIMIT)
        .map(|(make, count)| MakeCount {
            make: make.to_owned(),
            count,
        })
        .collect()
}

/// Make → model tree for area-proportional layout.
///
/// Each make keeps its top [`MODELS_PER_MAKE`] models; the top
/// [`HIERARCHY_MAKES`] makes are ranked by the sum of those kept model
/// counts, not by their full registration count.
#[must_use]
pub fn make_model_hierarchy<'a, I>(records: I) -> TreeNode
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let by_make = group_by(records, |r: &'a VehicleRecord| Some(r.make_or_unknown()));

    let mut makes: Vec<(u64, TreeNode)> = by_make
        .into_iter()
        .map(|(make, members)| {
            let mut models = count_by(members, |r: &'a VehicleRecord| Some(r.model_or_unknown()));
            sort_by_count_desc(&mut models);
            models.truncate(MODELS_PER_MAKE);

            let kept: u64 = models.iter().map(|(_, count)| count).sum();
            let leaves = models
                .into_iter()
                .map(|(model, count)| TreeNode::leaf(model, count))
                .collect();

            (kept, TreeNode::branch(make, leaves))
        })
        .collect();

    makes.sort_by(|a, b| b.0.cmp(&a.0));

    TreeNode::branch(
        HIERARCHY_ROOT,
        makes
            .into_iter()
            .take(HIERARCHY_MAKES)
            .map(|(_, node)| node)
            .collect(),
    )
}

/// Registrations per model year for each manufacturer.
///
/// Records without a make or year are skipped. Makes keep their
/// first-encounter order (not count order) and only the first
/// [`TIME_SERIES_MAKES`] makes with at least one point are returned.
#[must_use]
pub fn make_time_series<'a, I>(records: I, allow_list: Option<&[String]>) -> Vec<MakeSeries>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let by_make = group_by(
        records.into_iter().filter(|r| allowed(r, allow_list)),
        |r: &'a VehicleRecord| r.make.as_deref(),
    );

    by_make
        .into_iter()
        .filter_map(|(make, members)| {
            let mut per_year: BTreeMap<i32, u64> = BTreeMap::new();
            for year in members.iter().filter_map(|r| r.model_year) {
                *per_year.entry(year).or_default() += 1;
            }
            if per_year.is_empty() {
                return None;
            }
            Some(MakeSeries {
                make: make.to_owned(),
                values: per_year
                    .into_iter()
                    .map(|(year, count)| YearCount { year, count })
                    .collect(),
            })
        })
        .take(TIME_SERIES_MAKES)
        .collect()
}

/// Fleet size, average model year and average range per manufacturer.
///
/// Makes with [`BRAND_PERFORMANCE_MIN_COUNT`] or fewer registrations, or
/// without any positive range data, are dropped. The rest are sorted by
/// count (highest first) and capped at [`BRAND_PERFORMANCE_LIMIT`].
#[must_use]
pub fn brand_performance<'a, I>(records: I) -> Vec<BrandPerformance>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let by_make = group_by(records, |r: &'a VehicleRecord| r.make.as_deref());

    let mut rows: Vec<BrandPerformance> = by_make
        .into_iter()
        .map(|(make, members)| {
            let average_year = mean(members.iter().filter_map(|r| r.model_year).map(f64::from))
                .unwrap_or(DEFAULT_AVERAGE_YEAR);
            let average_range =
                mean(members.iter().filter_map(|r| r.positive_range())).unwrap_or(0.0);
            BrandPerformance {
                make: make.to_owned(),
                count: members.len() as u64,
                average_year,
                average_range,
            }
        })
        .filter(|row| row.count > BRAND_PERFORMANCE_MIN_COUNT && row.average_range > 0.0)
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(BRAND_PERFORMANCE_LIMIT);
    rows
}

/// Manufacturers whose name contains `query` (case-insensitive), with
/// their registration counts, highest first.
///
/// Records without a make are never suggested. An empty query lists every
/// manufacturer.
#[must_use]
pub fn manufacturer_suggestions<'a, I>(records: I, query: &str) -> Vec<MakeCount>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let needle = query.trim().to_lowercase();
    let mut counts = count_by(records, |r: &'a VehicleRecord| r.make.as_deref());
    sort_by_count_desc(&mut counts);

    counts
        .into_iter()
        .filter(|(make, _)| needle.is_empty() || make.to_lowercase().contains(&needle))
        .map(|(make, count)| MakeCount {
            make: make.to_owned(),
            count,
        })
        .collect()
}
