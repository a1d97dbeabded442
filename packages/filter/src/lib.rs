#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter evaluation: which records pass the current criteria.

use ev_dashboard_filter_models::FilterCriteria;
use ev_dashboard_vehicle_models::VehicleRecord;

/// Returns `true` if `record` passes every stage of `criteria`.
///
/// Stages, in order: manufacturer search (records without a make never
/// match a non-empty search), model year bounds (records without a year
/// pass), and the vehicle type toggles.
#[must_use]
pub fn matches(record: &VehicleRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.search_text.is_empty() {
        let Some(make) = &record.make else {
            return false;
        };
        if !make.to_lowercase().contains(&criteria.search_text) {
            return false;
        }
    }

    if let Some(year) = record.model_year
        && !criteria.contains_year(year)
    {
        return false;
    }

    criteria.includes(record.category())
}

/// Indices of the records passing `criteria`, in dataset order.
#[must_use]
pub fn apply(records: &[VehicleRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, criteria))
        .map(|(i, _)| i)
        .collect()
}

/// Records at `indices`, optionally restricted to one manufacturer.
///
/// Indices out of range are skipped.
pub fn select<'a>(
    records: &'a [VehicleRecord],
    indices: &'a [usize],
    make: Option<&'a str>,
) -> impl Iterator<Item = &'a VehicleRecord> + Clone + 'a {
    indices
        .iter()
        .filter_map(|&i| records.get(i))
        .filter(move |record| make.is_none_or(|make| record.is_make(make)))
}
