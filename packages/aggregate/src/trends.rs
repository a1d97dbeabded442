//! Range evolution over model years.

use std::collections::BTreeMap;

use ev_dashboard_aggregate_models::RangePoint;
use ev_dashboard_vehicle_models::VehicleRecord;

/// Mean positive electric range per model year, ascending.
///
/// Years where no record has a positive range are dropped rather than
/// reported as zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn range_trend<'a, I>(records: I) -> Vec<RangePoint>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let mut per_year: BTreeMap<i32, (f64, u64)> = BTreeMap::new();
    for record in records {
        if let (Some(year), Some(range)) = (record.model_year, record.positive_range()) {
            let entry = per_year.entry(year).or_default();
            entry.0 += range;
            entry.1 += 1;
        }
    }

    per_year
        .into_iter()
        .map(|(year, (sum, n))| RangePoint {
            year,
            average_range: sum / n as f64,
        })
        .collect()
}
