//! Geolocated registrations for the map overlay.

use ev_dashboard_aggregate_models::{CityCluster, GeoPoint};
use ev_dashboard_vehicle_models::VehicleRecord;

use crate::grouping::group_by;
use crate::mean;

/// Projects every record with two finite coordinates to a [`GeoPoint`].
#[must_use]
pub fn geo_points<'a, I>(records: I) -> Vec<GeoPoint>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    records
        .into_iter()
        .filter_map(|r| {
            let (lon, lat) = r.coordinates()?;
            Some(GeoPoint {
                lon,
                lat,
                city: r.city_or_unknown().to_owned(),
                make: r.make_or_unknown().to_owned(),
            })
        })
        .collect()
}

/// Aggregates points per city: mean coordinates and count, most
/// registrations first.
#[must_use]
pub fn city_clusters<'a>(points: &'a [GeoPoint]) -> Vec<CityCluster> {
    let by_city = group_by(points, |p: &'a GeoPoint| Some(p.city.as_str()));

    let mut clusters: Vec<CityCluster> = by_city
        .into_iter()
        .map(|(city, members)| CityCluster {
            city: city.to_owned(),
            lon: mean(members.iter().map(|p| p.lon)).unwrap_or_default(),
            lat: mean(members.iter().map(|p| p.lat)).unwrap_or_default(),
            count: members.len() as u64,
        })
        .collect();

    clusters.sort_by(|a, b| b.count.cmp(&a.count));
    clusters
}
