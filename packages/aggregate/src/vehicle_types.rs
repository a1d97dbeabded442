//! Vehicle type aggregations: overall distribution and per-year splits.

use std::collections::BTreeMap;

use ev_dashboard_aggregate_models::{TypeCount, TypeShare, YearTypeGroup, YearTypeStack};
use ev_dashboard_vehicle_models::{VehicleRecord, VehicleType};

use crate::grouping::count_by;
use crate::round_tenth;

/// Share of each vehicle type, in first-encounter order.
///
/// Percentages are of the grand total and formatted to one decimal place.
/// An empty input returns an empty list.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn type_distribution<'a, I>(records: I) -> Vec<TypeShare>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let counts = count_by(records, |r: &'a VehicleRecord| Some(r.category()));
    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    counts
        .into_iter()
        .map(|(vehicle_type, count)| TypeShare {
            vehicle_type,
            count,
            percentage: format!("{:.1}", round_tenth(count as f64 / total as f64 * 100.0)),
        })
        .collect()
}

/// BEV/PHEV counts per valid model year, ascending.
fn counts_by_year<'a, I>(records: I) -> BTreeMap<i32, (u64, u64)>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let mut per_year: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for record in records {
        let Some(year) = record.model_year else {
            continue;
        };
        let entry = per_year.entry(year).or_default();
        match record.category() {
            VehicleType::Bev => entry.0 += 1,
            VehicleType::Phev => entry.1 += 1,
        }
    }
    per_year
}

/// One row per model year with both type counts (missing type → 0).
#[must_use]
pub fn year_type_stack<'a, I>(records: I) -> Vec<YearTypeStack>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    counts_by_year(records)
        .into_iter()
        .map(|(year, (bev, phev))| YearTypeStack { year, bev, phev })
        .collect()
}

/// One row per model year with a `{type, count}` pair for each type
/// present that year, BEV first.
#[must_use]
pub fn year_type_groups<'a, I>(records: I) -> Vec<YearTypeGroup>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    counts_by_year(records)
        .into_iter()
        .map(|(year, (bev, phev))| {
            let groups = [(VehicleType::Bev, bev), (VehicleType::Phev, phev)]
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(vehicle_type, count)| TypeCount {
                    vehicle_type,
                    count,
                })
                .collect();
            YearTypeGroup { year, groups }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{tesla_ford, vehicle};

    #[test]
    fn distribution_matches_fixture() {
        let shares = type_distribution(&tesla_ford());
        assert_eq!(
            shares,
            vec![
                TypeShare {
                    vehicle_type: VehicleType::Bev,
                    count: 2,
                    percentage: "66.7".to_string(),
                },
                TypeShare {
                    vehicle_type: VehicleType::Phev,
                    count: 1,
                    percentage: "33.3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn exact_half_tenths_round_up() {
        let mut records = vec![vehicle("Tesla", Some(2021), true, None)];
        records.extend((0..399).map(|_| vehicle("Ford", Some(2021), false, None)));

        let percentages: Vec<String> = type_distribution(&records)
            .into_iter()
            .map(|share| share.percentage)
            .collect();
        assert_eq!(percentages, vec!["0.3", "99.8"]);
    }

    #[test]
    fn distribution_of_nothing_is_empty() {
        assert!(type_distribution(&Vec::<VehicleRecord>::new()).is_empty());
    }

    #[test]
    fn unlabeled_records_count_as_phev() {
        let records = vec![VehicleRecord::default()];
        let shares = type_distribution(&records);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].vehicle_type, VehicleType::Phev);
        assert_eq!(shares[0].percentage, "100.0");
    }

    #[test]
    fn stack_fills_missing_types_with_zero() {
        let mut records = tesla_ford();
        records.push(vehicle("Kia", None, true, None));
        assert_eq!(
            year_type_stack(&records),
            vec![
                YearTypeStack {
                    year: 2020,
                    bev: 1,
                    phev: 0
                },
                YearTypeStack {
                    year: 2021,
                    bev: 1,
                    phev: 1
                },
            ]
        );
    }

    #[test]
    fn groups_emit_present_types_in_fixed_order() {
        let records = vec![
            vehicle("Ford", Some(2021), false, None),
            vehicle("Tesla", Some(2021), true, None),
            vehicle("Ford", Some(2019), false, None),
        ];
        assert_eq!(
            year_type_groups(&records),
            vec![
                YearTypeGroup {
                    year: 2019,
                    groups: vec![TypeCount {
                        vehicle_type: VehicleType::Phev,
                        count: 1
                    }],
                },
                YearTypeGroup {
                    year: 2021,
                    groups: vec![
                        TypeCount {
                            vehicle_type: VehicleType::Bev,
                            count: 1
                        },
                        TypeCount {
                            vehicle_type: VehicleType::Phev,
                            count: 1
                        },
                    ],
                },
            ]
        );
    }
}
