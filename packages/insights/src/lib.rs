#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary cards and the insights feed.
//!
//! Both work on the effective record set (filtered, and restricted to the
//! drill-down manufacturer when one is selected).

use std::collections::{BTreeMap, BTreeSet, HashSet};

use ev_dashboard_aggregate::grouping::{count_by, max_by_count};
use ev_dashboard_aggregate::{mean, round_tenth};
use ev_dashboard_aggregate_models::{Insight, InsightKind, Summary, YearOverYear};
use ev_dashboard_vehicle_models::{VehicleRecord, VehicleType};

/// Text of the single insight shown for an empty set.
pub const NO_DATA_TEXT: &str = "No data matches current filters";

/// Formats `n` with comma thousands separators.
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Share of `total` in percent, rounded to one decimal with ties up.
#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_tenth(part as f64 / total as f64 * 100.0)
    }
}

fn counts_by_year<'a>(records: impl IntoIterator<Item = &'a VehicleRecord>) -> BTreeMap<i32, u64> {
    let mut per_year = BTreeMap::new();
    for year in records.into_iter().filter_map(|r| r.model_year) {
        *per_year.entry(year).or_default() += 1;
    }
    per_year
}

/// Counts for the two most recent distinct model years, or `None` when
/// fewer than two years are present.
#[must_use]
pub fn year_over_year<'a, I>(records: I) -> Option<YearOverYear>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let per_year = counts_by_year(records);
    let mut recent = per_year.into_iter().rev();
    let (latest_year, latest_count) = recent.next()?;
    let (prior_year, prior_count) = recent.next()?;

    Some(YearOverYear {
        prior_year,
        prior_count,
        latest_year,
        latest_count,
    })
}

/// Headline numbers for the summary cards.
#[must_use]
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a VehicleRecord>,
    I::IntoIter: Clone,
{
    let records = records.into_iter();

    let manufacturers: HashSet<&str> = records.clone().filter_map(|r| r.make.as_deref()).collect();
    let average_range = mean(records.clone().filter_map(VehicleRecord::positive_range))
        .map_or(0.0, f64::round);
    let yoy_growth_percent = year_over_year(records.clone())
        .and_then(|yoy| yoy.growth_percent())
        .unwrap_or(0.0);

    Summary {
        total_vehicles: records.count() as u64,
        manufacturers: manufacturers.len() as u64,
        average_range,
        yoy_growth_percent,
    }
}

/// The insights feed, in display order.
///
/// Each insight is omitted when the data it needs is missing. An empty set
/// yields a single [`InsightKind::NoData`] entry.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn generate_insights<'a, I>(records: I) -> Vec<Insight>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
    I::IntoIter: Clone,
{
    let records = records.into_iter();
    let total = records.clone().count() as u64;

    if total == 0 {
        return vec![Insight {
            kind: InsightKind::NoData,
            text: NO_DATA_TEXT.to_string(),
        }];
    }

    let mut insights = Vec::new();
    let mut push = |kind, text| insights.push(Insight { kind, text });

    let makes = count_by(records.clone(), |r: &'a VehicleRecord| r.make.as_deref());
    if let Some((make, count)) = max_by_count(&makes) {
        push(
            InsightKind::LeadingManufacturer,
            format!(
                "{make} leads with {} vehicles ({:.1}%)",
                format_count(*count),
                percent(*count, total)
            ),
        );
    }

    let bev = records
        .clone()
        .filter(|r| r.category() == VehicleType::Bev)
        .count() as u64;
    let phev = total - bev;
    push(
        InsightKind::TypeSplit,
        format!(
            "BEV: {:.1}% ({}) | PHEV: {:.1}% ({})",
            percent(bev, total),
            format_count(bev),
            percent(phev, total),
            format_count(phev)
        ),
    );

    let ranges: Vec<f64> = records
        .clone()
        .filter_map(VehicleRecord::positive_range)
        .collect();
    if let Some(average) = mean(ranges.iter().copied()) {
        let max = ranges.iter().copied().fold(f64::MIN, f64::max);
        push(
            InsightKind::Range,
            format!(
                "Avg range: {} mi | Max: {} mi",
                average.round() as i64,
                max.round() as i64
            ),
        );
    }

    let years = count_by(records.clone(), |r: &'a VehicleRecord| r.model_year);
    if let Some((peak_year, peak_count)) = max_by_count(&years) {
        let span: BTreeSet<i32> = years.iter().map(|(year, _)| *year).collect();
        if let (Some(first), Some(last)) = (span.first(), span.last()) {
            push(
                InsightKind::PeakYear,
                format!(
                    "Peak year: {peak_year} ({} vehicles) | Range: {first}-{last}",
                    format_count(*peak_count)
                ),
            );
        }
    }

    let cities = count_by(records.clone(), |r: &'a VehicleRecord| r.city.as_deref());
    if let Some((city, count)) = max_by_count(&cities) {
        push(
            InsightKind::TopCity,
            format!(
                "Top city: {city} with {} EVs ({:.1}%)",
                format_count(*count),
                percent(*count, total)
            ),
        );
    }

    let models: HashSet<(Option<&str>, Option<&str>)> = records
        .clone()
        .map(|r| (r.make.as_deref(), r.model.as_deref()))
        .filter(|pair| *pair != (None, None))
        .collect();
    push(
        InsightKind::Catalog,
        format!(
            "{} manufacturers | {} unique models",
            makes.len(),
            format_count(models.len() as u64)
        ),
    );

    if let Some(yoy) = year_over_year(records)
        && let Some(growth) = yoy.growth_percent()
    {
        let growth = round_tenth(growth);
        let sign = if growth > 0.0 { "+" } else { "" };
        push(
            InsightKind::Growth,
            format!(
                "{}→{}: {sign}{growth:.1}% ({}→{})",
                yoy.prior_year,
                yoy.latest_year,
                format_count(yoy.prior_count),
                format_count(yoy.latest_count)
            ),
        );
    }

    insights
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vehicle(make: &str, model: &str, year: i32, bev: bool, range: f64, city: &str) -> VehicleRecord {
        VehicleRecord {
            make: Some(make.to_string()),
            model: Some(model.to_string()),
            model_year: Some(year),
            vehicle_type: Some(
                if bev {
                    "Battery Electric Vehicle (BEV)"
                } else {
                    "Plug-in Hybrid Electric Vehicle (PHEV)"
                }
                .to_string(),
            ),
            electric_range: Some(range),
            city: Some(city.to_string()),
            ..VehicleRecord::default()
        }
    }

    fn fixture() -> Vec<VehicleRecord> {
        vec![
            vehicle("Tesla", "Model 3", 2020, true, 250.0, "Seattle"),
            vehicle("Tesla", "Model Y", 2021, true, 300.0, "Seattle"),
            vehicle("Ford", "Escape", 2021, false, 30.0, "Tacoma"),
        ]
    }

    #[test]
    fn formats_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn summary_of_fixture() {
        let summary = summarize(&fixture());
        assert_eq!(summary.total_vehicles, 3);
        assert_eq!(summary.manufacturers, 2);
        assert!((summary.average_range - 193.0).abs() < f64::EPSILON);
        assert!((summary.yoy_growth_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let summary = summarize(&Vec::<VehicleRecord>::new());
        assert_eq!(summary.total_vehicles, 0);
        assert_eq!(summary.manufacturers, 0);
        assert!(summary.average_range.abs() < f64::EPSILON);
        assert!(summary.yoy_growth_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn single_year_has_no_growth() {
        let records = vec![vehicle("Kia", "EV6", 2022, true, 250.0, "Olympia")];
        assert_eq!(year_over_year(&records), None);
        assert!(summarize(&records).yoy_growth_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn insights_for_fixture() {
        let texts: Vec<String> = generate_insights(&fixture())
            .into_iter()
            .map(|insight| insight.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "Tesla leads with 2 vehicles (66.7%)",
                "BEV: 66.7% (2) | PHEV: 33.3% (1)",
                "Avg range: 193 mi | Max: 300 mi",
                "Peak year: 2021 (2 vehicles) | Range: 2020-2021",
                "Top city: Seattle with 2 EVs (66.7%)",
                "2 manufacturers | 3 unique models",
                "2020→2021: +100.0% (1→2)",
            ]
        );
    }

    #[test]
    fn empty_set_yields_no_data() {
        assert_eq!(
            generate_insights(&Vec::<VehicleRecord>::new()),
            vec![Insight {
                kind: InsightKind::NoData,
                text: NO_DATA_TEXT.to_string(),
            }]
        );
    }

    #[test]
    fn insights_skip_missing_inputs() {
        let records = vec![VehicleRecord::default()];
        let kinds: Vec<InsightKind> = generate_insights(&records)
            .into_iter()
            .map(|insight| insight.kind)
            .collect();
        assert_eq!(kinds, vec![InsightKind::TypeSplit, InsightKind::Catalog]);
    }

    #[test]
    fn shares_round_exact_halves_up() {
        let mut records = vec![vehicle("Tesla", "Model 3", 2021, true, 250.0, "Seattle")];
        records.extend((0..399).map(|_| vehicle("Ford", "Escape", 2021, false, 30.0, "Tacoma")));

        let split = generate_insights(&records)
            .into_iter()
            .find(|insight| insight.kind == InsightKind::TypeSplit)
            .map(|insight| insight.text);
        assert_eq!(split.as_deref(), Some("BEV: 0.3% (1) | PHEV: 99.8% (399)"));
    }

    #[test]
    fn declining_growth_has_no_plus_sign() {
        let records = vec![
            vehicle("Kia", "EV6", 2022, true, 250.0, "Olympia"),
            vehicle("Kia", "EV6", 2022, true, 250.0, "Olympia"),
            vehicle("Kia", "EV6", 2023, true, 250.0, "Olympia"),
        ];
        let growth = generate_insights(&records)
            .into_iter()
            .find(|insight| insight.kind == InsightKind::Growth)
            .map(|insight| insight.text);
        assert_eq!(growth.as_deref(), Some("2022→2023: -50.0% (2→1)"));
    }
}
