#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cross-filter state for the dashboard.
//!
//! A [`FilterState`] is an immutable value. Every change goes through
//! [`FilterState::reduce`], which returns a new state and enforces the
//! `year_min <= year_max` invariant. The state has two independent parts:
//! the inclusion [`FilterCriteria`] that decide the filtered record set,
//! and the optional drill-down manufacturer selected by clicking a bar.

use ev_dashboard_vehicle_models::VehicleType;
use serde::{Deserialize, Serialize};

/// Default lower bound of the model year filter.
pub const DEFAULT_YEAR_MIN: i32 = 2010;

/// Default upper bound of the model year filter.
pub const DEFAULT_YEAR_MAX: i32 = 2024;

/// Inclusion criteria applied to every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Trimmed, lower-cased manufacturer substring. Empty matches all.
    pub search_text: String,
    /// Inclusive lower model year bound.
    pub year_min: i32,
    /// Inclusive upper model year bound.
    pub year_max: i32,
    /// Whether battery electric vehicles are included.
    pub include_bev: bool,
    /// Whether plug-in hybrids are included.
    pub include_phev: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::with_year_bounds(DEFAULT_YEAR_MIN, DEFAULT_YEAR_MAX)
    }
}

impl FilterCriteria {
    /// Criteria with no search text, both types included and the given
    /// year bounds. An inverted range is collapsed onto `year_max`.
    #[must_use]
    pub const fn with_year_bounds(year_min: i32, year_max: i32) -> Self {
        Self {
            search_text: String::new(),
            year_min: if year_min < year_max {
                year_min
            } else {
                year_max
            },
            year_max,
            include_bev: true,
            include_phev: true,
        }
    }

    /// Whether records of `vehicle_type` pass the type toggles.
    #[must_use]
    pub const fn includes(&self, vehicle_type: VehicleType) -> bool {
        match vehicle_type {
            VehicleType::Bev => self.include_bev,
            VehicleType::Phev => self.include_phev,
        }
    }

    /// Whether `year` lies inside the inclusive bounds.
    #[must_use]
    pub const fn contains_year(&self, year: i32) -> bool {
        self.year_min <= year && year <= self.year_max
    }

    fn normalized(mut self) -> Self {
        self.search_text = normalize_search(&self.search_text);
        self.year_min = self.year_min.min(self.year_max);
        self
    }
}

/// Trims and lower-cases raw search input.
#[must_use]
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An event that changes the filter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum FilterAction {
    /// Replace the manufacturer search text.
    SetSearch(String),
    /// Move the lower year bound, clamped to the upper bound.
    SetYearMin(i32),
    /// Move the upper year bound, clamped to the lower bound.
    SetYearMax(i32),
    /// Set both year bounds at once; an inverted lower bound is clamped.
    SetYearRange {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },
    /// Toggle battery electric vehicles.
    SetIncludeBev(bool),
    /// Toggle plug-in hybrids.
    SetIncludePhev(bool),
    /// Replace all criteria.
    SetCriteria(FilterCriteria),
    /// Restore the default criteria.
    Reset,
    /// Manufacturer bar clicked: select it, or clear it if already selected.
    ToggleDrillDown(String),
    /// Clear the drill-down selection.
    ClearDrillDown,
}

impl FilterAction {
    /// Whether this action changes the inclusion criteria (and therefore
    /// the filtered record set) rather than only the drill-down.
    #[must_use]
    pub const fn is_criteria_change(&self) -> bool {
        !matches!(self, Self::ToggleDrillDown(_) | Self::ClearDrillDown)
    }
}

/// The whole cross-filter state of one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Inclusion criteria.
    pub criteria: FilterCriteria,
    /// Manufacturer selected by a bar click, if any.
    pub drill_down_make: Option<String>,
    /// Criteria restored by [`FilterAction::Reset`].
    #[serde(skip)]
    pub defaults: FilterCriteria,
}

impl FilterState {
    /// Initial state whose criteria (and reset target) are `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: FilterCriteria) -> Self {
        let defaults = defaults.normalized();
        Self {
            criteria: defaults.clone(),
            drill_down_make: None,
            defaults,
        }
    }

    /// Applies `action` and returns the resulting state.
    ///
    /// Any criteria change clears the drill-down selection.
    #[must_use]
    pub fn reduce(&self, action: FilterAction) -> Self {
        let mut next = self.clone();

        match action {
            FilterAction::SetSearch(text) => {
                next.criteria.search_text = normalize_search(&text);
            }
            FilterAction::SetYearMin(year) => {
                next.criteria.year_min = year.min(next.criteria.year_max);
            }
            FilterAction::SetYearMax(year) => {
                next.criteria.year_max = year.max(next.criteria.year_min);
            }
            FilterAction::SetYearRange { min, max } => {
                next.criteria.year_min = min.min(max);
                next.criteria.year_max = max;
            }
            FilterAction::SetIncludeBev(include) => next.criteria.include_bev = include,
            FilterAction::SetIncludePhev(include) => next.criteria.include_phev = include,
            FilterAction::SetCriteria(criteria) => next.criteria = criteria.normalized(),
            FilterAction::Reset => next.criteria = self.defaults.clone(),
            FilterAction::ToggleDrillDown(make) => {
                next.drill_down_make = if self.drill_down_make.as_deref() == Some(make.as_str()) {
                    None
                } else {
                    Some(make)
                };
                return next;
            }
            FilterAction::ClearDrillDown => {
                next.drill_down_make = None;
                return next;
            }
        }

        next.drill_down_make = None;
        next
    }

    /// Applies every action in order.
    #[must_use]
    pub fn reduce_all(&self, actions: impl IntoIterator<Item = FilterAction>) -> Self {
        actions
            .into_iter()
            .fold(self.clone(), |state, action| state.reduce(action))
    }

    /// One-line human readable description of the active filters.
    #[must_use]
    pub fn describe(&self) -> String {
        let c = &self.criteria;
        let types = match (c.include_bev, c.include_phev) {
            (true, true) => "BEV, PHEV",
            (true, false) => "BEV",
            (false, true) => "PHEV",
            (false, false) => "none",
        };

        let mut parts = Vec::with_capacity(4);
        if !c.search_text.is_empty() {
            parts.push(format!("Search: \"{}\"", c.search_text));
        }
        parts.push(format!("Years: {}-{}", c.year_min, c.year_max));
        parts.push(format!("Types: {types}"));
        if let Some(make) = &self.drill_down_make {
            parts.push(format!("Manufacturer: {make}"));
        }

        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_cover_both_types_and_decade() {
        let state = FilterState::default();
        assert_eq!(state.criteria.year_min, 2010);
        assert_eq!(state.criteria.year_max, 2024);
        assert!(state.criteria.include_bev && state.criteria.include_phev);
        assert!(state.criteria.search_text.is_empty());
        assert_eq!(state.drill_down_make, None);
    }

    #[test]
    fn year_min_past_max_is_clamped() {
        let state = FilterState::default().reduce(FilterAction::SetYearMin(2030));
        assert_eq!(state.criteria.year_min, 2024);
        assert_eq!(state.criteria.year_max, 2024);

        let state = FilterState::default().reduce(FilterAction::SetYearMax(2005));
        assert_eq!(state.criteria.year_min, 2010);
        assert_eq!(state.criteria.year_max, 2010);
    }

    #[test]
    fn inverted_ranges_are_clamped() {
        let state = FilterState::default().reduce(FilterAction::SetYearRange {
            min: 2030,
            max: 2024,
        });
        assert_eq!(
            (state.criteria.year_min, state.criteria.year_max),
            (2024, 2024)
        );

        let criteria = FilterCriteria {
            year_min: 2030,
            ..FilterCriteria::default()
        };
        let state = FilterState::default().reduce(FilterAction::SetCriteria(criteria));
        assert_eq!(state.criteria.year_min, 2024);

        assert_eq!(FilterCriteria::with_year_bounds(2020, 2012).year_min, 2012);
    }

    #[test]
    fn search_is_normalized() {
        let state = FilterState::default().reduce(FilterAction::SetSearch("  TeS ".to_string()));
        assert_eq!(state.criteria.search_text, "tes");
    }

    #[test]
    fn drill_down_toggles() {
        let base = FilterState::default();
        let selected = base.reduce(FilterAction::ToggleDrillDown("Tesla".to_string()));
        assert_eq!(selected.drill_down_make.as_deref(), Some("Tesla"));

        let switched = selected.reduce(FilterAction::ToggleDrillDown("Ford".to_string()));
        assert_eq!(switched.drill_down_make.as_deref(), Some("Ford"));

        let cleared = switched.reduce(FilterAction::ToggleDrillDown("Ford".to_string()));
        assert_eq!(cleared, base);

        assert_eq!(selected.reduce(FilterAction::ClearDrillDown), base);
    }

    #[test]
    fn criteria_change_clears_drill_down() {
        let state = FilterState::default()
            .reduce(FilterAction::ToggleDrillDown("Tesla".to_string()))
            .reduce(FilterAction::SetIncludePhev(false));
        assert_eq!(state.drill_down_make, None);
        assert!(!state.criteria.include_phev);
    }

    #[test]
    fn reset_restores_configured_defaults() {
        let state = FilterState::with_defaults(FilterCriteria::with_year_bounds(2015, 2023));
        let changed = state.reduce_all([
            FilterAction::SetSearch("kia".to_string()),
            FilterAction::SetIncludeBev(false),
            FilterAction::SetYearRange {
                min: 2018,
                max: 2019,
            },
        ]);
        assert_ne!(changed, state);
        assert_eq!(changed.reduce(FilterAction::Reset), state);
    }

    #[test]
    fn only_drill_down_actions_skip_recompute_of_filtered_set() {
        assert!(FilterAction::Reset.is_criteria_change());
        assert!(FilterAction::SetSearch(String::new()).is_criteria_change());
        assert!(!FilterAction::ClearDrillDown.is_criteria_change());
        assert!(!FilterAction::ToggleDrillDown("Kia".to_string()).is_criteria_change());
    }

    #[test]
    fn describes_active_filters() {
        let state = FilterState::default()
            .reduce(FilterAction::SetSearch("tes".to_string()))
            .reduce(FilterAction::SetIncludePhev(false))
            .reduce(FilterAction::ToggleDrillDown("Tesla".to_string()));
        assert_eq!(
            state.describe(),
            "Search: \"tes\" | Years: 2010-2024 | Types: BEV | Manufacturer: Tesla"
        );
        assert_eq!(
            FilterState::default().describe(),
            "Years: 2010-2024 | Types: BEV, PHEV"
        );

        let state = FilterState::default()
            .reduce(FilterAction::SetYearRange {
                min: 2015,
                max: 2020,
            })
            .reduce(FilterAction::SetIncludeBev(false))
            .reduce(FilterAction::SetIncludePhev(false))
            .reduce(FilterAction::ToggleDrillDown("Kia".to_string()));
        assert_eq!(
            state.describe(),
            "Years: 2015-2020 | Types: none | Manufacturer: Kia"
        );
    }

    #[test]
    fn actions_serialize_tagged() {
        let json = serde_json::to_string(&FilterAction::SetYearMin(2015)).unwrap();
        assert_eq!(json, r#"{"type":"setYearMin","value":2015}"#);
    }
}
