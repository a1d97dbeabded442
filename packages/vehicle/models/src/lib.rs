#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Electric vehicle registration record and type classification.
//!
//! This crate defines the normalized shape of one dataset row. Every field
//! is optional: rows are never rejected at the parse boundary, so every
//! consumer guards against missing values through these accessors instead
//! of re-checking raw strings.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Bucket name used when a grouping key is missing.
pub const UNKNOWN: &str = "Unknown";

/// Substring that marks a raw type label as battery-electric.
const BATTERY_MARKER: &str = "Battery";

/// Two-way vehicle type classification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum VehicleType {
    /// Battery electric vehicle
    Bev,
    /// Plug-in hybrid electric vehicle (and anything not recognized as BEV)
    Phev,
}

impl VehicleType {
    /// Classifies a raw type label.
    ///
    /// Labels containing `"Battery"` are [`Self::Bev`]; everything else,
    /// including a missing label, is [`Self::Phev`].
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some(label) if label.contains(BATTERY_MARKER) => Self::Bev,
            _ => Self::Phev,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Bev, Self::Phev]
    }
}

/// One vehicle registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Manufacturer name (case-sensitive).
    pub make: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub model_year: Option<i32>,
    /// Raw electric vehicle type label.
    pub vehicle_type: Option<String>,
    /// Electric range in miles, as parsed. May be zero or negative.
    pub electric_range: Option<f64>,
    /// Registration city.
    pub city: Option<String>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
}

impl VehicleRecord {
    /// Returns the two-way classification of this record's type label.
    #[must_use]
    pub fn category(&self) -> VehicleType {
        VehicleType::classify(self.vehicle_type.as_deref())
    }

    /// Returns the make, or [`UNKNOWN`] when missing.
    #[must_use]
    pub fn make_or_unknown(&self) -> &str {
        self.make.as_deref().unwrap_or(UNKNOWN)
    }

    /// Returns the model, or [`UNKNOWN`] when missing.
    #[must_use]
    pub fn model_or_unknown(&self) -> &str {
        self.model.as_deref().unwrap_or(UNKNOWN)
    }

    /// Returns the city, or [`UNKNOWN`] when missing.
    #[must_use]
    pub fn city_or_unknown(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN)
    }

    /// Returns the electric range only when it is usable range data
    /// (finite and strictly positive).
    #[must_use]
    pub fn positive_range(&self) -> Option<f64> {
        self.electric_range.filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Returns `(longitude, latitude)` when both are present and finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lon = self.longitude.filter(|v| v.is_finite())?;
        let lat = self.latitude.filter(|v| v.is_finite())?;
        Some((lon, lat))
    }

    /// Returns `true` if this record's make equals `make` exactly.
    #[must_use]
    pub fn is_make(&self, make: &str) -> bool {
        self.make.as_deref() == Some(make)
    }
}
