//! Dashboard configuration loaded from TOML.
//!
//! Every field has a default, so an absent file or a partial one is fine:
//!
//! ```toml
//! [data]
//! location = "data/Electric_Vehicle_Population_Data_Cleaned.csv"
//!
//! [filters]
//! year_min = 2010
//! year_max = 2024
//!
//! [crossfilter]
//! debounce_ms = 250
//! export_limit = 1000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ev_dashboard_filter_models::{DEFAULT_YEAR_MAX, DEFAULT_YEAR_MIN, FilterCriteria, FilterState};
use ev_dashboard_source::DataLocation;
use ev_dashboard_source::export::DEFAULT_EXPORT_LIMIT;
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "EV_DASHBOARD_CONFIG";

/// Environment variable overriding `data.location`.
pub const DATA_ENV: &str = "EV_DASHBOARD_DATA";

/// Dataset used when nothing else is configured.
pub const DEFAULT_DATA_LOCATION: &str = "data/Electric_Vehicle_Population_Data_Cleaned.csv";

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`DashboardConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Local path or `http(s)://` URL of the registration CSV.
    pub location: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_DATA_LOCATION.to_string(),
        }
    }
}

/// Initial (and reset) filter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Lower model year bound.
    pub year_min: i32,
    /// Upper model year bound.
    pub year_max: i32,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            year_min: DEFAULT_YEAR_MIN,
            year_max: DEFAULT_YEAR_MAX,
        }
    }
}

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossfilterConfig {
    /// Quiet window before debounced input is applied, in milliseconds.
    pub debounce_ms: u64,
    /// Maximum rows written by an export.
    pub export_limit: usize,
}

impl Default for CrossfilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            export_limit: DEFAULT_EXPORT_LIMIT,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset settings.
    pub data: DataConfig,
    /// Filter defaults.
    pub filters: FiltersConfig,
    /// Controller settings.
    pub crossfilter: CrossfilterConfig,
}

impl DashboardConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the configuration.
    ///
    /// Reads `path`, or the file named by [`CONFIG_ENV`] when `path` is
    /// `None`, or falls back to defaults when neither is set. [`DATA_ENV`]
    /// then overrides the data location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        Self::resolve(path.as_deref(), std::env::var(DATA_ENV).ok())
    }

    fn resolve(path: Option<&Path>, data_override: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::info!("Loaded config from {}", path.display());
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        if let Some(location) = data_override.filter(|l| !l.trim().is_empty()) {
            log::debug!("Data location overridden by {DATA_ENV}: {location}");
            config.data.location = location;
        }

        Ok(config)
    }

    /// Where to load the dataset from.
    #[must_use]
    pub fn data_location(&self) -> DataLocation {
        DataLocation::parse(&self.data.location)
    }

    /// Initial filter state; its criteria are also the reset target.
    #[must_use]
    pub fn initial_state(&self) -> FilterState {
        FilterState::with_defaults(FilterCriteria::with_year_bounds(
            self.filters.year_min,
            self.filters.year_max,
        ))
    }

    /// Debounce quiet window.
    #[must_use]
    pub const fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.crossfilter.debounce_ms)
    }
}
