#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dataset loading, row parsing and CSV export for the EV dashboard.
//!
//! A [`RecordSource`] knows how to obtain the raw registration CSV (from
//! disk or over HTTP) and turn it into [`VehicleRecord`]s. Loading happens
//! once per session; a failure here is the only hard failure in the
//! dashboard.

pub mod csv_download;
pub mod export;
pub mod parsing;
pub mod progress;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ev_dashboard_vehicle_models::VehicleRecord;

use crate::progress::ProgressCallback;

/// Errors that can occur while loading or exporting the dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset has no header row.
    #[error("Dataset {location} has no header row")]
    MissingHeader {
        /// Where the dataset came from.
        location: String,
    },

    /// The dataset parsed but contained no rows.
    #[error("No data loaded from {location}")]
    EmptyDataset {
        /// Where the dataset came from.
        location: String,
    },
}

/// Trait implemented by every dataset origin.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable description of where the data comes from.
    fn location(&self) -> String;

    /// Loads and parses the full dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the data cannot be read, has no header,
    /// or contains no rows.
    async fn load(
        &self,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<VehicleRecord>, SourceError>;
}

/// A CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source reading the CSV file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(
        &self,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<VehicleRecord>, SourceError> {
        let location = self.location();
        log::info!("Reading dataset from {location}");
        let bytes = tokio::fs::read(&self.path).await?;
        log::debug!("Read {} bytes from {location}", bytes.len());
        parsing::parse_csv(&bytes, &location, progress)
    }
}

/// A CSV file served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    /// Creates a source downloading the CSV at `url`.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn load(
        &self,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Vec<VehicleRecord>, SourceError> {
        let bytes = csv_download::download(&self.url).await?;
        parsing::parse_csv(&bytes, &self.url, progress)
    }
}

/// Where the dataset lives, as written in configuration or on the command
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// Local file path.
    File(PathBuf),
    /// HTTP or HTTPS URL.
    Url(String),
}

impl DataLocation {
    /// Interprets `raw` as a URL when it starts with `http://` or
    /// `https://`, otherwise as a file path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Builds the [`RecordSource`] for this location.
    #[must_use]
    pub fn source(&self) -> Box<dyn RecordSource> {
        match self {
            Self::File(path) => Box::new(FileSource::new(path.clone())),
            Self::Url(url) => Box::new(HttpSource::new(url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    #[test]
    fn classifies_locations() {
        assert_eq!(
            DataLocation::parse("https://example.org/ev.csv"),
            DataLocation::Url("https://example.org/ev.csv".to_string())
        );
        assert_eq!(
            DataLocation::parse(" data/ev.csv "),
            DataLocation::File(PathBuf::from("data/ev.csv"))
        );
    }

    #[tokio::test]
    async fn file_source_loads_rows() {
        let path = std::env::temp_dir().join(format!(
            "ev_dashboard_source_test_{}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "Make,Model,Model Year,Electric Vehicle Type,Electric Range,City\n\
             TESLA,MODEL 3,2021,Battery Electric Vehicle (BEV),266,Seattle\n",
        )
        .unwrap();

        let source = DataLocation::File(path.clone()).source();
        let records = source.load(&null_progress()).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].make.as_deref(), Some("TESLA"));
        assert_eq!(records[0].model_year, Some(2021));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = FileSource::new("/nonexistent/ev_dashboard/missing.csv");
        let err = source.load(&null_progress()).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
