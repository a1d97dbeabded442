#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The cross-filter controller.
//!
//! A [`Controller`] owns the loaded records, the current
//! [`FilterState`](ev_dashboard_filter_models::FilterState) and the
//! filtered record set. Every [`FilterAction`](ev_dashboard_filter_models::FilterAction)
//! produces one complete [`DashboardSnapshot`] which is then pushed to each
//! subscribed [`ChartSink`]. [`DebouncedController`] runs a controller on a
//! tokio task and coalesces bursts of filter input.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod sink;
pub mod snapshot;

pub use config::{ConfigError, DashboardConfig};
pub use controller::{Controller, SinkId};
pub use debounce::{DEFAULT_DEBOUNCE, DebouncedController};
pub use sink::{ChartSink, render};
pub use snapshot::DashboardSnapshot;

/// Errors raised by the background controller task.
#[derive(Debug, thiserror::Error)]
pub enum CrossfilterError {
    /// The controller task is gone, so the command could not be delivered.
    #[error("Controller task is no longer running")]
    ChannelClosed,

    /// The controller task panicked or was cancelled.
    #[error("Controller task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// Writing the export failed.
    #[error("Export failed: {0}")]
    Export(#[from] ev_dashboard_source::SourceError),
}
