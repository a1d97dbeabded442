//! Synchronous cross-filter controller.

use std::io::Write;
use std::sync::Arc;

use ev_dashboard_filter::{apply, select};
use ev_dashboard_filter_models::{FilterAction, FilterState};
use ev_dashboard_source::SourceError;
use ev_dashboard_source::export::{DEFAULT_EXPORT_LIMIT, write_export};
use ev_dashboard_vehicle_models::VehicleRecord;

use crate::sink::{ChartSink, render};
use crate::snapshot::DashboardSnapshot;

/// Handle returned by [`Controller::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

/// Owns the dataset and the filter state, and keeps every subscribed
/// sink in sync with them.
pub struct Controller {
    records: Arc<[VehicleRecord]>,
    state: FilterState,
    filtered: Vec<usize>,
    snapshot: DashboardSnapshot,
    sinks: Vec<(SinkId, Box<dyn ChartSink>)>,
    next_sink_id: u64,
    export_limit: usize,
    recomputes: u64,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("records", &self.records.len())
            .field("state", &self.state)
            .field("filtered", &self.filtered.len())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates a controller over `records` starting from `initial`.
    #[must_use]
    pub fn new(records: impl Into<Arc<[VehicleRecord]>>, initial: FilterState) -> Self {
        let records = records.into();
        let filtered = apply(&records, &initial.criteria);
        let snapshot = DashboardSnapshot::compute(&records, &filtered, &initial);

        log::info!(
            "Cross-filter ready: {} records, {} pass the initial filters",
            records.len(),
            filtered.len()
        );

        Self {
            records,
            state: initial,
            filtered,
            snapshot,
            sinks: Vec::new(),
            next_sink_id: 0,
            export_limit: DEFAULT_EXPORT_LIMIT,
            recomputes: 0,
        }
    }

    /// Sets the maximum number of rows written by [`Self::export`].
    #[must_use]
    pub const fn with_export_limit(mut self, limit: usize) -> Self {
        self.export_limit = limit;
        self
    }

    /// Registers `sink` and immediately renders the current snapshot to it.
    pub fn subscribe(&mut self, mut sink: Box<dyn ChartSink>) -> SinkId {
        let id = SinkId(self.next_sink_id);
        self.next_sink_id += 1;
        render(sink.as_mut(), &self.snapshot);
        self.sinks.push((id, sink));
        id
    }

    /// Removes a sink, returning it if it was subscribed.
    pub fn unsubscribe(&mut self, id: SinkId) -> Option<Box<dyn ChartSink>> {
        let index = self.sinks.iter().position(|(sink_id, _)| *sink_id == id)?;
        Some(self.sinks.remove(index).1)
    }

    /// Applies one action, recomputes and notifies sinks.
    pub fn dispatch(&mut self, action: FilterAction) -> &DashboardSnapshot {
        self.dispatch_batch([action])
    }

    /// Applies `actions` in order with a single recompute at the end.
    ///
    /// Nothing is recomputed (and no sink is notified) when the resulting
    /// state equals the current one.
    pub fn dispatch_batch(
        &mut self,
        actions: impl IntoIterator<Item = FilterAction>,
    ) -> &DashboardSnapshot {
        let next = self.state.reduce_all(actions);
        if next == self.state {
            log::debug!("Filter state unchanged, skipping recompute");
            return &self.snapshot;
        }

        if next.criteria != self.state.criteria {
            self.filtered = apply(&self.records, &next.criteria);
        }
        self.state = next;
        self.recompute();
        &self.snapshot
    }

    fn recompute(&mut self) {
        self.snapshot = DashboardSnapshot::compute(&self.records, &self.filtered, &self.state);
        self.recomputes += 1;

        log::debug!(
            "Recompute #{}: {} filtered, {} effective ({})",
            self.recomputes,
            self.snapshot.filtered_count,
            self.snapshot.effective_count,
            self.state.describe()
        );

        for (_, sink) in &mut self.sinks {
            render(sink.as_mut(), &self.snapshot);
        }
    }

    /// Current filter state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Most recently computed snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// The full dataset.
    #[must_use]
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Number of recomputes since construction.
    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Records passing the criteria, in dataset order.
    pub fn filtered_records(&self) -> impl Iterator<Item = &VehicleRecord> + Clone {
        select(&self.records, &self.filtered, None)
    }

    /// Filtered records restricted to the drill-down make, if any.
    pub fn effective_records(&self) -> impl Iterator<Item = &VehicleRecord> + Clone {
        select(
            &self.records,
            &self.filtered,
            self.state.drill_down_make.as_deref(),
        )
    }

    /// Writes the first rows of the filtered set as CSV.
    ///
    /// The drill-down selection does not restrict the export.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if writing fails.
    pub fn export<W: Write>(&self, writer: W) -> Result<usize, SourceError> {
        let written = write_export(self.filtered_records(), self.export_limit, writer)?;
        log::info!("Exported {written} of {} filtered rows", self.filtered.len());
        Ok(written)
    }
}
