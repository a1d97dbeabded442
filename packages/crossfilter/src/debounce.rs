//! Debounced controller running on a background tokio task.
//!
//! Criteria actions (search keystrokes, slider drags, toggles) are queued
//! and applied as one batch once no new input has arrived for the quiet
//! window. Drill-down clicks are applied right away, after any queued
//! criteria.

use std::io::Write;
use std::time::Duration;

use ev_dashboard_filter_models::FilterAction;
use ev_dashboard_source::SourceError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::{Controller, CrossfilterError, DashboardSnapshot};

/// Quiet window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

enum Command {
    Dispatch(FilterAction),
    Snapshot(oneshot::Sender<DashboardSnapshot>),
    Export(
        Box<dyn Write + Send>,
        oneshot::Sender<Result<usize, SourceError>>,
    ),
}

/// Handle to a [`Controller`] owned by a background task.
#[derive(Debug)]
pub struct DebouncedController {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<Controller>,
}

impl DebouncedController {
    /// Moves `controller` onto a new task on the current tokio runtime.
    #[must_use]
    pub fn spawn(controller: Controller, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(controller, rx, window));
        Self { tx, task }
    }

    /// Queues `action`.
    ///
    /// # Errors
    ///
    /// Returns [`CrossfilterError::ChannelClosed`] if the task has stopped.
    pub fn dispatch(&self, action: FilterAction) -> Result<(), CrossfilterError> {
        self.tx
            .send(Command::Dispatch(action))
            .map_err(|_| CrossfilterError::ChannelClosed)
    }

    /// Flushes pending input and returns the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CrossfilterError::ChannelClosed`] if the task has stopped.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, CrossfilterError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Snapshot(reply))
            .map_err(|_| CrossfilterError::ChannelClosed)?;
        response.await.map_err(|_| CrossfilterError::ChannelClosed)
    }

    /// Flushes pending input, then writes the filtered rows to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`CrossfilterError::ChannelClosed`] if the task has stopped,
    /// or [`CrossfilterError::Export`] if writing fails.
    pub async fn export(
        &self,
        writer: impl Write + Send + 'static,
    ) -> Result<usize, CrossfilterError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Export(Box::new(writer), reply))
            .map_err(|_| CrossfilterError::ChannelClosed)?;
        let written = response
            .await
            .map_err(|_| CrossfilterError::ChannelClosed)??;
        Ok(written)
    }

    /// Flushes pending input, stops the task and hands the controller back.
    ///
    /// # Errors
    ///
    /// Returns [`CrossfilterError::TaskFailed`] if the task panicked.
    pub async fn shutdown(self) -> Result<Controller, CrossfilterError> {
        drop(self.tx);
        Ok(self.task.await?)
    }
}

fn flush(controller: &mut Controller, pending: &mut Vec<FilterAction>) {
    if pending.is_empty() {
        return;
    }
    log::debug!("Applying {} debounced filter actions", pending.len());
    controller.dispatch_batch(pending.drain(..));
}

async fn run(
    mut controller: Controller,
    mut rx: mpsc::UnboundedReceiver<Command>,
    window: Duration,
) -> Controller {
    let mut pending = Vec::new();

    loop {
        let command = if pending.is_empty() {
            rx.recv().await
        } else if let Ok(command) = tokio::time::timeout(window, rx.recv()).await {
            command
        } else {
            flush(&mut controller, &mut pending);
            continue;
        };

        match command {
            None => break,
            Some(Command::Dispatch(action)) if action.is_criteria_change() => {
                pending.push(action);
            }
            Some(Command::Dispatch(action)) => {
                flush(&mut controller, &mut pending);
                controller.dispatch(action);
            }
            Some(Command::Snapshot(reply)) => {
                flush(&mut controller, &mut pending);
                let _ = reply.send(controller.snapshot().clone());
            }
            Some(Command::Export(writer, reply)) => {
                flush(&mut controller, &mut pending);
                let _ = reply.send(controller.export(writer));
            }
        }
    }

    flush(&mut controller, &mut pending);
    controller
}

#[cfg(test)]
mod tests {
    use ev_dashboard_filter_models::FilterState;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{CountingSink, fleet};

    fn spawn_with_sink() -> (DebouncedController, CountingSink) {
        let mut controller = Controller::new(fleet(), FilterState::default());
        let sink = CountingSink::default();
        controller.subscribe(Box::new(sink.clone()));
        (DebouncedController::spawn(controller, DEFAULT_DEBOUNCE), sink)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_searches_recompute_once() {
        let (debounced, sink) = spawn_with_sink();

        for text in ["t", "te", "tes", "tesl", "tesla"] {
            debounced
                .dispatch(FilterAction::SetSearch(text.to_string()))
                .unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(sink.renders(), 1);

        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        assert_eq!(sink.renders(), 2);

        let controller = debounced.shutdown().await.unwrap();
        assert_eq!(controller.recompute_count(), 1);
        assert_eq!(controller.state().criteria.search_text, "tesla");
    }

    #[tokio::test(start_paused = true)]
    async fn drill_down_flushes_pending_criteria_first() {
        let (debounced, sink) = spawn_with_sink();

        debounced.dispatch(FilterAction::SetIncludePhev(false)).unwrap();
        debounced
            .dispatch(FilterAction::ToggleDrillDown("Tesla".to_string()))
            .unwrap();

        let snapshot = debounced.snapshot().await.unwrap();
        assert_eq!(snapshot.state.drill_down_make.as_deref(), Some("Tesla"));
        assert!(!snapshot.state.criteria.include_phev);
        assert_eq!(sink.renders(), 3);
        assert_eq!(sink.last_highlight.lock().unwrap().as_deref(), Some("Tesla"));
    }

    #[tokio::test(start_paused = true)]
    async fn export_sees_pending_criteria() {
        let (debounced, _sink) = spawn_with_sink();
        debounced
            .dispatch(FilterAction::SetSearch("tesla".to_string()))
            .unwrap();

        let written = debounced.export(std::io::sink()).await.unwrap();
        assert_eq!(written, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_flushes_pending_input() {
        let (debounced, _sink) = spawn_with_sink();
        debounced.dispatch(FilterAction::SetYearMin(2021)).unwrap();

        let controller = debounced.shutdown().await.unwrap();
        assert_eq!(controller.state().criteria.year_min, 2021);
        assert_eq!(controller.filtered_records().count(), 3);
    }
}
