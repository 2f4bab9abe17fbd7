//! Fetch progress reporting
//!
//! The aggregator only talks to [`ProgressObserver`]; terminals, logs and
//! tests plug in their own implementation.

use tracing::info;

use crate::review::ReviewKind;

/// Receives progress events while a review list is drained
pub trait ProgressObserver {
    /// Draining starts; `total` is the `ps=0` count when it is known
    fn on_start(&mut self, kind: ReviewKind, total: Option<u64>);

    /// `fetched` reviews have been collected so far
    fn on_progress(&mut self, kind: ReviewKind, fetched: u64);

    /// Draining finished with `fetched` reviews
    fn on_finish(&mut self, kind: ReviewKind, fetched: u64);
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_start(&mut self, _kind: ReviewKind, _total: Option<u64>) {}

    fn on_progress(&mut self, _kind: ReviewKind, _fetched: u64) {}

    fn on_finish(&mut self, _kind: ReviewKind, _fetched: u64) {}
}

/// Emits progress as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress {
    total: Option<u64>,
}

impl ProgressObserver for LogProgress {
    fn on_start(&mut self, kind: ReviewKind, total: Option<u64>) {
        self.total = total;
        info!(kind = %kind, total = ?total, "Fetching reviews");
    }

    fn on_progress(&mut self, kind: ReviewKind, fetched: u64) {
        info!(kind = %kind, fetched, total = ?self.total, "Fetching reviews");
    }

    fn on_finish(&mut self, kind: ReviewKind, fetched: u64) {
        info!(kind = %kind, fetched, "Finished fetching reviews");
    }
}
