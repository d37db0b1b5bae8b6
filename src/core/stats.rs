//! Queue counters and point-in-time statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::core::task::TaskOutcome;

/// Snapshot of queue utilization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Configured concurrency limit.
    pub concurrency: usize,
    /// Whether the queue is currently running.
    pub running: bool,
    /// Entries waiting in the buffer.
    pub pending: usize,
    /// Worker slots currently active.
    pub active_workers: usize,
    /// Total tasks submitted.
    pub submitted: u64,
    /// Tasks whose action returned `Ok`.
    pub completed: u64,
    /// Tasks whose action returned `Err`.
    pub failed: u64,
    /// Tasks whose action panicked.
    pub panicked: u64,
    /// Tasks removed by `clear()` before running.
    pub discarded: u64,
}

/// Lock-free lifetime counters.
#[derive(Debug, Default)]
pub(crate) struct QueueCounters {
    pub submitted: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
    pub panicked: AtomicU64,
    pub discarded: AtomicU64,
}

impl QueueCounters {
    pub fn record(&self, outcome: TaskOutcome) {
        let counter = match outcome {
            TaskOutcome::Succeeded => &self.completed,
            TaskOutcome::Failed => &self.failed,
            TaskOutcome::Panicked => &self.panicked,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Fill in the counter half of a snapshot; the caller supplies live state.
    pub fn snapshot(
        &self,
        concurrency: usize,
        running: bool,
        pending: usize,
        active_workers: usize,
    ) -> QueueStats {
        QueueStats {
            concurrency,
            running,
            pending,
            active_workers,
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}
