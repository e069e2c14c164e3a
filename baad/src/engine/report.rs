//! Run outcome aggregation.
//!
//! Workers record outcomes into a shared accumulator built from atomic
//! counters plus a mutexed failure list; the final [`TransferReport`] is
//! a plain value snapshot taken after all workers have exited.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::catalog::Category;

/// One fatally-failed entry, surfaced so a rerun can be scoped.
#[derive(Debug, Clone)]
pub struct FailedTransfer {
    pub category: Category,
    pub name: String,
    pub reason: String,
}

/// Summary of one engine run.
#[derive(Debug, Clone, Default)]
pub struct TransferReport {
    /// Tasks the plan contained.
    pub planned: usize,
    /// Tasks whose file was downloaded and verified.
    pub completed: usize,
    /// Tasks that failed fatally.
    pub failed: usize,
    /// Tasks never finished (cancellation); re-planning re-queues them.
    pub skipped: usize,
    /// Retry attempts across all tasks.
    pub retries: usize,
    /// Integrity (size/CRC) rejections observed, including retried ones.
    pub integrity_failures: usize,
    /// Total payload bytes of completed transfers.
    pub bytes_transferred: u64,
    /// Fatally-failed entries in failure order.
    pub failures: Vec<FailedTransfer>,
}

impl TransferReport {
    /// True when any task failed fatally (drives the non-zero exit code).
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Concurrent-increment-safe accumulator shared by the workers.
#[derive(Debug, Default)]
pub(crate) struct ReportAccumulator {
    completed: AtomicUsize,
    retries: AtomicUsize,
    integrity_failures: AtomicUsize,
    bytes: AtomicU64,
    failures: Mutex<Vec<FailedTransfer>>,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completed(&self, bytes: u64) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_integrity_failure(&self) {
        self.integrity_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self, failure: FailedTransfer) {
        self.failures
            .lock()
            .expect("failure list poisoned")
            .push(failure);
    }

    /// Snapshot into a report. `planned` is the plan size; anything
    /// neither completed nor failed was skipped.
    pub fn finish(self, planned: usize) -> TransferReport {
        let failures = self.failures.into_inner().expect("failure list poisoned");
        let completed = self.completed.load(Ordering::SeqCst);
        let failed = failures.len();
        TransferReport {
            planned,
            completed,
            failed,
            skipped: planned.saturating_sub(completed + failed),
            retries: self.retries.load(Ordering::SeqCst),
            integrity_failures: self.integrity_failures.load(Ordering::SeqCst),
            bytes_transferred: self.bytes.load(Ordering::SeqCst),
            failures,
        }
    }
}
