//! Progress events emitted by the transfer engine.
//!
//! Workers publish events onto a single consumer-facing channel. Events
//! from concurrent tasks interleave arbitrarily; consumers (a progress
//! renderer, a log) key on the task id.

use std::sync::mpsc;

/// Identifier of a task within one run: its index in the plan.
pub type TaskId = usize;

/// One progress event. Ordered per task, interleaved across tasks.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// A worker picked the task up (also emitted for retry attempts).
    TaskStarted {
        task: TaskId,
        name: String,
        size: u64,
        attempt: u32,
    },
    /// Cumulative bytes received for the task so far.
    TaskProgress { task: TaskId, bytes: u64 },
    /// The task's attempt failed but will be re-queued.
    TaskRetrying {
        task: TaskId,
        attempt: u32,
        reason: String,
    },
    /// The task completed and its file is in place.
    TaskCompleted { task: TaskId, bytes: u64 },
    /// The task failed fatally; it will not be retried within this run.
    TaskFailed { task: TaskId, reason: String },
}

/// Sending half of the event channel handed to the engine.
///
/// Send failures are ignored by the engine: a consumer that hung up
/// must not abort transfers.
pub type EventSink = mpsc::Sender<TransferEvent>;

/// Convenience constructor for an event channel.
pub fn channel() -> (EventSink, mpsc::Receiver<TransferEvent>) {
    mpsc::channel()
}
