//! Concurrent transfer engine.
//!
//! Executes a [`TransferPlan`] against the remote object store with a
//! fixed-size pool of worker threads drawing from a shared queue:
//!
//! ```text
//! TransferPlan ──► queue ──► worker 1 ─┐
//!                        ├► worker 2 ──┼──► ReportAccumulator ──► TransferReport
//!                        └► worker N ─┘           │
//!                                                 └──► event channel (progress UI)
//! ```
//!
//! Each task streams into a temporary file colocated with its
//! destination, is verified against the catalog's size and CRC, and is
//! atomically renamed into place. A concurrent or subsequent planning
//! pass therefore sees either nothing or a complete file, never a
//! partial one. There is no byte-offset resume: interrupted runs recover
//! by re-planning, which re-queues anything missing or mismatched.

mod cancel;
mod error;
mod events;
mod fetch;
mod report;

use std::collections::VecDeque;
use std::fs;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::local::VerifyPolicy;
use crate::plan::{TransferPlan, TransferTask};

pub use cancel::CancelToken;
pub use error::TransferError;
pub use events::{channel, EventSink, TaskId, TransferEvent};
pub use fetch::{FetchError, HttpFetcher, ObjectFetcher};
pub use report::{FailedTransfer, TransferReport};

use report::ReportAccumulator;

/// Default number of simultaneously in-flight transfers.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default attempt bound per task (first try + retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Backoff doubling stops after this many retries; later attempts keep
/// the capped pause instead of growing without bound.
const MAX_BACKOFF_EXPONENT: u32 = 5;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of worker threads; bounds in-flight transfers. Minimum 1.
    pub concurrency: usize,
    /// Attempts per task before it is marked fatally failed. Minimum 1.
    pub max_attempts: u32,
    /// Base pause before a retry is re-queued, doubled per attempt up
    /// to a fixed cap. Keeps a hot failure from busy-looping.
    pub retry_pause: Duration,
    /// Post-download verification strictness.
    pub verify: VerifyPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_pause: Duration::from_millis(250),
            verify: VerifyPolicy::default(),
        }
    }
}

/// A queued task plus its attempt count.
struct QueuedTransfer {
    id: TaskId,
    task: TransferTask,
    attempt: u32,
}

/// Executes transfer plans with bounded parallelism, per-task retry and
/// cooperative cancellation.
pub struct TransferEngine {
    fetcher: Arc<dyn ObjectFetcher>,
    config: EngineConfig,
}

impl TransferEngine {
    pub fn new(fetcher: Arc<dyn ObjectFetcher>, config: EngineConfig) -> Self {
        Self { fetcher, config }
    }

    /// Engine backed by the real HTTP fetcher.
    pub fn with_http(config: EngineConfig) -> Self {
        Self::new(Arc::new(HttpFetcher::new()), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute `plan` against `base_url`.
    ///
    /// Blocks until every task reached a terminal state or cancellation
    /// drained the queue. Per-task failures never abort the batch; the
    /// returned report lists them. Event send failures are ignored so a
    /// departed consumer cannot stall transfers.
    pub fn run(
        &self,
        plan: TransferPlan,
        base_url: &str,
        events: EventSink,
        cancel: &CancelToken,
    ) -> TransferReport {
        let planned = plan.len();
        if planned == 0 {
            return ReportAccumulator::new().finish(0);
        }

        let queue: Mutex<VecDeque<QueuedTransfer>> = Mutex::new(
            plan.into_tasks()
                .into_iter()
                .enumerate()
                .map(|(id, task)| QueuedTransfer {
                    id,
                    task,
                    attempt: 1,
                })
                .collect(),
        );
        let accumulator = ReportAccumulator::new();
        let workers = self.config.concurrency.max(1).min(planned);

        info!(tasks = planned, workers, "starting transfer run");

        thread::scope(|scope| {
            for _ in 0..workers {
                let events = events.clone();
                let queue = &queue;
                let accumulator = &accumulator;
                scope.spawn(move || {
                    self.worker_loop(queue, accumulator, &events, base_url, cancel)
                });
            }
        });

        let report = accumulator.finish(planned);
        info!(
            completed = report.completed,
            failed = report.failed,
            skipped = report.skipped,
            bytes = report.bytes_transferred,
            "transfer run finished"
        );
        report
    }

    /// Worker body: pull, transfer, report, repeat. A worker owns at
    /// most one task at a time; ownership moves only through the queue.
    fn worker_loop(
        &self,
        queue: &Mutex<VecDeque<QueuedTransfer>>,
        accumulator: &ReportAccumulator,
        events: &EventSink,
        base_url: &str,
        cancel: &CancelToken,
    ) {
        loop {
            if cancel.is_cancelled() {
                return;
            }

            let item = match queue.lock().expect("task queue poisoned").pop_front() {
                Some(item) => item,
                None => return,
            };

            let _ = events.send(TransferEvent::TaskStarted {
                task: item.id,
                name: item.task.entry.name.clone(),
                size: item.task.entry.size,
                attempt: item.attempt,
            });

            match self.transfer_one(&item.task, item.id, base_url, events, cancel) {
                Ok(bytes) => {
                    accumulator.record_completed(bytes);
                    let _ = events.send(TransferEvent::TaskCompleted {
                        task: item.id,
                        bytes,
                    });
                }
                Err(e) if e.is_cancelled() => return,
                Err(e) => {
                    if matches!(e, TransferError::Integrity { .. }) {
                        accumulator.record_integrity_failure();
                    }

                    if e.is_retryable() && item.attempt < self.config.max_attempts {
                        debug!(
                            name = %item.task.entry.name,
                            attempt = item.attempt,
                            error = %e,
                            "re-queueing failed transfer"
                        );
                        accumulator.record_retry();
                        let _ = events.send(TransferEvent::TaskRetrying {
                            task: item.id,
                            attempt: item.attempt,
                            reason: e.to_string(),
                        });
                        thread::sleep(self.backoff_pause(item.attempt));
                        queue
                            .lock()
                            .expect("task queue poisoned")
                            .push_back(QueuedTransfer {
                                attempt: item.attempt + 1,
                                ..item
                            });
                    } else {
                        let reason = e.to_string();
                        accumulator.record_failure(FailedTransfer {
                            category: item.task.entry.category,
                            name: item.task.entry.name.clone(),
                            reason: reason.clone(),
                        });
                        let _ = events.send(TransferEvent::TaskFailed {
                            task: item.id,
                            reason,
                        });
                    }
                }
            }
        }
    }

    /// Pause before re-queueing `attempt`: base pause doubled per
    /// retry, capped so arbitrarily high attempt bounds stay in shift
    /// range and never park a worker for minutes.
    fn backoff_pause(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        self.config.retry_pause * (1u32 << exponent)
    }

    /// One attempt: stream to a colocated temp file, verify, rename.
    /// Any error drops the temp file, so the destination is only ever
    /// absent or complete.
    fn transfer_one(
        &self,
        task: &TransferTask,
        id: TaskId,
        base_url: &str,
        events: &EventSink,
        cancel: &CancelToken,
    ) -> Result<u64, TransferError> {
        let url = join_url(base_url, &task.entry.remote_path);

        let parent = task.dest.parent().unwrap_or_else(|| task.dest.as_path());
        fs::create_dir_all(parent).map_err(|e| TransferError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| TransferError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;

        let (received, crc) = {
            let mut writer = CrcWriter::new(BufWriter::new(temp.as_file_mut()));
            let mut on_progress = |bytes: u64| {
                let _ = events.send(TransferEvent::TaskProgress { task: id, bytes });
            };
            let received = self
                .fetcher
                .fetch(&url, &mut writer, &mut on_progress, cancel)?;
            writer.flush().map_err(|e| TransferError::Io {
                path: task.dest.clone(),
                source: e,
            })?;
            (received, writer.crc())
        };

        if received != task.entry.size {
            return Err(TransferError::Integrity {
                name: task.entry.name.clone(),
                detail: format!("expected {} bytes, received {received}", task.entry.size),
            });
        }

        if self.config.verify == VerifyPolicy::CrcWhenAvailable {
            if let Some(expected) = task.entry.crc {
                if crc != expected {
                    return Err(TransferError::Integrity {
                        name: task.entry.name.clone(),
                        detail: format!("expected CRC {expected:08x}, computed {crc:08x}"),
                    });
                }
            }
        }

        temp.persist(&task.dest).map_err(|e| TransferError::Io {
            path: task.dest.clone(),
            source: e.error,
        })?;

        debug!(name = %task.entry.name, bytes = received, "transfer complete");
        Ok(received)
    }
}

/// Join a base URL and a relative locator with exactly one slash.
fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Write adapter computing a CRC-32 over everything written through it.
struct CrcWriter<W: Write> {
    inner: W,
    hasher: crc32fast::Hasher,
}

impl<W: Write> CrcWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn crc(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl<W: Write> Write for CrcWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, Category};
    use crate::plan::TransferPlan;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// In-memory fetcher serving canned bodies, optionally failing
    /// specific URLs, with an in-flight high-water mark for the
    /// concurrency-bound test.
    struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
        fail_with: HashMap<String, FetchError>,
        /// URL -> number of leading attempts to fail transiently.
        flaky: Mutex<HashMap<String, u32>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                bodies: HashMap::new(),
                fail_with: HashMap::new(),
                flaky: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_body(mut self, path: &str, body: &[u8]) -> Self {
            self.bodies.insert(path.to_string(), body.to_vec());
            self
        }

        fn with_failure(mut self, path: &str, error: FetchError) -> Self {
            self.fail_with.insert(path.to_string(), error);
            self
        }

        fn with_flaky(self, path: &str, failures: u32) -> Self {
            self.flaky
                .lock()
                .unwrap()
                .insert(path.to_string(), failures);
            self
        }

        fn max_observed(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    impl ObjectFetcher for FakeFetcher {
        fn fetch(
            &self,
            url: &str,
            sink: &mut dyn Write,
            on_progress: &mut dyn FnMut(u64),
            cancel: &CancelToken,
        ) -> Result<u64, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            // Give other workers a chance to overlap.
            thread::sleep(Duration::from_millis(5));

            let result = (|| {
                if cancel.is_cancelled() {
                    return Err(FetchError::Cancelled);
                }
                if let Some(err) = self.fail_with.get(url) {
                    return Err(err.clone());
                }
                if let Some(remaining) = self.flaky.lock().unwrap().get_mut(url) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(FetchError::Transient {
                            url: url.to_string(),
                            reason: "flaky".to_string(),
                        });
                    }
                }
                let body = self.bodies.get(url).cloned().unwrap_or_default();
                sink.write_all(&body).unwrap();
                on_progress(body.len() as u64);
                Ok(body.len() as u64)
            })();

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn entry(name: &str, size: u64, crc: Option<u32>) -> CatalogEntry {
        CatalogEntry {
            category: Category::TableBundle,
            name: name.to_string(),
            remote_path: format!("TableBundles/{name}"),
            size,
            crc,
        }
    }

    fn plan_for(root: &TempDir, entries: &[CatalogEntry]) -> TransferPlan {
        let manifest: String = {
            let tables: Vec<String> = entries
                .iter()
                .map(|e| {
                    format!(
                        r#""{}": {{"crc": {}, "size": {}}}"#,
                        e.name,
                        e.crc.unwrap_or(0),
                        e.size
                    )
                })
                .collect();
            format!(r#"{{"TableBundles": {{{}}}}}"#, tables.join(","))
        };
        let index = crate::catalog::CatalogIndex::parse(manifest.as_bytes()).unwrap();
        let store = crate::local::LocalStateStore::new(root.path(), VerifyPolicy::default());
        crate::plan::TransferPlanner::new().plan(
            &index,
            &store,
            &crate::catalog::CatalogFilter::all(),
        )
    }

    fn fast_config(concurrency: usize) -> EngineConfig {
        EngineConfig {
            concurrency,
            retry_pause: Duration::from_millis(1),
            ..EngineConfig::default()
        }
    }

    const BASE: &str = "https://cdn.example.com/r70";

    fn url_for(name: &str) -> String {
        format!("{BASE}/TableBundles/{name}")
    }

    #[test]
    fn test_successful_run_writes_files() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("a.zip", 5, None), entry("b.zip", 3, None)];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new()
            .with_body(&url_for("a.zip"), b"aaaaa")
            .with_body(&url_for("b.zip"), b"bbb");

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(2));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.bytes_transferred, 8);
        assert_eq!(
            fs::read(temp.path().join("TableBundles/a.zip")).unwrap(),
            b"aaaaa"
        );
    }

    #[test]
    fn test_partial_failure_isolation() {
        // One permanently-failing task must not block the rest.
        let temp = TempDir::new().unwrap();
        let entries: Vec<CatalogEntry> = (0..6)
            .map(|i| entry(&format!("t{i}.zip"), 2, None))
            .collect();
        let plan = plan_for(&temp, &entries);

        let mut fetcher = FakeFetcher::new();
        for e in &entries {
            fetcher = fetcher.with_body(&url_for(&e.name), b"xx");
        }
        let fetcher = fetcher.with_failure(
            &url_for("t3.zip"),
            FetchError::Permanent {
                url: url_for("t3.zip"),
                status: 404,
            },
        );

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(3));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 5);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].name, "t3.zip");
        assert!(report.failures[0].reason.contains("404"));
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("flaky.zip", 4, None)];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new()
            .with_body(&url_for("flaky.zip"), b"okay")
            .with_flaky(&url_for("flaky.zip"), 2);

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 1);
        assert_eq!(report.retries, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_retries_exhausted_becomes_fatal() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("dead.zip", 4, None)];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new().with_failure(
            &url_for("dead.zip"),
            FetchError::Transient {
                url: url_for("dead.zip"),
                reason: "connection reset".to_string(),
            },
        );

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 0);
        assert_eq!(report.failed, 1);
        assert_eq!(report.retries, 2); // attempts 1 and 2 re-queued, 3rd fatal
        assert!(!temp.path().join("TableBundles/dead.zip").exists());
    }

    #[test]
    fn test_high_attempt_bound_caps_backoff() {
        // max_attempts well past the shift width of u32 must exhaust
        // normally, not overflow the backoff computation.
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("stubborn.zip", 4, None)];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new().with_failure(
            &url_for("stubborn.zip"),
            FetchError::Transient {
                url: url_for("stubborn.zip"),
                reason: "connection reset".to_string(),
            },
        );

        let config = EngineConfig {
            concurrency: 1,
            max_attempts: 40,
            retry_pause: Duration::ZERO,
            ..EngineConfig::default()
        };
        let engine = TransferEngine::new(Arc::new(fetcher), config);
        assert_eq!(engine.backoff_pause(40), Duration::ZERO);

        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.failed, 1);
        assert_eq!(report.retries, 39);
    }

    #[test]
    fn test_backoff_pause_doubles_then_plateaus() {
        let engine = TransferEngine::new(
            Arc::new(FakeFetcher::new()),
            EngineConfig {
                retry_pause: Duration::from_millis(250),
                ..EngineConfig::default()
            },
        );

        assert_eq!(engine.backoff_pause(1), Duration::from_millis(250));
        assert_eq!(engine.backoff_pause(2), Duration::from_millis(500));
        assert_eq!(engine.backoff_pause(6), Duration::from_millis(8000));
        assert_eq!(engine.backoff_pause(7), Duration::from_millis(8000));
        assert_eq!(engine.backoff_pause(39), Duration::from_millis(8000));
    }

    #[test]
    fn test_concurrency_bound_is_respected() {
        let temp = TempDir::new().unwrap();
        let entries: Vec<CatalogEntry> = (0..12)
            .map(|i| entry(&format!("c{i}.zip"), 2, None))
            .collect();
        let plan = plan_for(&temp, &entries);

        let mut fetcher = FakeFetcher::new();
        for e in &entries {
            fetcher = fetcher.with_body(&url_for(&e.name), b"xx");
        }
        let fetcher = Arc::new(fetcher);

        let engine = TransferEngine::new(fetcher.clone(), fast_config(3));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 12);
        assert!(fetcher.max_observed() <= 3, "observed {}", fetcher.max_observed());
    }

    #[test]
    fn test_size_mismatch_is_integrity_failure() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("short.zip", 10, None)];
        let plan = plan_for(&temp, &entries);
        // Body shorter than the catalog size on every attempt.
        let fetcher = FakeFetcher::new().with_body(&url_for("short.zip"), b"tiny");

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.failed, 1);
        assert_eq!(report.integrity_failures, DEFAULT_MAX_ATTEMPTS as usize);
        // Atomicity: no partial file at the destination.
        assert!(!temp.path().join("TableBundles/short.zip").exists());
    }

    #[test]
    fn test_crc_mismatch_rejected() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("sum.zip", 11, Some(0x0d4a1185))];
        let plan = plan_for(&temp, &entries);
        // Right size, wrong contents.
        let fetcher = FakeFetcher::new().with_body(&url_for("sum.zip"), b"hello_world");

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 0);
        assert_eq!(report.failed, 1);
        assert!(report.failures[0].reason.contains("CRC"));
    }

    #[test]
    fn test_crc_match_accepted() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("sum.zip", 11, Some(0x0d4a1185))];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new().with_body(&url_for("sum.zip"), b"hello world");

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &CancelToken::new());

        assert_eq!(report.completed, 1);
    }

    #[test]
    fn test_cancellation_skips_remaining() {
        let temp = TempDir::new().unwrap();
        let entries: Vec<CatalogEntry> = (0..8)
            .map(|i| entry(&format!("x{i}.zip"), 2, None))
            .collect();
        let plan = plan_for(&temp, &entries);

        let mut fetcher = FakeFetcher::new();
        for e in &entries {
            fetcher = fetcher.with_body(&url_for(&e.name), b"xx");
        }

        let cancel = CancelToken::new();
        cancel.cancel();

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(2));
        let (tx, _rx) = channel();
        let report = engine.run(plan, BASE, tx, &cancel);

        assert_eq!(report.completed, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.skipped, 8);
    }

    #[test]
    fn test_events_reach_consumer() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("e.zip", 2, None)];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new().with_body(&url_for("e.zip"), b"xx");

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, rx) = channel();
        engine.run(plan, BASE, tx, &CancelToken::new());

        let events: Vec<TransferEvent> = rx.try_iter().collect();
        assert!(matches!(events.first(), Some(TransferEvent::TaskStarted { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, TransferEvent::TaskProgress { .. })));
        assert!(matches!(events.last(), Some(TransferEvent::TaskCompleted { .. })));
    }

    #[test]
    fn test_dropped_consumer_does_not_abort() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("d.zip", 2, None)];
        let plan = plan_for(&temp, &entries);
        let fetcher = FakeFetcher::new().with_body(&url_for("d.zip"), b"xx");

        let engine = TransferEngine::new(Arc::new(fetcher), fast_config(1));
        let (tx, rx) = channel();
        drop(rx);
        let report = engine.run(plan, BASE, tx, &CancelToken::new());
        assert_eq!(report.completed, 1);
    }

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://cdn.example.com/r70/", "/Android/a.bundle"),
            "https://cdn.example.com/r70/Android/a.bundle"
        );
        assert_eq!(
            join_url("https://cdn.example.com/r70", "Android/a.bundle"),
            "https://cdn.example.com/r70/Android/a.bundle"
        );
    }
}
