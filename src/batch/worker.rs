//! Worker threads for a single batch
//!
//! Each worker:
//! - Runs on its own named OS thread
//! - Owns a disjoint partition of the batch, so nothing is shared but counters
//! - Records per-unit results in its `WorkerStats`
//! - Never reports unit failures upward; they are logged and counted

use crate::error::WorkerError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Units completed (files created or entries removed)
    pub processed: AtomicU64,

    /// Units left alone on purpose
    pub skipped: AtomicU64,

    /// Units that hit an I/O error
    pub failed: AtomicU64,
}

impl WorkerStats {
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Aggregated result of one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub workers: usize,
    pub processed: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Workers that panicked instead of finishing
    pub panicked: usize,
}

impl BatchStats {
    pub fn merge(&mut self, other: BatchStats) {
        self.workers = self.workers.max(other.workers);
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.panicked += other.panicked;
    }
}

/// A worker thread running one partition
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread named `<label>-<id>`
    pub fn spawn<F>(id: usize, label: &str, task: F) -> Result<Self, WorkerError>
    where
        F: FnOnce(&WorkerStats) + Send + 'static,
    {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("{}-{}", label, id))
            .spawn(move || {
                debug!(worker = id, "Worker starting");
                task(&*stats_clone);
                debug!(
                    worker = id,
                    processed = stats_clone.processed.load(Ordering::Relaxed),
                    "Worker finished"
                );
            })
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Wait for the worker to finish; later calls return immediately
    pub fn join(&mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|payload| WorkerError::Panicked {
                id: self.id,
                message: panic_message(payload.as_ref()),
            })
        } else {
            Ok(())
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".into()
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(workers: &[Worker]) -> BatchStats {
    let mut stats = BatchStats {
        workers: workers.len(),
        ..Default::default()
    };

    for worker in workers {
        stats.processed += worker.stats.processed.load(Ordering::Relaxed);
        stats.skipped += worker.stats.skipped.load(Ordering::Relaxed);
        stats.failed += worker.stats.failed.load(Ordering::Relaxed);
    }

    stats
}

/// Join every worker, logging the ones that did not finish cleanly
///
/// Returns how many workers panicked. Counters are final once this returns.
pub fn join_workers(workers: &mut [Worker]) -> usize {
    let mut panicked = 0;
    for worker in workers.iter_mut() {
        if let Err(e) = worker.join() {
            warn!(error = %e, "Worker failed to join cleanly");
            panicked += 1;
        }
    }
    panicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats() {
        let stats = WorkerStats::default();

        stats.record_processed();
        stats.record_processed();
        stats.record_skip();
        stats.record_failure();

        assert_eq!(stats.processed.load(Ordering::Relaxed), 2);
        assert_eq!(stats.skipped.load(Ordering::Relaxed), 1);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_worker_runs_task() {
        let worker = Worker::spawn(0, "test", |stats| {
            for _ in 0..5 {
                stats.record_processed();
            }
        })
        .unwrap();

        assert_eq!(worker.id(), 0);
        let mut workers = vec![worker];
        assert_eq!(join_workers(&mut workers), 0);
        assert_eq!(aggregate_stats(&workers).processed, 5);
        assert_eq!(workers[0].stats().processed.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let mut worker = Worker::spawn(7, "test", |_| panic!("disk on fire")).unwrap();
        match worker.join() {
            Err(WorkerError::Panicked { id, message }) => {
                assert_eq!(id, 7);
                assert_eq!(message, "disk on fire");
            }
            other => panic!("expected panic error, got {:?}", other),
        }
        // handle already taken
        assert!(worker.join().is_ok());
    }

    #[test]
    fn test_batch_stats_merge() {
        let mut total = BatchStats::default();
        total.merge(BatchStats {
            workers: 4,
            processed: 10,
            skipped: 1,
            failed: 2,
            panicked: 0,
        });
        total.merge(BatchStats {
            workers: 2,
            processed: 5,
            skipped: 0,
            failed: 0,
            panicked: 1,
        });
        assert_eq!(total.workers, 4);
        assert_eq!(total.processed, 15);
        assert_eq!(total.skipped, 1);
        assert_eq!(total.failed, 2);
        assert_eq!(total.panicked, 1);
    }
}
