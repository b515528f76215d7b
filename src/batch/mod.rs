//! Fan-out/fan-in batch execution
//!
//! A batch is a fixed workload cut into disjoint partitions, one per
//! worker thread. All workers start together and the caller blocks until
//! every one has been joined.
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │    PartitionPlan     │
//!                 │ [0,n) [n,2n) .. [k,T)│
//!                 └──────────┬───────────┘
//!                            │ spawn
//!       ┌────────────────────┼────────────────────┐
//!       │                    │                    │
//! ┌─────▼─────┐        ┌─────▼─────┐        ┌─────▼─────┐
//! │ Worker 0  │        │ Worker 1  │  ...   │ Worker W-1│
//! └─────┬─────┘        └─────┬─────┘        └─────┬─────┘
//!       └────────────────────┼────────────────────┘
//!                            │ join
//!                      ┌─────▼─────┐
//!                      │ BatchStats│
//!                      └───────────┘
//! ```

pub mod partition;
pub mod worker;

pub use partition::{effective_workers, Partition, PartitionPlan};
pub use worker::{aggregate_stats, join_workers, BatchStats, Worker, WorkerStats};

use crate::error::WorkerError;
use tracing::{debug, warn};

/// Run one job per worker and wait for all of them
///
/// Failures inside a job are the job's business: they only show up in the
/// returned counters. The only error is a thread that could not be started,
/// and even then the workers already running are joined first.
pub fn run_batch<F>(label: &str, jobs: Vec<F>) -> Result<BatchStats, WorkerError>
where
    F: FnOnce(&WorkerStats) + Send + 'static,
{
    let mut workers = Vec::with_capacity(jobs.len());
    let mut spawn_error = None;

    for (id, job) in jobs.into_iter().enumerate() {
        match Worker::spawn(id, label, job) {
            Ok(worker) => workers.push(worker),
            Err(e) => {
                warn!(error = %e, "Stopping batch spawn");
                spawn_error = Some(e);
                break;
            }
        }
    }

    debug!(batch = label, count = workers.len(), "Workers spawned");

    let panicked = join_workers(&mut workers);
    if let Some(e) = spawn_error {
        return Err(e);
    }

    let mut stats = aggregate_stats(&workers);
    stats.panicked = panicked;
    Ok(stats)
}
