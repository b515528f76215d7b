//! Directory cleanup
//!
//! Lists the immediate children of the target directory, splits the list
//! across workers and removes every entry: files and symlinks directly,
//! directories with everything below them. Anything else (fifos, sockets,
//! device nodes) is reported and left in place.

use crate::batch::{effective_workers, run_batch, PartitionPlan, WorkerStats};
use crate::config::RunConfig;
use crate::error::{EntryOutcome, Result, TestDirError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed clean run
#[derive(Debug)]
pub struct CleanResult {
    /// Entries found in the directory
    pub entries: usize,

    /// Entries removed
    pub removed: u64,

    /// Entries that were neither file, link nor directory
    pub skipped: u64,

    /// Entries whose removal failed
    pub failures: u64,

    /// Workers used for the batch
    pub workers: usize,

    /// Wall time for the batch
    pub duration: Duration,
}

/// What a directory entry is, without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Symlink,
    Directory,
    Other,
}

/// Classify `path` from its own metadata
///
/// Fails when the entry vanished or cannot be inspected.
pub fn classify(path: &Path) -> std::io::Result<EntryKind> {
    let file_type = fs::symlink_metadata(path)?.file_type();
    Ok(if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    })
}

/// Immediate children of `dir`, sorted; a missing directory has none
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Target directory does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(TestDirError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut entries = read_dir
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|source| TestDirError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
    entries.sort();
    Ok(entries)
}

/// Remove a single entry
pub fn remove_entry(path: &Path) -> EntryOutcome {
    let kind = match classify(path) {
        Ok(kind) => kind,
        Err(error) => {
            return EntryOutcome::Failed {
                path: path.to_path_buf(),
                error,
            }
        }
    };

    let result = match kind {
        EntryKind::File | EntryKind::Symlink => fs::remove_file(path),
        EntryKind::Directory => fs::remove_dir_all(path),
        EntryKind::Other => {
            return EntryOutcome::Skipped {
                path: path.to_path_buf(),
                reason: "Object was not a file or directory".into(),
            }
        }
    };

    match result {
        Ok(()) => EntryOutcome::Removed {
            path: path.to_path_buf(),
        },
        Err(error) => EntryOutcome::Failed {
            path: path.to_path_buf(),
            error,
        },
    }
}

/// Remove every path in `paths`, recording each outcome in `stats`
pub fn remove_entries(paths: &[PathBuf], stats: &WorkerStats) {
    for path in paths {
        match remove_entry(path) {
            EntryOutcome::Removed { .. } => stats.record_processed(),
            EntryOutcome::Skipped { path, reason } => {
                println!("{}", reason);
                println!("{} ---", path.display());
                warn!(path = %path.display(), "{}", reason);
                stats.record_skip();
            }
            EntryOutcome::Failed { path, error } => {
                warn!(path = %path.display(), error = %error, "Failed to remove entry");
                stats.record_failure();
            }
        }
    }
}

/// Removes everything inside the target directory
pub struct Cleaner {
    dir: PathBuf,
    worker_count: usize,
    parallel_threshold: usize,
}

impl Cleaner {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            dir: config.target_dir.clone(),
            worker_count: config.worker_count,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Run one deletion batch over the current directory listing
    pub fn run(&self) -> Result<CleanResult> {
        let start = Instant::now();
        let entries = Arc::new(list_entries(&self.dir)?);
        let workers = effective_workers(entries.len(), self.worker_count, self.parallel_threshold);

        info!(
            dir = %self.dir.display(),
            entries = entries.len(),
            workers = workers,
            "Starting cleanup"
        );

        let plan = PartitionPlan::new(entries.len(), workers);
        let jobs: Vec<_> = plan
            .iter()
            .map(|partition| {
                let entries = Arc::clone(&entries);
                let range = partition.range();
                move |stats: &WorkerStats| remove_entries(&entries[range], stats)
            })
            .collect();

        let stats = run_batch("clean", jobs)?;
        let duration = start.elapsed();

        info!(
            removed = stats.processed,
            skipped = stats.skipped,
            failures = stats.failed,
            duration_ms = duration.as_millis() as u64,
            "Cleanup completed"
        );

        Ok(CleanResult {
            entries: entries.len(),
            removed: stats.processed,
            skipped: stats.skipped,
            failures: stats.failed,
            workers,
            duration,
        })
    }
}
