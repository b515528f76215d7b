//! Test file generation
//!
//! One batch per extension, strictly in order. Inside a batch the index
//! range `[0, count)` is split across workers and each worker creates
//! `File_<index + 1>.<ext>` for its share. Creating a file truncates any
//! existing file of the same name, so reruns leave every file at zero bytes.

use crate::batch::{effective_workers, run_batch, BatchStats, PartitionPlan, WorkerStats};
use crate::config::{FileTypes, RunConfig};
use crate::error::{Result, TestDirError};
use crate::progress::ProgressReporter;
use std::fs::{self, File};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed generate run
#[derive(Debug)]
pub struct GenerateResult {
    /// Files created or truncated
    pub files_created: u64,

    /// Files that could not be created
    pub failures: u64,

    /// Batches run (one per extension)
    pub batches: usize,

    /// Workers used per batch
    pub workers: usize,

    /// Wall time for all batches
    pub duration: Duration,
}

/// Name of the generated file for a zero-based index
///
/// The empty extension still gets the dot: `File_3.`
pub fn file_name(index: usize, ext: &str) -> String {
    format!("File_{}.{}", index + 1, ext)
}

/// Create the directory if it does not exist yet
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        debug!(dir = %path.display(), "Target directory already exists");
        return Ok(());
    }
    if path.exists() {
        return Err(TestDirError::NotADirectory(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(|source| TestDirError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    info!(dir = %path.display(), "Created target directory");
    Ok(())
}

/// Create one empty file per index in `range`
pub fn create_files(dir: &Path, ext: &str, range: Range<usize>, stats: &WorkerStats) {
    for index in range {
        let path = dir.join(file_name(index, ext));
        match File::create(&path) {
            Ok(_) => stats.record_processed(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to create file");
                stats.record_failure();
            }
        }
    }
}

/// Drives generation across all extensions
pub struct Generator {
    dir: Arc<PathBuf>,
    file_count: usize,
    file_types: FileTypes,
    worker_count: usize,
}

impl Generator {
    /// Create a generator; the worker count is settled once from the total
    /// workload so every batch uses the same pool size
    pub fn new(config: &RunConfig) -> Self {
        let worker_count = effective_workers(
            config.total_files(),
            config.worker_count,
            config.parallel_threshold,
        );

        Self {
            dir: Arc::new(config.target_dir.clone()),
            file_count: config.file_count,
            file_types: config.file_types.clone(),
            worker_count,
        }
    }

    /// Workers each batch will use
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Total files across all batches
    pub fn total_files(&self) -> usize {
        self.file_count * self.file_types.len()
    }

    /// Run every batch in order, ticking `progress` after each one
    pub fn run(&self, progress: &ProgressReporter) -> Result<GenerateResult> {
        ensure_dir(&self.dir)?;

        let start = Instant::now();
        info!(
            dir = %self.dir.display(),
            types = self.file_types.len(),
            per_type = self.file_count,
            workers = self.worker_count,
            "Starting generation"
        );

        let mut totals = BatchStats::default();
        for (batch, ext) in self.file_types.iter().enumerate() {
            let stats = self.run_batch(ext)?;
            debug!(
                ext = %ext,
                created = stats.processed,
                failed = stats.failed,
                "Batch finished"
            );
            totals.merge(stats);

            progress.tick((batch + 1) * self.file_count, start.elapsed());
        }
        progress.finish();

        let duration = start.elapsed();
        info!(
            files = totals.processed,
            failures = totals.failed,
            duration_ms = duration.as_millis() as u64,
            "Generation completed"
        );

        Ok(GenerateResult {
            files_created: totals.processed,
            failures: totals.failed,
            batches: self.file_types.len(),
            workers: self.worker_count,
            duration,
        })
    }

    fn run_batch(&self, ext: &str) -> Result<BatchStats> {
        let plan = PartitionPlan::new(self.file_count, self.worker_count);

        let jobs: Vec<_> = plan
            .iter()
            .map(|partition| {
                let dir = Arc::clone(&self.dir);
                let ext = ext.to_string();
                let range = partition.range();
                move |stats: &WorkerStats| create_files(&dir, &ext, range, stats)
            })
            .collect();

        Ok(run_batch("gen", jobs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use tempfile::tempdir;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(0, "abc"), "File_1.abc");
        assert_eq!(file_name(49, ""), "File_50.");
        assert_eq!(file_name(9, "😀😀"), "File_10.😀😀");
    }

    #[test]
    fn test_create_files_range() {
        let dir = tempdir().unwrap();
        let stats = WorkerStats::default();

        create_files(dir.path(), "txt", 10..15, &stats);

        assert_eq!(stats.processed.load(Ordering::Relaxed), 5);
        for n in 11..=15 {
            let path = dir.path().join(format!("File_{}.txt", n));
            assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        }
        assert!(!dir.path().join("File_10.txt").exists());
        assert!(!dir.path().join("File_16.txt").exists());
    }

    #[test]
    fn test_create_files_missing_dir_counts_failures() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let stats = WorkerStats::default();

        create_files(&missing, "abc", 0..3, &stats);

        assert_eq!(stats.processed.load(Ordering::Relaxed), 0);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_ensure_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_dir(&nested).unwrap();

        let file = dir.path().join("plain");
        File::create(&file).unwrap();
        assert!(matches!(
            ensure_dir(&file),
            Err(TestDirError::NotADirectory(_))
        ));
    }
}
