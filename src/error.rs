//! Error types for testdir
//!
//! This module defines the error hierarchy for:
//! - Configuration and CLI errors
//! - Worker thread errors
//! - Target directory I/O
//!
//! Per-file failures inside a worker never become one of these errors.
//! Workers log and count them, and the batch keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the testdir utilities
#[derive(Error, Debug)]
pub enum TestDirError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Target directory could not be prepared
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target directory could not be listed
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target path exists but is not a directory
    #[error("'{0}' exists and is not a directory")]
    NotADirectory(PathBuf),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid per-type file count
    #[error("Invalid file count {count}: must be between 1 and {max}")]
    InvalidFileCount { count: usize, max: usize },

    /// Extension that cannot be part of a file name
    #[error("Invalid extension '{ext}': {reason}")]
    InvalidExtension { ext: String, reason: String },

    /// Current directory could not be determined
    #[error("Cannot determine current directory: {0}")]
    CurrentDir(String),
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Thread could not be started
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Result type alias for TestDirError
pub type Result<T> = std::result::Result<T, TestDirError>;

/// Outcome of removing a single directory entry
#[derive(Debug)]
pub enum EntryOutcome {
    /// Entry was removed
    Removed { path: PathBuf },

    /// Entry was left alone (not a file, link or directory)
    Skipped { path: PathBuf, reason: String },

    /// Removal was attempted and failed
    Failed {
        path: PathBuf,
        error: std::io::Error,
    },
}
