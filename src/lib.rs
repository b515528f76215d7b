//! testdir - Synthetic test directory generator
//!
//! Fills a scratch directory with zero-byte files of many extensions
//! (including multi-byte Unicode and the empty extension) and clears it
//! again, for exercising file-system-facing test suites.
//!
//! # Features
//!
//! - **Partitioned Batches**: each extension is one batch of `count` files,
//!   cut into disjoint index ranges, one per worker thread.
//!
//! - **Barrier Join**: every worker of a batch is joined before the next
//!   batch starts; batches run strictly in order.
//!
//! - **Best-Effort Errors**: per-file failures are logged and counted,
//!   never raised.
//!
//! # Architecture
//!
//! ```text
//!   CLI (clap) ──► RunConfig ──► Mode
//!                                 │
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!      ┌───────────┐        ┌───────────┐          (ignored)
//!      │ Generator │        │  Cleaner  │
//!      │ 1 batch / │        │ 1 batch / │
//!      │ extension │        │  listing  │
//!      └─────┬─────┘        └─────┬─────┘
//!            └─────────┬──────────┘
//!                      ▼
//!            ┌───────────────────┐
//!            │ batch::run_batch  │
//!            │ PartitionPlan ──► │
//!            │ Worker × W, join  │
//!            └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # Generate ./test_dir with 7 × 1000 files
//! genfiles
//!
//! # Remove everything inside it
//! genfiles clean
//!
//! # Serial variant with the empty extension
//! genfiles-basic
//! ```

pub mod app;
pub mod batch;
pub mod clean;
pub mod config;
pub mod error;
pub mod generate;
pub mod progress;

pub use app::{execute, setup_logging, RunOutcome};
pub use clean::{CleanResult, Cleaner};
pub use config::{CliArgs, FileTypes, Mode, Profile, RunConfig};
pub use error::{Result, TestDirError};
pub use generate::{GenerateResult, Generator};
