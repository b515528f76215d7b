//! genfiles - parallel test file generator
//!
//! Entry point for the CLI application.

use anyhow::{anyhow, Context, Result};
use std::process::ExitCode;
use testdir::config::{CliArgs, Profile, RunConfig};
use tracing::error;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_lenient();

    // Setup logging
    testdir::setup_logging(args.verbose).map_err(|e| anyhow!(e))?;

    // Validate and create config
    let config = RunConfig::from_args(args, Profile::Full).context("Invalid configuration")?;

    testdir::execute(&config).context("Run failed")?;
    Ok(())
}
