//! genfiles-basic - serial test file generator
//!
//! Smaller workload, one worker, no progress bar, and the empty extension
//! in its type list.

use anyhow::{anyhow, Context, Result};
use std::process::ExitCode;
use testdir::config::{CliArgs, Profile, RunConfig};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse_lenient();
    testdir::setup_logging(args.verbose).map_err(|e| anyhow!(e))?;

    let config = RunConfig::from_args(args, Profile::Basic).context("Invalid configuration")?;
    testdir::execute(&config).context("Run failed")?;
    Ok(())
}
