//! Shared driver for the `genfiles` and `genfiles-basic` binaries

use crate::clean::{CleanResult, Cleaner};
use crate::config::{Mode, RunConfig};
use crate::error::Result;
use crate::generate::{GenerateResult, Generator};
use crate::progress::{print_clean_summary, print_generate_summary, print_header, ProgressReporter};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// What a run did
#[derive(Debug)]
pub enum RunOutcome {
    Generated(GenerateResult),
    Cleaned(CleanResult),
    /// Unknown action; nothing was touched
    Ignored(String),
}

/// Install the tracing subscriber on stderr so stdout keeps the progress line
pub fn setup_logging(
    verbose: bool,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = if verbose {
        EnvFilter::new("testdir=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("testdir=info,warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
}

/// Run the configured action, printing status lines as it goes
pub fn execute(config: &RunConfig) -> Result<RunOutcome> {
    match &config.mode {
        Mode::Generate => generate(config).map(RunOutcome::Generated),
        Mode::Clean => clean(config).map(RunOutcome::Cleaned),
        Mode::Ignore(action) => {
            debug!(action = %action, "Unknown action, nothing to do");
            Ok(RunOutcome::Ignored(action.clone()))
        }
    }
}

fn generate(config: &RunConfig) -> Result<GenerateResult> {
    let generator = Generator::new(config);

    let progress = if config.show_progress {
        print_header("generate", &config.target_dir, generator.worker_count());
        println!(
            "{} threads will be used to create the files",
            generator.worker_count()
        );
        ProgressReporter::new(generator.total_files())
    } else {
        ProgressReporter::hidden()
    };

    let result = generator.run(&progress)?;
    print_generate_summary(&result);
    Ok(result)
}

fn clean(config: &RunConfig) -> Result<CleanResult> {
    let cleaner = Cleaner::new(config);
    let result = cleaner.run()?;
    if result.entries == 0 {
        info!(dir = %config.target_dir.display(), "Nothing to clean");
    }
    print_clean_summary(&result);
    Ok(result)
}
