//! Configuration types for testdir
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Per-binary defaults (`Profile`)
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Directory created under the current working directory by default
pub const DEFAULT_DIR_NAME: &str = "test_dir";

/// Batches smaller than this run on a single worker
pub const MIN_UNITS_FOR_PARALLEL: usize = 1000;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Upper bound on files per extension
pub const MAX_FILE_COUNT: usize = 10_000_000;

/// Extensions generated by `genfiles`
pub const DEFAULT_FILE_TYPES: &[&str] = &["abc", "def", "ghi", "txt", "😀😀", "123", "md"];

/// Extensions generated by `genfiles-basic`, ending with the empty extension
pub const BASIC_FILE_TYPES: &[&str] = &["abc", "def", "ghi", "txt", "😀😀", "123", ""];

/// Generate or clean a directory of synthetic test files
#[derive(Parser, Debug, Clone, Default)]
#[command(
    version,
    about = "Generate or clean a directory of synthetic test files",
    long_about = "Fills a scratch directory with zero-byte files named File_<n>.<ext> for a \
                  fixed list of extensions, including multi-byte and empty extensions.\n\n\
                  Run without an action to generate, or with 'clean' to remove every entry \
                  in the directory. Any other action does nothing.",
    after_help = "EXAMPLES:\n    \
        genfiles\n    \
        genfiles clean\n    \
        genfiles -d /tmp/scratch -c 200 -e abc -e '😀😀' -e ''\n    \
        genfiles-basic -q"
)]
pub struct CliArgs {
    /// Action to run: omit to generate, 'clean' to remove everything
    #[arg(value_name = "ACTION")]
    pub action: Option<String>,

    /// Target directory (default: ./test_dir)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Files to create per extension
    #[arg(short = 'c', long, value_name = "NUM")]
    pub count: Option<usize>,

    /// Number of worker threads (default: logical cores)
    #[arg(short = 'w', long, value_name = "NUM")]
    pub workers: Option<usize>,

    /// Extension to generate (can be repeated, replaces the built-in list)
    #[arg(short = 'e', long = "ext", value_name = "EXT", action = clap::ArgAction::Append)]
    pub exts: Vec<String>,

    /// Quiet mode - suppress header and progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Extra positional arguments after the action, ignored
    #[arg(hide = true, value_name = "IGNORED")]
    pub rest: Vec<String>,
}

impl CliArgs {
    /// Parse `std::env::args_os`, exiting on help, version or bad values
    pub fn parse_lenient() -> Self {
        Self::try_parse_lenient_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse like `try_parse_from`, but drop unknown flags instead of failing
    ///
    /// When no action was given, the first dropped flag becomes the action,
    /// so `genfiles -x` resolves to `Mode::Ignore` and touches nothing.
    pub fn try_parse_lenient_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv: Vec<OsString> = itr.into_iter().map(Into::into).collect();
        let mut dropped: Vec<String> = Vec::new();

        loop {
            let err = match Self::try_parse_from(argv.clone()) {
                Ok(mut args) => {
                    if args.action.is_none() {
                        args.action = dropped.into_iter().next();
                    }
                    return Ok(args);
                }
                Err(e) if e.kind() == ErrorKind::UnknownArgument => e,
                Err(e) => return Err(e),
            };

            let token = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(token)) => token.clone(),
                _ => return Err(err),
            };

            match argv.iter().skip(1).position(|arg| arg == token.as_str()) {
                Some(pos) => {
                    argv.remove(pos + 1);
                    dropped.push(token);
                }
                // bundled shorts such as `-qx`: treat the first argument as the action
                None => {
                    return Ok(Self {
                        action: argv.get(1).map(|a| a.to_string_lossy().into_owned()),
                        ..Default::default()
                    });
                }
            }
        }
    }
}

/// Which utility is running; supplies the defaults that differ between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Parallel generator with a progress bar
    Full,
    /// Serial generator with a smaller workload and the empty extension
    Basic,
}

impl Profile {
    pub fn default_count(self) -> usize {
        match self {
            Profile::Full => 1_000,
            Profile::Basic => 50,
        }
    }

    pub fn default_types(self) -> &'static [&'static str] {
        match self {
            Profile::Full => DEFAULT_FILE_TYPES,
            Profile::Basic => BASIC_FILE_TYPES,
        }
    }

    pub fn default_workers(self) -> usize {
        match self {
            Profile::Full => num_cpus::get().min(MAX_WORKERS),
            Profile::Basic => 1,
        }
    }

    /// Only the full generator draws a progress bar
    pub fn shows_progress(self) -> bool {
        matches!(self, Profile::Full)
    }
}

/// What the invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// No action given
    Generate,
    /// `clean`
    Clean,
    /// Anything else; the run does nothing
    Ignore(String),
}

impl Mode {
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            None => Mode::Generate,
            Some("clean") => Mode::Clean,
            Some(other) => Mode::Ignore(other.to_string()),
        }
    }
}

/// Ordered, immutable list of extensions to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypes(Vec<String>);

impl FileTypes {
    /// Validate and collect extensions, keeping their order
    pub fn new<I, S>(exts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exts = exts
            .into_iter()
            .map(|ext| {
                let ext: String = ext.into();
                validate_extension(&ext).map(|_| ext)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(exts))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.contains('/') || ext.contains(std::path::MAIN_SEPARATOR) {
        return Err(ConfigError::InvalidExtension {
            ext: ext.to_string(),
            reason: "contains a path separator".into(),
        });
    }
    if ext.contains('\0') {
        return Err(ConfigError::InvalidExtension {
            ext: ext.escape_default().to_string(),
            reason: "contains a NUL byte".into(),
        });
    }
    Ok(())
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Requested action
    pub mode: Mode,

    /// Directory to populate or clean
    pub target_dir: PathBuf,

    /// Files created per extension
    pub file_count: usize,

    /// Extensions, one batch each
    pub file_types: FileTypes,

    /// Worker threads per batch before small-batch reduction
    pub worker_count: usize,

    /// Workloads below this size use one worker
    pub parallel_threshold: usize,

    /// Draw the progress bar and header
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs, profile: Profile) -> Result<Self, ConfigError> {
        let mode = Mode::from_action(args.action.as_deref());

        let target_dir = match args.dir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| ConfigError::CurrentDir(e.to_string()))?
                .join(DEFAULT_DIR_NAME),
        };

        let worker_count = args.workers.unwrap_or_else(|| profile.default_workers());
        if worker_count == 0 || worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: worker_count,
                max: MAX_WORKERS,
            });
        }

        let file_count = args.count.unwrap_or_else(|| profile.default_count());
        if file_count == 0 || file_count > MAX_FILE_COUNT {
            return Err(ConfigError::InvalidFileCount {
                count: file_count,
                max: MAX_FILE_COUNT,
            });
        }

        let file_types = if args.exts.is_empty() {
            FileTypes::new(profile.default_types().iter().copied())?
        } else {
            FileTypes::new(args.exts)?
        };

        Ok(Self {
            mode,
            target_dir,
            file_count,
            file_types,
            worker_count,
            parallel_threshold: MIN_UNITS_FOR_PARALLEL,
            show_progress: profile.shows_progress() && !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Total files a generate run creates
    pub fn total_files(&self) -> usize {
        self.file_count * self.file_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_in(dir: &str) -> CliArgs {
        CliArgs {
            dir: Some(PathBuf::from(dir)),
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_from_action() {
        assert_eq!(Mode::from_action(None), Mode::Generate);
        assert_eq!(Mode::from_action(Some("clean")), Mode::Clean);
        assert_eq!(Mode::from_action(Some("foo")), Mode::Ignore("foo".into()));
        assert_eq!(Mode::from_action(Some("CLEAN")), Mode::Ignore("CLEAN".into()));
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from(["genfiles"]).unwrap();
        assert_eq!(args.action, None);

        let args = CliArgs::try_parse_from(["genfiles", "clean", "-w", "3"]).unwrap();
        assert_eq!(args.action.as_deref(), Some("clean"));
        assert_eq!(args.workers, Some(3));

        let args = CliArgs::try_parse_from(["genfiles", "-e", "abc", "-e", "", "-c", "5"]).unwrap();
        assert_eq!(args.exts, vec!["abc".to_string(), String::new()]);
        assert_eq!(args.count, Some(5));

        // extra positionals after the action are ignored
        let args = CliArgs::try_parse_from(["genfiles", "clean", "extra", "more"]).unwrap();
        assert_eq!(Mode::from_action(args.action.as_deref()), Mode::Clean);
        assert_eq!(args.rest, vec!["extra".to_string(), "more".to_string()]);

        let args = CliArgs::try_parse_from(["genfiles", "foo", "bar"]).unwrap();
        assert_eq!(
            Mode::from_action(args.action.as_deref()),
            Mode::Ignore("foo".into())
        );
    }

    #[test]
    fn test_cli_unknown_flags_are_dropped() {
        let args = CliArgs::try_parse_lenient_from(["genfiles", "-x"]).unwrap();
        assert_eq!(
            Mode::from_action(args.action.as_deref()),
            Mode::Ignore("-x".into())
        );

        let args = CliArgs::try_parse_lenient_from(["genfiles", "--bogus"]).unwrap();
        assert_eq!(
            Mode::from_action(args.action.as_deref()),
            Mode::Ignore("--bogus".into())
        );

        let args =
            CliArgs::try_parse_lenient_from(["genfiles", "clean", "--bogus", "-w", "2"]).unwrap();
        assert_eq!(Mode::from_action(args.action.as_deref()), Mode::Clean);
        assert_eq!(args.workers, Some(2));

        let args = CliArgs::try_parse_lenient_from(["genfiles", "clean", "extra"]).unwrap();
        assert_eq!(Mode::from_action(args.action.as_deref()), Mode::Clean);

        let args = CliArgs::try_parse_lenient_from(["genfiles"]).unwrap();
        assert_eq!(Mode::from_action(args.action.as_deref()), Mode::Generate);

        // malformed values for known options still fail
        assert!(CliArgs::try_parse_lenient_from(["genfiles", "-w", "many"]).is_err());
    }

    #[test]
    fn test_profile_defaults() {
        let full = RunConfig::from_args(args_in("/tmp/x"), Profile::Full).unwrap();
        assert_eq!(full.file_count, 1_000);
        assert_eq!(full.file_types.len(), 7);
        assert_eq!(full.file_types.iter().last(), Some("md"));
        assert_eq!(full.total_files(), 7_000);
        assert!(full.show_progress);
        assert!(full.worker_count >= 1);

        let basic = RunConfig::from_args(args_in("/tmp/x"), Profile::Basic).unwrap();
        assert_eq!(basic.file_count, 50);
        assert_eq!(basic.worker_count, 1);
        assert_eq!(basic.file_types.iter().last(), Some(""));
        assert!(!basic.show_progress);
    }

    #[test]
    fn test_default_dir_is_under_cwd() {
        let config = RunConfig::from_args(CliArgs::default(), Profile::Full).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.target_dir, cwd.join(DEFAULT_DIR_NAME));
        assert_eq!(config.mode, Mode::Generate);
    }

    #[test]
    fn test_invalid_worker_count() {
        let mut args = args_in("/tmp/x");
        args.workers = Some(0);
        assert!(matches!(
            RunConfig::from_args(args, Profile::Full),
            Err(ConfigError::InvalidWorkerCount { count: 0, .. })
        ));

        let mut args = args_in("/tmp/x");
        args.workers = Some(MAX_WORKERS + 1);
        assert!(RunConfig::from_args(args, Profile::Full).is_err());
    }

    #[test]
    fn test_invalid_count() {
        let mut args = args_in("/tmp/x");
        args.count = Some(0);
        assert!(matches!(
            RunConfig::from_args(args, Profile::Basic),
            Err(ConfigError::InvalidFileCount { .. })
        ));
    }

    #[test]
    fn test_extension_validation() {
        assert!(FileTypes::new(["abc", "😀😀", ""]).is_ok());
        assert!(FileTypes::new(["a/b"]).is_err());
        assert!(FileTypes::new(["a\0b"]).is_err());

        let mut args = args_in("/tmp/x");
        args.exts = vec!["../escape".into()];
        assert!(matches!(
            RunConfig::from_args(args, Profile::Full),
            Err(ConfigError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_quiet_hides_progress() {
        let mut args = args_in("/tmp/x");
        args.quiet = true;
        let config = RunConfig::from_args(args, Profile::Full).unwrap();
        assert!(!config.show_progress);
    }
}
