//! Progress reporting for generation runs
//!
//! After each extension batch the reporter redraws a single line:
//!
//! ```text
//! Progress:    0.42s [##########################----------] 71%
//! ```
//!
//! On an interactive terminal the line is drawn through indicatif and
//! overwritten in place. Without a terminal each tick prints its own line.

use crate::clean::CleanResult;
use crate::generate::GenerateResult;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Columns reserved for the label, elapsed time and percentage
pub const BAR_MARGIN: usize = 28;

/// Narrowest bar drawn on tiny terminals
pub const MIN_BAR_WIDTH: usize = 10;

/// Width assumed when stdout is not a terminal
pub const FALLBACK_TERM_WIDTH: usize = 80;

/// Split of the bar into done and pending cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub filled: usize,
    pub pending: usize,
    pub percent: usize,
}

/// Proportion `width` cells between done and pending work
pub fn bar_layout(done: usize, total: usize, width: usize) -> BarLayout {
    if total == 0 || width == 0 {
        let percent = if total == 0 { 100 } else { 0 };
        let filled = if total == 0 { width } else { 0 };
        return BarLayout {
            filled,
            pending: width - filled,
            percent,
        };
    }

    let done = done.min(total);
    let filled = (done as u128 * width as u128 / total as u128) as usize;
    BarLayout {
        filled,
        pending: width - filled,
        percent: filled * 100 / width,
    }
}

/// Bar width for a terminal `term_cols` wide
pub fn bar_width(term_cols: usize) -> usize {
    term_cols.saturating_sub(BAR_MARGIN).max(MIN_BAR_WIDTH)
}

/// Elapsed seconds rounded to two places, printed like `2.0s`, `1.5s` or `1.23s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = (elapsed.as_secs_f64() * 100.0).round() / 100.0;
    if secs.fract() == 0.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}s", secs)
    }
}

/// Full progress line without any terminal control characters
pub fn render_line(elapsed: Duration, layout: BarLayout) -> String {
    format!(
        "Progress: {:>8} [{}{}] {}%",
        format_elapsed(elapsed),
        "#".repeat(layout.filled),
        "-".repeat(layout.pending),
        layout.percent
    )
}

enum Display {
    /// Overwriting line on a terminal
    Bar(ProgressBar),
    /// One line per tick
    Plain,
    /// Nothing at all
    Hidden,
}

/// Progress reporter for a fixed amount of work
pub struct ProgressReporter {
    display: Display,
    total: usize,
    width: usize,
}

impl ProgressReporter {
    /// Create a reporter for `total` units, picking the display from stdout
    pub fn new(total: usize) -> Self {
        let term = Term::stdout();
        let cols = term.is_term().then(|| {
            term.size_checked()
                .map(|(_rows, cols)| cols as usize)
                .unwrap_or(FALLBACK_TERM_WIDTH)
        });
        Self::for_terminal(total, cols)
    }

    /// Bar for a terminal `cols` wide, or plain lines when there is none
    fn for_terminal(total: usize, cols: Option<usize>) -> Self {
        let Some(cols) = cols else {
            return Self::plain(total, bar_width(FALLBACK_TERM_WIDTH));
        };

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stdout());
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}")
                .expect("Invalid progress template"),
        );

        Self {
            display: Display::Bar(bar),
            total,
            width: bar_width(cols),
        }
    }

    /// Reporter that prints a plain line per tick
    pub fn plain(total: usize, width: usize) -> Self {
        Self {
            display: Display::Plain,
            total,
            width,
        }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            display: Display::Hidden,
            total: 0,
            width: 0,
        }
    }

    /// The line a tick at `done` units would draw
    pub fn line(&self, done: usize, elapsed: Duration) -> String {
        render_line(elapsed, bar_layout(done, self.total, self.width))
    }

    /// Redraw after `done` of `total` units have completed
    pub fn tick(&self, done: usize, elapsed: Duration) {
        match &self.display {
            Display::Bar(bar) => {
                bar.set_position(done as u64);
                bar.set_message(self.line(done, elapsed));
            }
            Display::Plain => println!("{}", self.line(done, elapsed)),
            Display::Hidden => {}
        }
    }

    /// Leave the last line on screen
    pub fn finish(&self) {
        if let Display::Bar(bar) = &self.display {
            bar.finish();
        }
    }
}

/// Print a header at the start of a run
pub fn print_header(action: &str, dir: &Path, workers: usize) {
    println!();
    println!(
        "{} {}",
        style("testdir").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Action:").bold(), action);
    println!("  {} {}", style("Directory:").bold(), dir.display());
    println!("  {} {}", style("Workers:").bold(), workers);
    println!();
}

/// Print the result of a generate run
pub fn print_generate_summary(result: &GenerateResult) {
    println!();
    println!("{} files have been generated.", result.files_created);
    if result.failures > 0 {
        println!(
            "  {} {}",
            style("Failed:").yellow().bold(),
            result.failures
        );
    }
}

/// Print the result of a clean run
pub fn print_clean_summary(result: &CleanResult) {
    println!(
        "All files and/or directories have been removed. Process took {}",
        format_elapsed(result.duration)
    );
    if result.skipped > 0 {
        println!(
            "  {} {}",
            style("Skipped:").yellow().bold(),
            result.skipped
        );
    }
    if result.failures > 0 {
        println!(
            "  {} {}",
            style("Failed:").yellow().bold(),
            result.failures
        );
    }
}
