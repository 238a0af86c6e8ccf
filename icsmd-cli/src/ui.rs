//! Terminal output: colored status lines, spinners and error counting.
//!
//! The converted table is the only thing written to stdout; everything here
//! goes to stderr.

use std::fmt::Display;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use thiserror::Error;

/// Raised instead of continuing when `--strict` is on.
#[derive(Error, Debug)]
#[error("An error occurred while using the '--strict' flag.")]
pub struct StrictAbort;

/// Counts non-fatal errors for one command and enforces strict mode.
#[derive(Debug)]
pub struct Ui {
    strict: bool,
    error_count: usize,
}

impl Ui {
    pub fn new(strict: bool) -> Self {
        Ui {
            strict,
            error_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn output(&self, message: impl Display) {
        eprintln!("{message}");
    }

    pub fn hint(&self, message: impl Display) {
        eprintln!("{}", message.to_string().yellow());
    }

    /// A warning that does not count as an error, but still stops a strict run.
    pub fn warn(&self, message: impl Display) -> Result<(), StrictAbort> {
        eprintln!("{}", message.to_string().yellow());
        self.check_strict()
    }

    /// A non-fatal error: counted, and fatal under `--strict`.
    pub fn error(&mut self, message: impl Display) -> Result<(), StrictAbort> {
        eprintln!("{}", message.to_string().red());
        self.error_count += 1;
        self.check_strict()
    }

    /// A fatal error: printed only, the caller decides the exit code.
    pub fn fatal(&self, message: impl Display) {
        eprintln!("{}", message.to_string().red());
    }

    pub fn success(&self, message: impl Display, elapsed: Duration) {
        eprintln!("{} in {}", message.to_string().green(), format_elapsed(elapsed));
    }

    pub fn partial_success(&self, message: impl Display, elapsed: Duration) {
        eprintln!("{} in {}", message.to_string().yellow(), format_elapsed(elapsed));
    }

    fn check_strict(&self) -> Result<(), StrictAbort> {
        if self.strict {
            tracing::debug!("strict mode, aborting");
            return Err(StrictAbort);
        }
        Ok(())
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    humantime::format_duration(Duration::from_millis(millis)).to_string()
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/", " "])
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
