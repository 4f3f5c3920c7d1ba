//! UI/Progress presentation layer
//!
//! This module handles:
//! - Leveled console logging ([`logger`])
//! - Error capture at catch boundaries ([`reporter`])
//! - Run summary rendering ([`display`])
//! - Progress reporting across the identifiers of a cleanup run
//!
//! All progress reporting goes through the [`ProgressReporter`] trait, so the
//! orchestrator runs the same with an interactive bar or with no output at all.

pub mod display;
pub mod logger;
pub mod reporter;

pub use logger::{ConsoleLogger, Logger, Verbosity};
pub use reporter::{ConsoleErrorReporter, ErrorReporter};
#[cfg(test)]
pub use logger::{Level, MemoryLogger};
#[cfg(test)]
pub use reporter::MemoryErrorReporter;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for the per-identifier loop
pub trait ProgressReporter {
    /// Begin tracking `total` identifiers
    fn start(&mut self, total: u64);

    /// Show the identifier currently being processed
    fn update_identifier(&mut self, identifier: &str, current: usize, total: usize);

    /// One identifier done
    fn inc(&mut self);

    fn finish(&mut self);
}

/// Interactive progress reporter with a visual progress bar
///
/// Draws to stderr; indicatif hides the bar when stderr is not a terminal.
#[derive(Default)]
pub struct InteractiveProgressReporter {
    pb: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&mut self, total: u64) {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        self.pb = Some(pb);
    }

    fn update_identifier(&mut self, identifier: &str, current: usize, total: usize) {
        if let Some(ref pb) = self.pb {
            pb.set_message(format!("({current}/{total}) {identifier}"));
        }
    }

    fn inc(&mut self) {
        if let Some(ref pb) = self.pb {
            pb.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Silent progress reporter
///
/// No-op implementation used with --quiet, --json and in tests.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&mut self, _total: u64) {
        // No-op for silent mode
    }

    fn update_identifier(&mut self, _identifier: &str, _current: usize, _total: usize) {
        // No-op for silent mode
    }

    fn inc(&mut self) {
        // No-op for silent mode
    }

    fn finish(&mut self) {
        // No-op for silent mode
    }
}
