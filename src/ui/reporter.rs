//! Uniform error capture at catch boundaries
//!
//! Every place that catches an [`MdmError`] and then decides whether to go on
//! hands it to an [`ErrorReporter`] first.

#[cfg(test)]
use std::cell::RefCell;
use std::error::Error;

use console::Style;
use miette::Diagnostic;

use crate::error::MdmError;

/// Error-reporting collaborator
pub trait ErrorReporter {
    /// `context` says what was being attempted when the error was caught
    fn report(&self, context: &str, error: &MdmError);
}

/// Prints the diagnostic code, help and source chain to stderr
#[derive(Debug, Default)]
pub struct ConsoleErrorReporter {
    verbose: bool,
}

impl ConsoleErrorReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ErrorReporter for ConsoleErrorReporter {
    fn report(&self, context: &str, error: &MdmError) {
        let code = error.code().map(|c| c.to_string()).unwrap_or_default();
        eprintln!(
            "  {} {}: {} {}",
            Style::new().red().apply_to("✗"),
            Style::new().bold().apply_to(context),
            error,
            Style::new().dim().apply_to(format!("[{code}]"))
        );
        if let Some(help) = error.help() {
            eprintln!("    {} {}", Style::new().cyan().apply_to("help:"), help);
        }
        if self.verbose {
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("    {} {}", Style::new().dim().apply_to("caused by:"), cause);
                source = cause.source();
            }
        }
    }
}

/// One captured report
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    pub context: String,
    pub message: String,
    pub code: Option<String>,
}

/// Keeps every report in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryErrorReporter {
    reports: RefCell<Vec<CapturedError>>,
}

#[cfg(test)]
impl MemoryErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<CapturedError> {
        self.reports.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }
}

#[cfg(test)]
impl ErrorReporter for MemoryErrorReporter {
    fn report(&self, context: &str, error: &MdmError) {
        self.reports.borrow_mut().push(CapturedError {
            context: context.to_string(),
            message: error.to_string(),
            code: error.code().map(|c| c.to_string()),
        });
    }
}
