//! Leveled, styled log output
//!
//! The core logs at every decision point through the [`Logger`] trait and never
//! looks at a result. [`ConsoleLogger`] writes styled lines to the terminal;
//! [`MemoryLogger`] keeps entries for tests.

#[cfg(test)]
use std::cell::RefCell;
use std::fmt;

use console::Style;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Notice,
    Info,
    Warning,
    Error,
    Success,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
            Level::Success => "OK",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Notice => Style::new().dim(),
            Level::Info => Style::new().cyan(),
            Level::Warning => Style::new().yellow(),
            Level::Error => Style::new().red().bold(),
            Level::Success => Style::new().green(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How much console output to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings, errors and successes only
    Quiet,
    #[default]
    Normal,
    /// Everything, including notices
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn shows(self, level: Level) -> bool {
        match self {
            Verbosity::Verbose => true,
            Verbosity::Normal => level != Level::Notice,
            Verbosity::Quiet => matches!(level, Level::Warning | Level::Error | Level::Success),
        }
    }
}

/// Logging collaborator
pub trait Logger {
    /// Log with an optional style replacing the level's default message style
    fn log_styled(&self, level: Level, message: &str, style: Option<&Style>);

    fn log(&self, level: Level, message: &str) {
        self.log_styled(level, message, None);
    }

    fn notice(&self, message: &str) {
        self.log(Level::Notice, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn success(&self, message: &str) {
        self.log(Level::Success, message);
    }
}

/// Writes level-tagged lines to the terminal
#[derive(Debug, Default)]
pub struct ConsoleLogger {
    verbosity: Verbosity,
    stderr_only: bool,
}

impl ConsoleLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            stderr_only: false,
        }
    }

    /// Keep stdout free for JSON output
    pub fn stderr(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            stderr_only: true,
        }
    }
}

impl Logger for ConsoleLogger {
    fn log_styled(&self, level: Level, message: &str, style: Option<&Style>) {
        if !self.verbosity.shows(level) {
            return;
        }
        let tag = level.style().apply_to(format!("[{:<6}]", level.tag()));
        let body = match style {
            Some(style) => style.apply_to(message).to_string(),
            None => message.to_string(),
        };
        if level == Level::Error || self.stderr_only {
            eprintln!("{tag} {body}");
        } else {
            println!("{tag} {body}");
        }
    }
}

/// Keeps every entry in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: RefCell<Vec<(Level, String)>>,
}

#[cfg(test)]
impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries.borrow().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn log_styled(&self, level: Level, message: &str, _style: Option<&Style>) {
        self.entries.borrow_mut().push((level, message.to_string()));
    }
}
