//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - discover: Discover command arguments
//! - inspect: Inspect command arguments
//! - certs: Certs command arguments and the shared certificate store options
//! - cleanup: Cleanup command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod certs;
pub mod cleanup;
pub mod completions;
pub mod discover;
pub mod inspect;

pub use certs::CertsArgs;
pub use cleanup::CleanupArgs;
pub use completions::CompletionsArgs;
pub use discover::DiscoverArgs;
pub use inspect::InspectArgs;

/// mdm-cleanup - remove MDM enrollment leftovers
///
/// Removes the scheduled tasks, registry subtree and client certificate an MDM
/// enrollment leaves on a Windows device.
#[derive(Parser, Debug)]
#[command(
    name = "mdm-cleanup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Remove MDM enrollment leftovers from a Windows device",
    long_about = "mdm-cleanup finds the MDM enrollments registered on a device and removes \
                  their scheduled tasks, registry keys and client certificates so the device \
                  can enroll again or be fully decommissioned.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  mdm-cleanup discover                        \x1b[90m# List enrollment identifiers\x1b[0m\n   \
                  mdm-cleanup inspect                         \x1b[90m# Show tasks and registry keys\x1b[0m\n   \
                  mdm-cleanup certs --timeout 60              \x1b[90m# Wait for the MDM certificate\x1b[0m\n   \
                  mdm-cleanup cleanup -y                      \x1b[90m# Remove everything\x1b[0m\n   \
                  mdm-cleanup --snapshot m.yaml cleanup -y    \x1b[90m# Rehearse on a snapshot\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Work against a machine snapshot file instead of the live system
    #[arg(long, short = 's', global = true, env = "MDM_CLEANUP_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// YAML settings file
    #[arg(long, short = 'c', global = true, env = "MDM_CLEANUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings, errors and results
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List enrollment identifiers
    Discover(DiscoverArgs),

    /// Show scheduled tasks and registry keys of enrollments (read-only)
    Inspect(InspectArgs),

    /// Look for MDM client certificates
    Certs(CertsArgs),

    /// Remove every enrollment's tasks, registry keys and certificates
    Cleanup(CleanupArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
