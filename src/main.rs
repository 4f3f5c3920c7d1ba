//! mdm-cleanup - MDM enrollment cleanup
//!
//! Finds the MDM enrollments registered on a Windows device and removes their
//! scheduled tasks, registry subtree and client certificates, so the device
//! can enroll again or be fully decommissioned.

use clap::Parser;

mod cli;
mod clock;
mod commands;
mod config;
mod domain;
mod error;
mod machine;
mod operations;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use commands::context::GlobalOptions;
use ui::Verbosity;

fn main() {
    let cli = Cli::parse();

    let options = GlobalOptions {
        snapshot: cli.snapshot,
        config: cli.config,
        verbosity: Verbosity::from_flags(cli.verbose, cli.quiet),
    };

    let result = match cli.command {
        Commands::Discover(args) => commands::discover::run(&options, args),
        Commands::Inspect(args) => commands::inspect::run(&options, args),
        Commands::Certs(args) => commands::certs::run(&options, args),
        Commands::Cleanup(args) => commands::cleanup::run(&options, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(help) = miette::Diagnostic::help(&e) {
            eprintln!("  help: {}", help);
        }
        std::process::exit(1);
    }
}
