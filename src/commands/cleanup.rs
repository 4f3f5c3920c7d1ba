//! Cleanup command CLI wrapper
//!
//! Confirms with the user, runs [`CleanupOperation`], writes a snapshot
//! backend back to its file and renders the summary. An unclean summary
//! becomes an error so the process exits non-zero.

use std::io::IsTerminal;

use inquire::Confirm;

use crate::cli::CleanupArgs;
use crate::commands::context::{Backend, GlobalOptions, Session};
use crate::config::SettingsOverrides;
use crate::domain::RunSummary;
use crate::error::{MdmError, Result, io_error};
use crate::operations::CleanupOperation;
use crate::ui::{
    InteractiveProgressReporter, ProgressReporter, SilentProgressReporter, Verbosity, display,
};

fn target(backend: &Backend) -> String {
    match backend {
        Backend::Snapshot { path, .. } => format!("the snapshot {}", path.display()),
        Backend::System { .. } => "this machine".to_string(),
    }
}

// The prompt and its preamble go to stderr so `--json` output stays parseable
fn confirm_cleanup(session: &Session) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(io_error(
            "Cannot ask for confirmation: stdin is not a terminal (pass --yes)",
        ));
    }

    let settings = &session.settings;
    eprintln!("\nThis removes from {}:", target(&session.backend));
    eprintln!("  - scheduled tasks under {}", settings.task_root);
    eprintln!("  - enrollment keys under {}", settings.registry_base);
    eprintln!(
        "  - every certificate in {} issued by '{}'",
        settings.store, settings.issuer
    );
    eprintln!();

    Ok(Confirm::new("Proceed with cleanup?")
        .with_default(false)
        .with_help_message("Type 'y' to confirm, or press Enter to cancel")
        .prompt()?)
}

/// Error for a run that did not fully succeed
fn incomplete(summary: &RunSummary) -> Option<MdmError> {
    if summary.is_clean() {
        return None;
    }
    Some(MdmError::CleanupIncomplete {
        failed: summary.counts().failed,
        errors: summary.errors().count(),
    })
}

/// Run cleanup command
pub fn run(options: &GlobalOptions, args: CleanupArgs) -> Result<()> {
    let overrides = SettingsOverrides::from(&args.cert);
    let session = if args.json {
        Session::open_for_json(options, &overrides)?
    } else {
        Session::open(options, &overrides)?
    };

    if !args.yes && !confirm_cleanup(&session)? {
        println!("Cleanup cancelled");
        return Ok(());
    }

    let mut progress: Box<dyn ProgressReporter> =
        if args.json || options.verbosity == Verbosity::Quiet {
            Box::new(SilentProgressReporter)
        } else {
            Box::new(InteractiveProgressReporter::new())
        };
    let summary = CleanupOperation::new(session.ctx()).execute(progress.as_mut());

    session.backend.persist()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
    } else {
        display::display_summary(&summary);
    }

    match incomplete(&summary) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
