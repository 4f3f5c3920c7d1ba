use clap::Parser;

use super::certs::CertArgs;

/// Arguments for the cleanup command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove every enrollment (asks first):\n    mdm-cleanup cleanup\n\n\
                  Without confirmation:\n    mdm-cleanup cleanup -y\n\n\
                  Summary as JSON:\n    mdm-cleanup cleanup -y --json\n\n\
                  Rehearse against a snapshot:\n    mdm-cleanup --snapshot machine.yaml cleanup -y")]
pub struct CleanupArgs {
    #[command(flatten)]
    pub cert: CertArgs,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
