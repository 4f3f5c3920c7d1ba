use clap::Parser;

/// Arguments for the discover command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List enrollment identifiers:\n    mdm-cleanup discover\n\n\
                  Against a machine snapshot:\n    mdm-cleanup --snapshot machine.yaml discover\n\n\
                  As JSON:\n    mdm-cleanup discover --json")]
pub struct DiscoverArgs {
    /// Print identifiers as a JSON array
    #[arg(long)]
    pub json: bool,
}
