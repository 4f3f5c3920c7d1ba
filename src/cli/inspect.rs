use clap::Parser;

/// Arguments for the inspect command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Inspect every enrollment:\n    mdm-cleanup inspect\n\n\
                  Inspect one enrollment:\n    mdm-cleanup inspect --identifier 3F2504E0-4F89-11D3-9A0C-0305E82C3301\n\n\
                  As JSON:\n    mdm-cleanup inspect --json")]
pub struct InspectArgs {
    /// Only inspect this enrollment (GUID, with or without braces)
    #[arg(long, short = 'i')]
    pub identifier: Option<String>,

    /// Print findings as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_inspect_identifier() {
        let cli = Cli::try_parse_from([
            "mdm-cleanup",
            "inspect",
            "--identifier",
            "{3F2504E0-4F89-11D3-9A0C-0305E82C3301}",
        ])
        .unwrap();
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(
                    args.identifier.as_deref(),
                    Some("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}")
                );
                assert!(!args.json);
            }
            _ => panic!("Expected Inspect command"),
        }
    }
}
