use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    mdm-cleanup completions bash > ~/.bash_completion.d/mdm-cleanup\n\n\
                  Generate zsh completions:\n    mdm-cleanup completions zsh > ~/.zfunc/_mdm-cleanup\n\n\
                  Generate PowerShell completions:\n    mdm-cleanup completions powershell >> $PROFILE")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
