use clap::{Args, Parser};

use crate::config::SettingsOverrides;

/// Certificate store selection shared by `certs` and `cleanup`
#[derive(Args, Debug, Clone, Default)]
pub struct CertArgs {
    /// Certificate store path, e.g. LocalMachine\My or Cert:\LocalMachine\My
    #[arg(long, env = "MDM_CLEANUP_STORE")]
    pub store: Option<String>,

    /// Exact issuer distinguished name of the MDM authority
    #[arg(long, env = "MDM_CLEANUP_ISSUER")]
    pub issuer: Option<String>,

    /// Seconds to wait for a certificate to appear
    #[arg(long, env = "MDM_CLEANUP_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl From<&CertArgs> for SettingsOverrides {
    fn from(args: &CertArgs) -> Self {
        Self {
            store: args.store.clone(),
            issuer: args.issuer.clone(),
            timeout_secs: args.timeout,
        }
    }
}

/// Arguments for the certs command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check for the MDM client certificate:\n    mdm-cleanup certs\n\n\
                  Wait up to a minute for it to be issued:\n    mdm-cleanup certs --timeout 60\n\n\
                  Another store and issuer:\n    mdm-cleanup certs --store CurrentUser\\My --issuer \"CN=Contoso MDM CA\"")]
pub struct CertsArgs {
    #[command(flatten)]
    pub cert: CertArgs,

    /// Print the probe result as JSON
    #[arg(long)]
    pub json: bool,
}
