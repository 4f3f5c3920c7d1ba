//! Certs command

use crate::cli::CertsArgs;
use crate::commands::context::{GlobalOptions, Session};
use crate::config::SettingsOverrides;
use crate::error::Result;
use crate::operations::probe::probe_certificates;
use crate::ui::display;

/// Run certs command
///
/// Waits up to the configured timeout for a certificate from the issuer.
/// Finding none is not an error.
pub fn run(options: &GlobalOptions, args: CertsArgs) -> Result<()> {
    let overrides = SettingsOverrides::from(&args.cert);
    let session = if args.json {
        Session::open_for_json(options, &overrides)?
    } else {
        Session::open(options, &overrides)?
    };
    let settings = &session.settings;

    let probe = probe_certificates(
        &session.ctx(),
        &settings.store,
        &settings.issuer,
        settings.timeout(),
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&probe)?);
    } else {
        display::display_certificate_probe(&probe, &settings.store, &settings.issuer);
    }
    Ok(())
}
