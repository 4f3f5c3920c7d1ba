//! Discover command

use crate::cli::DiscoverArgs;
use crate::commands::context::{GlobalOptions, Session};
use crate::config::SettingsOverrides;
use crate::error::Result;
use crate::operations::discovery::discover;
use crate::ui::display;

/// Run discover command
pub fn run(options: &GlobalOptions, args: DiscoverArgs) -> Result<()> {
    let overrides = SettingsOverrides::default();
    let session = if args.json {
        Session::open_for_json(options, &overrides)?
    } else {
        Session::open(options, &overrides)?
    };
    let ctx = session.ctx();

    ctx.machine.scheduler.connect()?;
    let root = session.settings.task_root.as_str();
    let found = discover(&ctx, root)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(found.identifiers())?);
    } else {
        display::display_discovery(&found, root);
    }
    Ok(())
}
