//! Version command
//!
//! Prints the build and the defaults a run starts from.

use crate::config::Settings;
use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    print!("{}", render(&Settings::default()));
    Ok(())
}

fn render(defaults: &Settings) -> String {
    let mut out = format!("mdm-cleanup {}\n\n", env!("CARGO_PKG_VERSION"));
    out.push_str("Build:\n");
    out.push_str(&format!("  Rust: {}\n", env!("CARGO_PKG_RUST_VERSION")));
    out.push_str(&format!("  Profile: {}\n", build_profile()));
    out.push_str(&format!("  System backend: {}\n", system_backend()));
    out.push_str("\nDefaults:\n");
    out.push_str(&format!("  Task namespace: {}\n", defaults.task_root));
    out.push_str(&format!("  Task storage: {}\n", defaults.task_storage_root.display()));
    out.push_str(&format!("  Registry base: {}\n", defaults.registry_base));
    out.push_str(&format!("  Certificate store: {}\n", defaults.store));
    out.push_str(&format!("  Issuer: {}\n", defaults.issuer));
    out
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn system_backend() -> &'static str {
    if cfg!(windows) {
        "powershell"
    } else {
        "none (use --snapshot)"
    }
}
