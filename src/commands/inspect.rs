//! Inspect command
//!
//! Read-only: registry and task probes for one enrollment or every
//! discovered one. Certificates have their own command since they are not
//! tied to an identifier.

use console::Style;
use serde::Serialize;

use crate::cli::InspectArgs;
use crate::commands::context::{GlobalOptions, Session};
use crate::config::SettingsOverrides;
use crate::domain::EnrollmentId;
use crate::error::Result;
use crate::operations::CleanupContext;
use crate::operations::discovery::discover;
use crate::operations::probe::{RegistryFinding, TaskProbeReport, probe_registry, probe_tasks};
use crate::ui::display;

#[derive(Debug, Serialize)]
struct Inspection {
    identifier: EnrollmentId,
    tasks: TaskProbeReport,
    registry: Vec<RegistryFinding>,
}

fn identifiers(ctx: &CleanupContext<'_>, requested: Option<&str>) -> Result<Vec<EnrollmentId>> {
    if let Some(name) = requested {
        return Ok(vec![EnrollmentId::try_from_name(name)?]);
    }
    ctx.machine.scheduler.connect()?;
    Ok(discover(ctx, &ctx.settings.task_root)?.identifiers().to_vec())
}

fn inspect(ctx: &CleanupContext<'_>, identifiers: Vec<EnrollmentId>) -> Result<Vec<Inspection>> {
    identifiers
        .into_iter()
        .map(|identifier| {
            // One finding per matching key spelling, so probe each identifier alone.
            Ok(Inspection {
                registry: probe_registry(ctx, std::slice::from_ref(&identifier))?,
                tasks: probe_tasks(ctx, &identifier)?,
                identifier,
            })
        })
        .collect()
}

/// Run inspect command
pub fn run(options: &GlobalOptions, args: InspectArgs) -> Result<()> {
    let overrides = SettingsOverrides::default();
    let session = if args.json {
        Session::open_for_json(options, &overrides)?
    } else {
        Session::open(options, &overrides)?
    };
    let ctx = session.ctx();

    let inspections = inspect(&ctx, identifiers(&ctx, args.identifier.as_deref())?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspections)?);
        return Ok(());
    }

    if inspections.is_empty() {
        println!("No enrollments to inspect");
    }
    for inspection in &inspections {
        println!(
            "  {}",
            Style::new().bold().yellow().apply_to(&inspection.identifier)
        );
        for finding in &inspection.registry {
            display::display_registry_finding(finding);
        }
        display::display_task_probe(&inspection.tasks);
    }
    Ok(())
}
