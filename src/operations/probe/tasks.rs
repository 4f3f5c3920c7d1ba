//! Scheduled task probe
//!
//! Read-only view of what the scheduler and task storage hold for one
//! enrollment. Nothing found is a normal outcome, not an error.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Settings;
use crate::domain::EnrollmentId;
use crate::error::Result;
use crate::machine::ScheduledTask;
use crate::operations::CleanupContext;

/// Presence of one task storage folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderState {
    pub path: PathBuf,
    pub exists: bool,
}

/// Tasks and task storage folders belonging to an enrollment
#[derive(Debug, Clone, Serialize)]
pub struct TaskProbeReport {
    pub identifier: EnrollmentId,
    pub tasks: Vec<ScheduledTask>,
    pub critical_folder: FolderState,
    pub noncritical_folder: FolderState,
}

#[cfg(test)]
impl TaskProbeReport {
    /// No tasks and neither storage folder
    pub fn is_clean(&self) -> bool {
        self.tasks.is_empty() && !self.critical_folder.exists && !self.noncritical_folder.exists
    }
}

/// Tasks whose folder path names the enrollment
pub(crate) fn matching_tasks(
    ctx: &CleanupContext<'_>,
    identifier: &EnrollmentId,
) -> Result<Vec<ScheduledTask>> {
    Ok(ctx
        .machine
        .scheduler
        .list_tasks()?
        .into_iter()
        .filter(|task| identifier.matches(&task.path))
        .collect())
}

/// Storage folder under `folder` for `identifier`, as spelled on disk.
///
/// Tries the name as discovered, then the canonical and braced forms; falls
/// back to the discovered name when none exists.
fn storage_folder(
    ctx: &CleanupContext<'_>,
    folder: fn(&Settings, &str) -> PathBuf,
    identifier: &EnrollmentId,
) -> PathBuf {
    let canonical = identifier.canonical();
    [
        identifier.as_str().to_string(),
        format!("{{{canonical}}}"),
        canonical,
    ]
    .iter()
    .map(|name| folder(ctx.settings, name))
    .find(|path| ctx.machine.task_folders.exists(path))
    .unwrap_or_else(|| folder(ctx.settings, identifier.as_str()))
}

/// The critical and non-critical task storage folders of `identifier`
pub(crate) fn storage_folders(ctx: &CleanupContext<'_>, identifier: &EnrollmentId) -> [PathBuf; 2] {
    [
        storage_folder(ctx, Settings::critical_folder, identifier),
        storage_folder(ctx, Settings::noncritical_folder, identifier),
    ]
}

fn folder_state(ctx: &CleanupContext<'_>, path: PathBuf, label: &str) -> FolderState {
    let exists = ctx.machine.task_folders.exists(&path);
    if exists {
        ctx.logger
            .info(&format!("{label} task folder present: {}", path.display()));
    } else {
        ctx.logger
            .info(&format!("{label} task folder not found: {}", path.display()));
    }
    FolderState { path, exists }
}

/// Inspect scheduled tasks and task storage folders for `identifier`.
pub fn probe_tasks(ctx: &CleanupContext<'_>, identifier: &EnrollmentId) -> Result<TaskProbeReport> {
    let tasks = matching_tasks(ctx, identifier)?;
    if tasks.is_empty() {
        ctx.logger
            .info(&format!("No scheduled tasks found for {identifier}"));
    } else {
        ctx.logger.info(&format!(
            "{} scheduled task(s) found for {identifier}",
            tasks.len()
        ));
        for task in &tasks {
            ctx.logger.notice(&format!("  {}", task.full_name()));
        }
    }

    let [critical, noncritical] = storage_folders(ctx, identifier);
    let critical_folder = folder_state(ctx, critical, "EnterpriseMgmt");
    let noncritical_folder = folder_state(ctx, noncritical, "EnterpriseMgmtNoncritical");

    Ok(TaskProbeReport {
        identifier: identifier.clone(),
        tasks,
        critical_folder,
        noncritical_folder,
    })
}
