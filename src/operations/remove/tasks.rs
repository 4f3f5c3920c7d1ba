//! Scheduled task remover
//!
//! Order matters: the tasks are unregistered first, then the task storage
//! folders go, and the enrollment's scheduler folder is deleted last since
//! the scheduler refuses to drop a folder that still holds tasks. Each step
//! is best effort; nothing already deleted is restored when a later step fails.

use crate::domain::{EnrollmentId, RemovalOutcome, RemovalReport};
use crate::error::Result;
use crate::operations::CleanupContext;
use crate::operations::probe::tasks::{matching_tasks, storage_folders};

/// Remove every scheduled task and task folder that belongs to `identifier`.
///
/// Only a failure to list the registered tasks is returned as an error.
pub fn remove_tasks(ctx: &CleanupContext<'_>, identifier: &EnrollmentId) -> Result<RemovalReport> {
    let mut report = RemovalReport::new();

    let tasks = matching_tasks(ctx, identifier)?;
    if tasks.is_empty() {
        ctx.logger
            .warn(&format!("No scheduled tasks to remove for {identifier}"));
        report.record_absent(format!("scheduled tasks for {identifier}"));
    }
    for task in &tasks {
        let full_name = task.full_name();
        match ctx.machine.scheduler.unregister_task(task) {
            Ok(()) => {
                ctx.logger
                    .success(&format!("Unregistered task {full_name}"));
                report.record(RemovalOutcome::success(full_name));
            }
            Err(e) => {
                ctx.reporter.report("Unregistering scheduled task", &e);
                ctx.logger
                    .error(&format!("Failed to unregister {full_name}: {e}"));
                report.record(RemovalOutcome::failed(full_name, e.to_string()));
            }
        }
    }

    for path in storage_folders(ctx, identifier) {
        let display = path.display().to_string();
        if !ctx.machine.task_folders.exists(&path) {
            ctx.logger
                .info(&format!("Task folder {display} not present, skipping"));
            continue;
        }
        match ctx.machine.task_folders.remove(&path) {
            Ok(()) => {
                ctx.logger.success(&format!("Removed task folder {display}"));
                report.record(RemovalOutcome::success(display));
            }
            Err(e) => {
                ctx.reporter.report("Removing task folder", &e);
                ctx.logger
                    .error(&format!("Failed to remove task folder {display}: {e}"));
                report.record(RemovalOutcome::failed(display, e.to_string()));
            }
        }
    }

    remove_scheduler_folder(ctx, identifier, &mut report);
    Ok(report)
}

/// Final step: the enrollment's own folder in the scheduler namespace
fn remove_scheduler_folder(
    ctx: &CleanupContext<'_>,
    identifier: &EnrollmentId,
    report: &mut RemovalReport,
) {
    let root = &ctx.settings.task_root;
    let listed = match ctx.machine.scheduler.list_identifier_folders(root) {
        Ok(folders) => folders.unwrap_or_default(),
        Err(e) => {
            ctx.reporter.report("Listing scheduler folders", &e);
            ctx.logger
                .error(&format!("Cannot list scheduler folders under {root}: {e}"));
            report.record(RemovalOutcome::failed(
                ctx.settings.identifier_task_folder(identifier.as_str()),
                e.to_string(),
            ));
            return;
        }
    };

    let Some(folder_name) = listed
        .into_iter()
        .find(|name| EnrollmentId::parse(name).as_ref() == Some(identifier))
    else {
        ctx.logger.warn(&format!(
            "Scheduler folder for {identifier} not found under {root}"
        ));
        report.record_absent(ctx.settings.identifier_task_folder(identifier.as_str()));
        return;
    };

    let folder = ctx.settings.identifier_task_folder(&folder_name);
    match ctx.machine.scheduler.delete_folder(&folder) {
        Ok(()) => {
            ctx.logger
                .success(&format!("Deleted scheduler folder {folder}"));
            report.record(RemovalOutcome::success(folder));
        }
        Err(e) => {
            ctx.reporter.report("Deleting scheduler folder", &e);
            ctx.logger
                .error(&format!("Failed to delete scheduler folder {folder}: {e}"));
            report.record(RemovalOutcome::failed(folder, e.to_string()));
        }
    }
}
