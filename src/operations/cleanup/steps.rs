//! The two units of work the orchestrator drives: the global certificate
//! step and the per-identifier sequence

use std::slice;

use crate::domain::{PendingRecord, RemovalReport, RunSummary};
use crate::error::Result;
use crate::operations::CleanupContext;
use crate::operations::probe::{probe_certificates, probe_registry, probe_tasks};
use crate::operations::remove::{remove_certificates, remove_registry, remove_tasks};

/// Probe, remove and probe again every certificate from the MDM issuer.
///
/// Store failures end this step only. They are recorded as run-level errors.
pub(super) fn certificate_cleanup(ctx: &CleanupContext<'_>, summary: &mut RunSummary) {
    let store = ctx.settings.store.as_str();
    let issuer = ctx.settings.issuer.as_str();
    let timeout = ctx.settings.timeout();

    ctx.logger
        .notice(&format!("Checking {store} for certificates issued by '{issuer}'"));
    if let Err(e) = probe_certificates(ctx, store, issuer, timeout) {
        store_failed(ctx, summary, "Probing certificate store", &e);
        return;
    }

    let report = match remove_certificates(ctx, store, issuer) {
        Ok(report) => report,
        Err(e) => {
            store_failed(ctx, summary, "Removing certificates", &e);
            return;
        }
    };
    if report.is_noop() {
        summary.warn(format!("No certificates issued by '{issuer}' in {store}"));
    }
    for failed in report.failed() {
        summary.error(format!("Certificate {} was not deleted", failed.item));
    }

    match probe_certificates(ctx, store, issuer, timeout) {
        Ok(probe) if !probe.certificates().is_empty() => {
            summary.warn(format!(
                "{} certificate(s) issued by '{issuer}' still in {store}",
                probe.certificates().len()
            ));
        }
        Ok(_) => {
            ctx.logger
                .success(&format!("No certificates from '{issuer}' left in {store}"));
        }
        Err(e) => store_failed(ctx, summary, "Verifying certificate removal", &e),
    }
}

fn store_failed(
    ctx: &CleanupContext<'_>,
    summary: &mut RunSummary,
    context: &str,
    error: &crate::error::MdmError,
) {
    ctx.reporter.report(context, error);
    ctx.logger.error(&format!("{context} failed: {error}"));
    summary.error(format!("{context} failed: {error}"));
}

/// Fold a remover's report into the identifier's record
fn absorb(pending: &mut PendingRecord, report: &RemovalReport) {
    for item in &report.absent {
        pending.warn(format!("Not found: {item}"));
    }
    pending.add_item_failures(report.failed().count());
}

/// Registry and task removal for one identifier, with a probe before and
/// after each removal.
///
/// An `Err` aborts the rest of this identifier's sequence only. The probes
/// after removal are observational: leftovers become warnings on the record.
pub(super) fn identifier_cleanup(
    ctx: &CleanupContext<'_>,
    pending: &mut PendingRecord,
) -> Result<()> {
    let owned = pending.identifier().clone();
    let identifier = &owned;
    let ids = slice::from_ref(identifier);

    probe_registry(ctx, ids)?;
    probe_tasks(ctx, identifier)?;

    let removed = remove_tasks(ctx, identifier)?;
    absorb(pending, &removed);

    let after = probe_tasks(ctx, identifier)?;
    if !after.tasks.is_empty() {
        pending.warn(format!(
            "{} scheduled task(s) remain after removal",
            after.tasks.len()
        ));
    }
    for folder in [&after.critical_folder, &after.noncritical_folder] {
        if folder.exists {
            pending.warn(format!(
                "Task folder {} remains after removal",
                folder.path.display()
            ));
        }
    }

    let removed = remove_registry(ctx, identifier)?;
    absorb(pending, &removed);

    for finding in probe_registry(ctx, ids)? {
        if finding.present {
            pending.warn(format!(
                "Registry key {} remains after removal",
                finding.key_path
            ));
        }
    }

    Ok(())
}
