//! Certificate remover
//!
//! Scoped by issuer alone. Every certificate the MDM authority issued into the
//! store is deleted, whichever enrollment it was issued for.

use crate::domain::{RemovalOutcome, RemovalReport};
use crate::error::Result;
use crate::operations::CleanupContext;
use crate::operations::probe::certificates::issued_by;

/// Delete every certificate in `store` whose issuer is exactly `issuer`.
pub fn remove_certificates(
    ctx: &CleanupContext<'_>,
    store: &str,
    issuer: &str,
) -> Result<RemovalReport> {
    let mut report = RemovalReport::new();

    let matching = issued_by(ctx, store, issuer)?;
    if matching.is_empty() {
        ctx.logger
            .warn(&format!("No certificates issued by '{issuer}' in {store}"));
        report.record_absent(format!("certificates issued by {issuer}"));
        return Ok(report);
    }

    for cert in &matching {
        let label = format!("{} ({})", cert.subject, cert.thumbprint);
        match ctx.machine.certificates.delete(store, cert) {
            Ok(()) => {
                ctx.logger.success(&format!("Deleted certificate {label}"));
                report.record(RemovalOutcome::success(&cert.subject));
            }
            Err(e) => {
                ctx.reporter.report("Deleting certificate", &e);
                ctx.logger
                    .error(&format!("Failed to delete certificate {label}: {e}"));
                report.record(RemovalOutcome::failed(&cert.subject, e.to_string()));
            }
        }
    }

    Ok(report)
}
