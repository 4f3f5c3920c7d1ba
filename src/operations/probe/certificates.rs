//! Certificate probe
//!
//! Certificates appear some time after enrollment is triggered, so this is the
//! one probe that waits: the store is checked once immediately, then every
//! poll interval until a match shows up or the timeout has elapsed. A zero
//! timeout means a single check.

use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::machine::{Certificate, normalize_store};
use crate::operations::CleanupContext;

/// Result of watching a store for certificates from one issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CertificateProbe {
    Found { certificates: Vec<Certificate> },
    TimedOut { waited: Duration, polls: u32 },
}

impl CertificateProbe {
    pub fn certificates(&self) -> &[Certificate] {
        match self {
            CertificateProbe::Found { certificates } => certificates,
            CertificateProbe::TimedOut { .. } => &[],
        }
    }
}

/// Certificates in `store` whose issuer is exactly `issuer`
pub(crate) fn issued_by(
    ctx: &CleanupContext<'_>,
    store: &str,
    issuer: &str,
) -> Result<Vec<Certificate>> {
    Ok(ctx
        .machine
        .certificates
        .certificates(normalize_store(store))?
        .into_iter()
        .filter(|cert| cert.issuer == issuer)
        .collect())
}

/// Poll `store` for certificates issued by `issuer` for up to `timeout`.
///
/// Store access failures are returned immediately; they are not retried.
pub fn probe_certificates(
    ctx: &CleanupContext<'_>,
    store: &str,
    issuer: &str,
    timeout: Duration,
) -> Result<CertificateProbe> {
    let interval = ctx.settings.poll_interval();
    let start = ctx.clock.now();
    let mut polls = 0u32;

    loop {
        polls += 1;
        let found = issued_by(ctx, store, issuer)?;
        if !found.is_empty() {
            ctx.logger.info(&format!(
                "{} certificate(s) issued by '{issuer}' in {store}",
                found.len()
            ));
            for cert in &found {
                ctx.logger
                    .notice(&format!("  {} ({})", cert.subject, cert.thumbprint));
            }
            return Ok(CertificateProbe::Found {
                certificates: found,
            });
        }

        let waited = ctx.clock.now().saturating_duration_since(start);
        if waited >= timeout {
            ctx.logger.info(&format!(
                "No certificate issued by '{issuer}' in {store} after {}s",
                waited.as_secs()
            ));
            return Ok(CertificateProbe::TimedOut { waited, polls });
        }
        ctx.clock.sleep(interval.min(timeout - waited));
    }
}
