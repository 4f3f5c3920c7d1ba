//! Identifier discovery
//!
//! Lists the immediate subfolders of the enterprise management namespace and
//! keeps those named like a GUID. Anything else living there is skipped.

use super::CleanupContext;
use crate::domain::EnrollmentId;
use crate::error::Result;

/// What the namespace held
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The root exists; possibly with no enrollments under it
    Found(Vec<EnrollmentId>),
    /// The root folder itself is missing, which is normal on an unenrolled machine
    NamespaceAbsent,
}

impl Discovery {
    pub fn identifiers(&self) -> &[EnrollmentId] {
        match self {
            Discovery::Found(ids) => ids,
            Discovery::NamespaceAbsent => &[],
        }
    }
}

/// Find every enrollment identifier under `root`.
///
/// Fails only when the scheduling service cannot be reached.
pub fn discover(ctx: &CleanupContext<'_>, root: &str) -> Result<Discovery> {
    ctx.logger
        .notice(&format!("Enumerating scheduler folders under {root}"));

    let Some(folders) = ctx.machine.scheduler.list_identifier_folders(root)? else {
        ctx.logger
            .warn(&format!("Task folder {root} does not exist; no enrollments to discover"));
        return Ok(Discovery::NamespaceAbsent);
    };

    let mut identifiers: Vec<EnrollmentId> = Vec::new();
    for name in folders {
        match EnrollmentId::parse(&name) {
            Some(id) if identifiers.contains(&id) => {
                ctx.logger
                    .notice(&format!("Skipping {name}: same enrollment listed twice"));
            }
            Some(id) => {
                ctx.logger.info(&format!("Found enrollment {id}"));
                identifiers.push(id);
            }
            None => {
                ctx.logger
                    .info(&format!("Skipping folder {name}: not an enrollment identifier"));
            }
        }
    }

    Ok(Discovery::Found(identifiers))
}
