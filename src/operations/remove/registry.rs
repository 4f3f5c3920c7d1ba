//! Registry remover

use crate::domain::{EnrollmentId, RemovalOutcome, RemovalReport};
use crate::error::Result;
use crate::machine::join_key;
use crate::operations::CleanupContext;
use crate::operations::probe::registry::identifier_keys;

/// Delete every child of the enrollments base key that names `identifier`.
///
/// Each subtree is deleted independently. Failing to read the base key is
/// returned as an error; failing to delete one subtree is recorded.
pub fn remove_registry(
    ctx: &CleanupContext<'_>,
    identifier: &EnrollmentId,
) -> Result<RemovalReport> {
    let registry = ctx.machine.registry;
    let base = &ctx.settings.registry_base;
    let mut report = RemovalReport::new();

    let matching = identifier_keys(ctx, identifier)?;
    if matching.is_empty() {
        ctx.logger
            .warn(&format!("No registry keys for {identifier} under {base}"));
        report.record_absent(join_key(base, identifier.as_str()));
        return Ok(report);
    }

    for name in matching {
        let path = join_key(base, &name);
        match registry.delete_tree(&path) {
            Ok(()) => {
                ctx.logger.success(&format!("Deleted registry key {path}"));
                report.record(RemovalOutcome::success(path));
            }
            Err(e) => {
                ctx.reporter.report("Deleting registry key", &e);
                ctx.logger
                    .error(&format!("Failed to delete registry key {path}: {e}"));
                report.record(RemovalOutcome::failed(path, e.to_string()));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{GUID_A, GUID_B, SnapshotBuilder, TestEnv, id};
    use crate::ui::Level;

    #[test]
    fn test_deletes_identifier_subtree_only() {
        let env = TestEnv::new(
            SnapshotBuilder::new()
                .enrollment(GUID_A)
                .enrollment(GUID_B)
                .build(),
        );
        let report = remove_registry(&env.ctx(), &id(GUID_A)).unwrap();

        assert_eq!(report.succeeded().count(), 1);
        let keys: Vec<String> = env.snapshot().registry.keys.into_keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(keys.iter().all(|k| k.contains(GUID_B)));
    }

    #[test]
    fn test_every_matching_spelling_is_deleted() {
        let env = TestEnv::new(
            SnapshotBuilder::new()
                .registry_key(GUID_A, "DMClient", &[])
                .registry_key(&format!("{{{GUID_A}}}"), "Poll", &[])
                .build(),
        );
        let report = remove_registry(&env.ctx(), &id(GUID_A)).unwrap();
        assert_eq!(report.succeeded().count(), 2);
        assert!(env.snapshot().registry.keys.is_empty());
    }

    #[test]
    fn test_one_failure_does_not_block_others() {
        let braced = format!("{{{GUID_A}}}");
        let env = TestEnv::new(
            SnapshotBuilder::new()
                .registry_key(GUID_A, "DMClient", &[])
                .registry_key(&braced, "Poll", &[])
                .fail_registry_key(&format!("HKLM\\SOFTWARE\\Microsoft\\Enrollments\\{GUID_A}"))
                .build(),
        );
        let report = remove_registry(&env.ctx(), &id(GUID_A)).unwrap();

        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(env.reporter.len(), 1);
        assert_eq!(env.logger.count(Level::Error), 1);
    }

    #[test]
    fn test_absent_key_is_warning() {
        let env = TestEnv::new(SnapshotBuilder::new().enrollment(GUID_B).build());
        let report = remove_registry(&env.ctx(), &id(GUID_A)).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.absent.len(), 1);
        assert_eq!(env.logger.count(Level::Warning), 1);
        assert_eq!(env.logger.count(Level::Error), 0);
    }

    #[test]
    fn test_missing_base_is_warning() {
        let env = TestEnv::new(SnapshotBuilder::new().build());
        let report = remove_registry(&env.ctx(), &id(GUID_A)).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.absent.len(), 1);
        assert!(env.logger.contains(Level::Warning, "No registry keys"));
    }

    #[test]
    fn test_inaccessible_registry_is_error() {
        let env = TestEnv::new(SnapshotBuilder::new().registry_inaccessible().build());
        assert!(remove_registry(&env.ctx(), &id(GUID_A)).is_err());
    }
}
