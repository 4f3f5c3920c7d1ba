//! Registry probe
//!
//! For each identifier, looks under the enrollments base key for its subtree
//! and flattens the values of the MDM client component keys into
//! (subkey, property, value) rows. Other child keys are ignored.

use serde::Serialize;

use crate::config::CLIENT_COMPONENT_KEYS;
use crate::domain::EnrollmentId;
use crate::error::Result;
use crate::machine::join_key;
use crate::operations::CleanupContext;

/// One registry value under a client component key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryProperty {
    pub subkey: String,
    pub name: String,
    pub value: String,
}

/// What the registry holds for one identifier
#[derive(Debug, Clone, Serialize)]
pub struct RegistryFinding {
    pub identifier: EnrollmentId,
    pub key_path: String,
    pub present: bool,
    /// Recognized client component keys, in the order the registry lists them
    pub component_keys: Vec<String>,
    pub properties: Vec<RegistryProperty>,
}

/// Whether a child key belongs to the MDM client
pub fn is_client_component(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    CLIENT_COMPONENT_KEYS
        .iter()
        .any(|component| name.contains(&component.to_ascii_lowercase()))
}

/// Child keys of the enrollments base key that name `identifier`, however
/// they are spelled. Empty when the base key itself is missing.
pub(crate) fn identifier_keys(
    ctx: &CleanupContext<'_>,
    identifier: &EnrollmentId,
) -> Result<Vec<String>> {
    let registry = ctx.machine.registry;
    let base = &ctx.settings.registry_base;
    if !registry.key_exists(base)? {
        return Ok(Vec::new());
    }
    Ok(registry
        .subkeys(base)?
        .into_iter()
        .filter(|name| identifier.matches(name))
        .collect())
}

/// Inspect the registry subtree of every identifier in `identifiers`.
///
/// An identifier whose subtree exists under more than one spelling gets one
/// finding per subtree.
pub fn probe_registry(
    ctx: &CleanupContext<'_>,
    identifiers: &[EnrollmentId],
) -> Result<Vec<RegistryFinding>> {
    let mut findings = Vec::with_capacity(identifiers.len());

    for identifier in identifiers {
        let keys = identifier_keys(ctx, identifier)?;
        if keys.is_empty() {
            let key_path = join_key(&ctx.settings.registry_base, identifier.as_str());
            ctx.logger
                .warn(&format!("Registry key not found: {key_path}"));
            findings.push(RegistryFinding {
                identifier: identifier.clone(),
                key_path,
                present: false,
                component_keys: Vec::new(),
                properties: Vec::new(),
            });
            continue;
        }

        for name in keys {
            let key_path = join_key(&ctx.settings.registry_base, &name);
            findings.push(inspect_key(ctx, identifier, key_path)?);
        }
    }

    Ok(findings)
}

fn inspect_key(
    ctx: &CleanupContext<'_>,
    identifier: &EnrollmentId,
    key_path: String,
) -> Result<RegistryFinding> {
    let registry = ctx.machine.registry;
    let component_keys: Vec<String> = registry
        .subkeys(&key_path)?
        .into_iter()
        .filter(|name| is_client_component(name))
        .collect();

    if component_keys.is_empty() {
        ctx.logger.warn(&format!(
            "No MDM client keys under {key_path} (expected one of {})",
            CLIENT_COMPONENT_KEYS.join(", ")
        ));
    }

    let mut properties = Vec::new();
    for subkey in &component_keys {
        for value in registry.values(&join_key(&key_path, subkey))? {
            ctx.logger
                .notice(&format!("  {subkey}\\{} = {}", value.name, value.data));
            properties.push(RegistryProperty {
                subkey: subkey.clone(),
                name: value.name,
                value: value.data,
            });
        }
    }

    ctx.logger.info(&format!(
        "Registry key present: {key_path} ({} client key(s), {} value(s))",
        component_keys.len(),
        properties.len()
    ));
    Ok(RegistryFinding {
        identifier: identifier.clone(),
        key_path,
        present: true,
        component_keys,
        properties,
    })
}
