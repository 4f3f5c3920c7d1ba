//! Resource domains of a managed machine
//!
//! Each resource domain the cleanup touches is reached through a capability
//! trait, so the operations never depend on how a platform exposes it:
//! - [`TaskScheduler`]: the scheduling service namespace
//! - [`TaskFolderStore`]: the on-disk task storage folders
//! - [`RegistryStore`]: registry keys and values
//! - [`CertificateStore`]: certificate stores
//!
//! Backends:
//! - [`snapshot`]: an in-memory machine loaded from a YAML/JSON file
//! - [`powershell`]: the live Windows machine, driven through PowerShell
//! - [`task_storage`]: task storage folders on the local file system

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod powershell;
pub mod snapshot;
pub mod task_storage;

pub use powershell::{PowerShellMachine, ensure_supported_host};
#[cfg(test)]
pub use snapshot::MachineSnapshot;
pub use snapshot::SnapshotMachine;
pub use task_storage::FsTaskFolders;

/// A registered scheduled task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub name: String,
    /// Folder path, e.g. `\Microsoft\Windows\EnterpriseMgmt\<guid>\`
    pub path: String,
}

impl ScheduledTask {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Path and name joined, e.g. `\Microsoft\...\<guid>\Schedule #1`
    pub fn full_name(&self) -> String {
        format!("{}\\{}", self.path.trim_end_matches('\\'), self.name)
    }
}

/// A named registry value, rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryValue {
    pub name: String,
    pub data: String,
}

/// A certificate in a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub thumbprint: String,
    pub subject: String,
    pub issuer: String,
}

/// Scheduling service
pub trait TaskScheduler {
    /// Reach the service; a failure here is fatal to a run
    fn connect(&self) -> Result<()>;

    /// Names of the immediate subfolders of `root`, or `None` when `root`
    /// does not exist
    fn list_identifier_folders(&self, root: &str) -> Result<Option<Vec<String>>>;

    fn delete_folder(&self, path: &str) -> Result<()>;

    /// Every task registered on the machine
    fn list_tasks(&self) -> Result<Vec<ScheduledTask>>;

    fn unregister_task(&self, task: &ScheduledTask) -> Result<()>;
}

/// On-disk task storage folders
pub trait TaskFolderStore {
    fn exists(&self, path: &Path) -> bool;

    /// Remove the folder and everything in it
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Registry keys addressed by full path, e.g. `HKLM\SOFTWARE\Microsoft\Enrollments`
pub trait RegistryStore {
    fn key_exists(&self, path: &str) -> Result<bool>;

    /// Names of the immediate child keys
    fn subkeys(&self, path: &str) -> Result<Vec<String>>;

    fn values(&self, path: &str) -> Result<Vec<RegistryValue>>;

    /// Delete the key and its whole subtree
    fn delete_tree(&self, path: &str) -> Result<()>;
}

/// Certificate stores addressed like `LocalMachine\My`
pub trait CertificateStore {
    fn certificates(&self, store: &str) -> Result<Vec<Certificate>>;

    fn delete(&self, store: &str, certificate: &Certificate) -> Result<()>;
}

/// One implementation of every resource domain
#[derive(Clone, Copy)]
pub struct Machine<'a> {
    pub scheduler: &'a dyn TaskScheduler,
    pub task_folders: &'a dyn TaskFolderStore,
    pub registry: &'a dyn RegistryStore,
    pub certificates: &'a dyn CertificateStore,
}

/// Join a registry key path and a child key name
pub fn join_key(base: &str, child: &str) -> String {
    format!("{}\\{}", base.trim_end_matches('\\'), child)
}

/// Strip an optional `Cert:\` drive prefix: `Cert:\LocalMachine\My` -> `LocalMachine\My`
pub fn normalize_store(store: &str) -> &str {
    let trimmed = store.trim_end_matches('\\');
    match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("cert:\\") => &trimmed[6..],
        _ => trimmed,
    }
}
