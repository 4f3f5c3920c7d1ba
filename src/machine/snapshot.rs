//! In-memory machine backed by a snapshot file
//!
//! A [`MachineSnapshot`] describes scheduled tasks, task storage folders,
//! registry keys and certificate stores. [`SnapshotMachine`] implements every
//! resource domain on top of it and behaves like the live services do: paths
//! compare case-insensitively, deleting something that is not there fails, and
//! a scheduler folder that still holds tasks cannot be deleted.
//!
//! Failures can be injected per item (or per domain) through [`FailureInjection`].

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    Certificate, CertificateStore, Machine, RegistryStore, RegistryValue, ScheduledTask,
    TaskFolderStore, TaskScheduler, normalize_store,
};
use crate::error::{
    MdmError, Result, certificate_delete_failed, certificate_store_unavailable,
    folder_delete_failed, registry_access_failed, registry_delete_failed, scheduler_unavailable,
    task_folder_remove_failed, task_unregister_failed,
};

/// Scheduling service state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSnapshot {
    /// The service cannot be reached at all
    pub unavailable: bool,
    /// Folder paths; parents of tasks exist implicitly
    pub folders: BTreeSet<String>,
    pub tasks: Vec<ScheduledTask>,
}

/// Registry state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySnapshot {
    /// Every registry call fails with an access error
    pub inaccessible: bool,
    /// Full key path to its values; parents of listed keys exist implicitly
    pub keys: BTreeMap<String, BTreeMap<String, String>>,
}

/// Items whose deletion fails, and stores that cannot be opened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureInjection {
    /// Full task names (`path\name`)
    pub tasks: Vec<String>,
    pub scheduler_folders: Vec<String>,
    pub task_storage: Vec<PathBuf>,
    pub registry_keys: Vec<String>,
    /// Certificate thumbprints
    pub certificates: Vec<String>,
    pub unavailable_stores: Vec<String>,
}

/// Whole-machine state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSnapshot {
    pub scheduler: SchedulerSnapshot,
    pub task_storage: BTreeSet<PathBuf>,
    pub registry: RegistrySnapshot,
    /// Store path (`LocalMachine\My`) to its certificates
    pub certificates: BTreeMap<String, Vec<Certificate>>,
    pub failures: FailureInjection,
}

impl MachineSnapshot {
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn trim_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('\\');
    if trimmed.is_empty() { "\\" } else { trimmed }
}

/// Remainder of `path` below `parent`, compared case-insensitively
fn below<'p>(path: &'p str, parent: &str) -> Option<&'p str> {
    let path = trim_path(path);
    let parent = trim_path(parent);
    let rest = if parent == "\\" {
        path.strip_prefix('\\')?
    } else {
        let head = path.get(..parent.len())?;
        if !head.eq_ignore_ascii_case(parent) {
            return None;
        }
        path.get(parent.len()..)?.strip_prefix('\\')?
    };
    (!rest.is_empty()).then_some(rest)
}

fn same_path(a: &str, b: &str) -> bool {
    trim_path(a).eq_ignore_ascii_case(trim_path(b))
}

fn at_or_below(path: &str, parent: &str) -> bool {
    same_path(path, parent) || below(path, parent).is_some()
}

/// Snapshot-backed implementation of every resource domain
#[derive(Debug, Default)]
pub struct SnapshotMachine {
    state: RefCell<MachineSnapshot>,
}

impl SnapshotMachine {
    pub fn new(snapshot: MachineSnapshot) -> Self {
        Self {
            state: RefCell::new(snapshot),
        }
    }

    /// Load a `.json` file as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        let load_failed = |reason: String| MdmError::SnapshotLoadFailed {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let snapshot = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| load_failed(e.to_string()))?
        } else {
            MachineSnapshot::from_yaml(&content).map_err(|e| load_failed(e.to_string()))?
        };
        Ok(Self::new(snapshot))
    }

    /// Write the current state back, in the format the file name implies
    pub fn save(&self, path: &Path) -> Result<()> {
        let save_failed = |reason: String| MdmError::SnapshotSaveFailed {
            path: path.display().to_string(),
            reason,
        };
        let state = self.state.borrow();
        let content = if is_json(path) {
            serde_json::to_string_pretty(&*state).map_err(|e| save_failed(e.to_string()))?
        } else {
            state.to_yaml().map_err(|e| save_failed(e.to_string()))?
        };
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> MachineSnapshot {
        self.state.borrow().clone()
    }

    pub fn machine(&self) -> Machine<'_> {
        Machine {
            scheduler: self,
            task_folders: self,
            registry: self,
            certificates: self,
        }
    }

    fn scheduler_ready(&self) -> Result<()> {
        if self.state.borrow().scheduler.unavailable {
            return Err(scheduler_unavailable("the Schedule service is not running"));
        }
        Ok(())
    }

    fn scheduler_folder_exists(state: &MachineSnapshot, path: &str) -> bool {
        trim_path(path) == "\\"
            || state
                .scheduler
                .folders
                .iter()
                .any(|folder| at_or_below(folder, path))
            || state
                .scheduler
                .tasks
                .iter()
                .any(|task| at_or_below(&task.path, path))
    }

    fn registry_ready(&self, path: &str) -> Result<()> {
        if self.state.borrow().registry.inaccessible {
            return Err(registry_access_failed(path, "access is denied"));
        }
        Ok(())
    }

    fn registry_key_exists(state: &MachineSnapshot, path: &str) -> bool {
        state.registry.keys.keys().any(|key| at_or_below(key, path))
    }

    fn store_key(state: &MachineSnapshot, store: &str) -> Result<String> {
        let wanted = normalize_store(store);
        if state
            .failures
            .unavailable_stores
            .iter()
            .any(|s| normalize_store(s).eq_ignore_ascii_case(wanted))
        {
            return Err(certificate_store_unavailable(store, "access is denied"));
        }
        state
            .certificates
            .keys()
            .find(|key| normalize_store(key).eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| certificate_store_unavailable(store, "store does not exist"))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl TaskScheduler for SnapshotMachine {
    fn connect(&self) -> Result<()> {
        self.scheduler_ready()
    }

    fn list_identifier_folders(&self, root: &str) -> Result<Option<Vec<String>>> {
        self.scheduler_ready()?;
        let state = self.state.borrow();
        if !Self::scheduler_folder_exists(&state, root) {
            return Ok(None);
        }

        let candidates = state
            .scheduler
            .folders
            .iter()
            .map(String::as_str)
            .chain(state.scheduler.tasks.iter().map(|t| t.path.as_str()));

        let mut names: Vec<String> = Vec::new();
        for path in candidates {
            let Some(rest) = below(path, root) else {
                continue;
            };
            let child = rest.split('\\').next().unwrap_or_default();
            if !child.is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(child)) {
                names.push(child.to_string());
            }
        }
        names.sort();
        Ok(Some(names))
    }

    fn delete_folder(&self, path: &str) -> Result<()> {
        self.scheduler_ready()?;
        let mut state = self.state.borrow_mut();
        if state
            .failures
            .scheduler_folders
            .iter()
            .any(|f| same_path(f, path))
        {
            return Err(folder_delete_failed(path, "access is denied"));
        }
        if !Self::scheduler_folder_exists(&state, path) {
            return Err(folder_delete_failed(path, "the system cannot find the file specified"));
        }
        if state
            .scheduler
            .tasks
            .iter()
            .any(|task| at_or_below(&task.path, path))
        {
            return Err(folder_delete_failed(path, "the folder is not empty"));
        }
        state
            .scheduler
            .folders
            .retain(|folder| !at_or_below(folder, path));
        Ok(())
    }

    fn list_tasks(&self) -> Result<Vec<ScheduledTask>> {
        self.scheduler_ready()?;
        Ok(self.state.borrow().scheduler.tasks.clone())
    }

    fn unregister_task(&self, task: &ScheduledTask) -> Result<()> {
        self.scheduler_ready()?;
        let full_name = task.full_name();
        let mut state = self.state.borrow_mut();
        if state
            .failures
            .tasks
            .iter()
            .any(|t| same_path(t, &full_name))
        {
            return Err(task_unregister_failed(full_name, "access is denied"));
        }
        let position = state
            .scheduler
            .tasks
            .iter()
            .position(|t| same_path(&t.path, &task.path) && t.name.eq_ignore_ascii_case(&task.name));
        match position {
            Some(index) => {
                let folder = trim_path(&task.path).to_string();
                state.scheduler.folders.insert(folder);
                state.scheduler.tasks.remove(index);
                Ok(())
            }
            None => Err(task_unregister_failed(full_name, "the task does not exist")),
        }
    }
}

impl TaskFolderStore for SnapshotMachine {
    fn exists(&self, path: &Path) -> bool {
        self.state
            .borrow()
            .task_storage
            .iter()
            .any(|folder| folder.starts_with(path))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let display = path.display().to_string();
        if self
            .state
            .borrow()
            .failures
            .task_storage
            .iter()
            .any(|p| p == path)
        {
            return Err(task_folder_remove_failed(display, "access is denied"));
        }
        if !self.exists(path) {
            return Err(task_folder_remove_failed(display, "folder does not exist"));
        }
        self.state
            .borrow_mut()
            .task_storage
            .retain(|folder| !folder.starts_with(path));
        Ok(())
    }
}

impl RegistryStore for SnapshotMachine {
    fn key_exists(&self, path: &str) -> Result<bool> {
        self.registry_ready(path)?;
        Ok(Self::registry_key_exists(&self.state.borrow(), path))
    }

    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        self.registry_ready(path)?;
        let state = self.state.borrow();
        if !Self::registry_key_exists(&state, path) {
            return Err(registry_access_failed(path, "key does not exist"));
        }
        let mut names: Vec<String> = Vec::new();
        for key in state.registry.keys.keys() {
            let Some(rest) = below(key, path) else {
                continue;
            };
            let child = rest.split('\\').next().unwrap_or_default();
            if !child.is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(child)) {
                names.push(child.to_string());
            }
        }
        Ok(names)
    }

    fn values(&self, path: &str) -> Result<Vec<RegistryValue>> {
        self.registry_ready(path)?;
        let state = self.state.borrow();
        if !Self::registry_key_exists(&state, path) {
            return Err(registry_access_failed(path, "key does not exist"));
        }
        Ok(state
            .registry
            .keys
            .iter()
            .find(|(key, _)| same_path(key, path))
            .map(|(_, values)| {
                values
                    .iter()
                    .map(|(name, data)| RegistryValue {
                        name: name.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn delete_tree(&self, path: &str) -> Result<()> {
        self.registry_ready(path)?;
        let mut state = self.state.borrow_mut();
        if state
            .failures
            .registry_keys
            .iter()
            .any(|k| same_path(k, path))
        {
            return Err(registry_delete_failed(path, "access is denied"));
        }
        if !Self::registry_key_exists(&state, path) {
            return Err(registry_delete_failed(path, "key does not exist"));
        }
        state.registry.keys.retain(|key, _| !at_or_below(key, path));
        Ok(())
    }
}

impl CertificateStore for SnapshotMachine {
    fn certificates(&self, store: &str) -> Result<Vec<Certificate>> {
        let state = self.state.borrow();
        let key = Self::store_key(&state, store)?;
        Ok(state.certificates.get(&key).cloned().unwrap_or_default())
    }

    fn delete(&self, store: &str, certificate: &Certificate) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let key = Self::store_key(&state, store)?;
        if state
            .failures
            .certificates
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&certificate.thumbprint))
        {
            return Err(certificate_delete_failed(
                &certificate.subject,
                &certificate.thumbprint,
                "the private key is in use",
            ));
        }
        let certificates = state.certificates.entry(key).or_default();
        let before = certificates.len();
        certificates.retain(|c| !c.thumbprint.eq_ignore_ascii_case(&certificate.thumbprint));
        if certificates.len() == before {
            return Err(certificate_delete_failed(
                &certificate.subject,
                &certificate.thumbprint,
                "certificate not found",
            ));
        }
        Ok(())
    }
}
