//! Run settings
//!
//! Resolution order, highest first: command-line flag, environment variable
//! (handled by clap), YAML settings file, built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config_parse_failed, config_read_failed, invalid_settings};

/// Scheduler folder holding one subfolder per enrollment
pub const DEFAULT_TASK_ROOT: &str = "\\Microsoft\\Windows\\EnterpriseMgmt";

/// On-disk task storage; the two enrollment folders live under it
pub const DEFAULT_TASK_STORAGE_ROOT: &str = "C:\\Windows\\System32\\Tasks\\Microsoft\\Windows";

pub const DEFAULT_REGISTRY_BASE: &str = "HKLM\\SOFTWARE\\Microsoft\\Enrollments";

pub const DEFAULT_STORE: &str = "LocalMachine\\My";

pub const DEFAULT_ISSUER: &str = "CN=Microsoft Intune MDM Device CA";

/// Child keys of an enrollment subtree that belong to the MDM client
pub const CLIENT_COMPONENT_KEYS: [&str; 4] = ["DeviceEnroller", "DMClient", "Poll", "Push"];

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    pub task_root: String,
    pub task_storage_root: PathBuf,
    pub registry_base: String,
    pub store: String,
    pub issuer: String,
    /// How long the certificate probe keeps polling, in seconds
    pub timeout_secs: u64,
    /// Certificate probe poll interval, in seconds
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            task_root: DEFAULT_TASK_ROOT.to_string(),
            task_storage_root: PathBuf::from(DEFAULT_TASK_STORAGE_ROOT),
            registry_base: DEFAULT_REGISTRY_BASE.to_string(),
            store: DEFAULT_STORE.to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            timeout_secs: 0,
            poll_interval_secs: 1,
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub store: Option<String>,
    pub issuer: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings from an optional YAML file and apply overrides.
    pub fn resolve(config_file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let base = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let settings = base.with_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&content)
            .map_err(|e| config_parse_failed(path.display().to_string(), e.to_string()))
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(store) = &overrides.store {
            self.store.clone_from(store);
        }
        if let Some(issuer) = &overrides.issuer {
            self.issuer.clone_from(issuer);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("task_root", self.task_root.as_str()),
            ("registry_base", self.registry_base.as_str()),
            ("store", self.store.as_str()),
            ("issuer", self.issuer.as_str()),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(invalid_settings(format!("{name} must not be empty")));
            }
        }
        if self.task_storage_root.as_os_str().is_empty() {
            return Err(invalid_settings("task_storage_root must not be empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid_settings("poll_interval_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Task storage folder for the critical enterprise management jobs
    pub fn critical_folder(&self, identifier: &str) -> PathBuf {
        self.task_storage_root.join("EnterpriseMgmt").join(identifier)
    }

    /// Task storage folder for the non-critical enterprise management jobs
    pub fn noncritical_folder(&self, identifier: &str) -> PathBuf {
        self.task_storage_root
            .join("EnterpriseMgmtNoncritical")
            .join(identifier)
    }

    /// Scheduler folder path for one enrollment
    pub fn identifier_task_folder(&self, identifier: &str) -> String {
        format!("{}\\{}", self.task_root.trim_end_matches('\\'), identifier)
    }
}
