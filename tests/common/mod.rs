//! Common test utilities for mdm-cleanup integration tests
//!
//! A [`TestMachine`] is a temporary directory holding a machine snapshot and a
//! settings file; every command built from it runs against that snapshot.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use serde_yaml::{Mapping, Value};
use tempfile::TempDir;

pub const GUID_A: &str = "3F2504E0-4F89-11D3-9A0C-0305E82C3301";
pub const GUID_B: &str = "6B29FC40-CA47-1067-B31D-00DD010662DA";
pub const MDM_ISSUER: &str = "CN=Microsoft Intune MDM Device CA";
pub const TASK_ROOT: &str = "\\Microsoft\\Windows\\EnterpriseMgmt";
pub const REGISTRY_BASE: &str = "HKLM\\SOFTWARE\\Microsoft\\Enrollments";

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn mdm_cleanup_cmd() -> Command {
    Command::cargo_bin("mdm-cleanup").expect("binary should be built")
}

/// A snapshot file and settings file in a temporary directory
pub struct TestMachine {
    pub temp: TempDir,
    pub snapshot: PathBuf,
    pub config: PathBuf,
}

impl TestMachine {
    /// An empty machine: the task root exists, the certificate store is empty
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let snapshot = temp.path().join("machine.yaml");
        let config = temp.path().join("settings.yaml");
        std::fs::write(&config, "task_storage_root: /tasks\n").expect("Failed to write settings");

        let machine = Self {
            temp,
            snapshot,
            config,
        };
        machine.write(&format!(
            "scheduler:\n  folders:\n    - '{TASK_ROOT}'\ncertificates:\n  'LocalMachine\\My': []\n"
        ));
        machine
    }

    /// A machine with a full enrollment per GUID and one MDM certificate each
    pub fn enrolled(guids: &[&str]) -> Self {
        let machine = Self::new();
        let mut yaml = String::new();

        yaml.push_str(&format!("scheduler:\n  folders:\n    - '{TASK_ROOT}'\n"));
        for guid in guids {
            yaml.push_str(&format!("    - '{TASK_ROOT}\\{guid}'\n"));
        }
        yaml.push_str("  tasks:\n");
        for guid in guids {
            for n in 1..=3 {
                yaml.push_str(&format!(
                    "    - name: 'Schedule #{n} created by enrollment client'\n      path: '{TASK_ROOT}\\{guid}\\'\n"
                ));
            }
        }

        yaml.push_str("task_storage:\n");
        for guid in guids {
            yaml.push_str(&format!("  - /tasks/EnterpriseMgmt/{guid}\n"));
            yaml.push_str(&format!("  - /tasks/EnterpriseMgmtNoncritical/{guid}\n"));
        }

        yaml.push_str("registry:\n  keys:\n");
        for guid in guids {
            for component in ["DeviceEnroller", "DMClient", "Poll", "Push"] {
                yaml.push_str(&format!(
                    "    '{REGISTRY_BASE}\\{guid}\\{component}':\n      EnrollmentState: '1'\n"
                ));
            }
        }

        yaml.push_str("certificates:\n  'LocalMachine\\My':\n");
        for (i, guid) in guids.iter().enumerate() {
            yaml.push_str(&format!(
                "    - thumbprint: '{i:040}'\n      subject: 'CN={guid}'\n      issuer: '{MDM_ISSUER}'\n"
            ));
        }
        yaml.push_str(
            "    - thumbprint: 'CC'\n      subject: 'CN=web'\n      issuer: 'CN=Some Other CA'\n",
        );

        machine.write(&yaml);
        machine
    }

    /// Replace the snapshot file contents
    pub fn write(&self, yaml: &str) {
        std::fs::write(&self.snapshot, yaml).expect("Failed to write snapshot");
    }

    /// Parse the snapshot file as it is now
    pub fn read(&self) -> Value {
        let content = std::fs::read_to_string(&self.snapshot).expect("Failed to read snapshot");
        serde_yaml::from_str(&content).expect("Snapshot should be valid YAML")
    }

    /// Edit the parsed snapshot and write it back
    pub fn update(&self, edit: impl FnOnce(&mut Mapping)) {
        let mut value = self.read();
        let map = value.as_mapping_mut().expect("Snapshot should be a mapping");
        edit(map);
        self.write(&serde_yaml::to_string(&value).expect("Snapshot should serialize"));
    }

    pub fn task_count(&self) -> usize {
        self.read()["scheduler"]["tasks"]
            .as_sequence()
            .map_or(0, Vec::len)
    }

    pub fn registry_key_count(&self) -> usize {
        self.read()["registry"]["keys"]
            .as_mapping()
            .map_or(0, Mapping::len)
    }

    pub fn certificate_issuers(&self) -> Vec<String> {
        self.read()["certificates"]["LocalMachine\\My"]
            .as_sequence()
            .map(|certs| {
                certs
                    .iter()
                    .filter_map(|c| c["issuer"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Command running against this machine
    pub fn cmd(&self) -> Command {
        let mut cmd = mdm_cleanup_cmd();
        cmd.arg("--snapshot")
            .arg(&self.snapshot)
            .arg("--config")
            .arg(&self.config)
            .env_remove("MDM_CLEANUP_STORE")
            .env_remove("MDM_CLEANUP_ISSUER")
            .env_remove("MDM_CLEANUP_TIMEOUT");
        cmd
    }
}

impl Default for TestMachine {
    fn default() -> Self {
        Self::new()
    }
}
