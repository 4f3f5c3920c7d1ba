//! Test fixtures and utilities for reducing test setup duplication.
//!
//! [`SnapshotBuilder`] describes an enrolled machine in a few calls, and
//! [`TestEnv`] wires it to in-memory collaborators so a test can build a
//! [`CleanupContext`] with a single line.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{SnapshotBuilder, TestEnv, GUID_A};
//!
//! #[test]
//! fn my_test() {
//!     let env = TestEnv::new(SnapshotBuilder::new().enrollment(GUID_A).build());
//!     let ctx = env.ctx();
//!     // ...
//!     assert_eq!(env.logger.count(Level::Error), 0);
//! }
//! ```

#![allow(clippy::expect_used, dead_code)]

use std::path::PathBuf;

use crate::clock::ManualClock;
use crate::config::Settings;
use crate::domain::EnrollmentId;
use crate::machine::{Certificate, MachineSnapshot, ScheduledTask, SnapshotMachine};
use crate::operations::CleanupContext;
use crate::ui::{MemoryErrorReporter, MemoryLogger};

pub const GUID_A: &str = "3F2504E0-4F89-11D3-9A0C-0305E82C3301";
pub const GUID_B: &str = "6B29FC40-CA47-1067-B31D-00DD010662DA";
pub const MDM_ISSUER: &str = "CN=Microsoft Intune MDM Device CA";

pub const TASK_NAMES: [&str; 3] = [
    "Schedule #1 created by enrollment client",
    "Schedule #2 created by enrollment client",
    "Schedule #3 created by enrollment client",
];

/// Settings pointing task storage at a neutral root
pub fn test_settings() -> Settings {
    Settings {
        task_storage_root: PathBuf::from("/tasks"),
        ..Settings::default()
    }
}

pub fn id(name: &str) -> EnrollmentId {
    EnrollmentId::parse(name).expect("fixture identifier should be a GUID")
}

/// Builds a [`MachineSnapshot`] laid out the way an enrolled device is
pub struct SnapshotBuilder {
    snapshot: MachineSnapshot,
    settings: Settings,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let settings = test_settings();
        let mut snapshot = MachineSnapshot::default();
        snapshot
            .certificates
            .insert(settings.store.clone(), Vec::new());
        Self { snapshot, settings }
    }

    /// The enterprise management root folder, with no enrollments under it
    pub fn task_root(mut self) -> Self {
        self.snapshot
            .scheduler
            .folders
            .insert(self.settings.task_root.clone());
        self
    }

    /// A complete enrollment: scheduler folder with three tasks, both task
    /// storage folders, and the four client component registry keys
    pub fn enrollment(mut self, guid: &str) -> Self {
        self = self.task_root();
        let folder = self.settings.identifier_task_folder(guid);
        self.snapshot.scheduler.folders.insert(folder.clone());
        for name in TASK_NAMES {
            self.snapshot
                .scheduler
                .tasks
                .push(ScheduledTask::new(format!("{folder}\\"), name));
        }
        self = self.storage_folders(guid);
        for component in ["DeviceEnroller", "DMClient", "Poll", "Push"] {
            self = self.registry_key(guid, component, &[("EnrollmentState", "1")]);
        }
        self
    }

    /// Both task storage folders, named `name`
    pub fn storage_folders(mut self, name: &str) -> Self {
        self.snapshot
            .task_storage
            .insert(self.settings.critical_folder(name));
        self.snapshot
            .task_storage
            .insert(self.settings.noncritical_folder(name));
        self
    }

    /// A scheduler folder under the root that is not an enrollment
    pub fn foreign_folder(mut self, name: &str) -> Self {
        self = self.task_root();
        let folder = format!("{}\\{name}", self.settings.task_root);
        self.snapshot.scheduler.folders.insert(folder);
        self
    }

    pub fn registry_key(mut self, guid: &str, child: &str, values: &[(&str, &str)]) -> Self {
        let path = format!("{}\\{guid}\\{child}", self.settings.registry_base);
        let entry = self.snapshot.registry.keys.entry(path).or_default();
        for (name, data) in values {
            entry.insert((*name).to_string(), (*data).to_string());
        }
        self
    }

    pub fn task(mut self, path: &str, name: &str) -> Self {
        self.snapshot
            .scheduler
            .tasks
            .push(ScheduledTask::new(path, name));
        self
    }

    pub fn certificate(mut self, thumbprint: &str, subject: &str, issuer: &str) -> Self {
        self.snapshot
            .certificates
            .entry(self.settings.store.clone())
            .or_default()
            .push(Certificate {
                thumbprint: thumbprint.to_string(),
                subject: subject.to_string(),
                issuer: issuer.to_string(),
            });
        self
    }

    pub fn mdm_certificate(self, guid: &str) -> Self {
        self.certificate(
            &format!("{:0>40}", guid.replace('-', "")),
            &format!("CN={guid}"),
            MDM_ISSUER,
        )
    }

    pub fn fail_task(mut self, guid: &str, name: &str) -> Self {
        let folder = self.settings.identifier_task_folder(guid);
        self.snapshot
            .failures
            .tasks
            .push(format!("{folder}\\{name}"));
        self
    }

    pub fn fail_registry_key(mut self, path: &str) -> Self {
        self.snapshot.failures.registry_keys.push(path.to_string());
        self
    }

    pub fn fail_certificate(mut self, thumbprint: &str) -> Self {
        self.snapshot
            .failures
            .certificates
            .push(thumbprint.to_string());
        self
    }

    pub fn scheduler_unavailable(mut self) -> Self {
        self.snapshot.scheduler.unavailable = true;
        self
    }

    pub fn registry_inaccessible(mut self) -> Self {
        self.snapshot.registry.inaccessible = true;
        self
    }

    pub fn store_unavailable(mut self) -> Self {
        self.snapshot
            .failures
            .unavailable_stores
            .push(self.settings.store.clone());
        self
    }

    pub fn build(self) -> MachineSnapshot {
        self.snapshot
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory machine plus recording collaborators
pub struct TestEnv {
    pub machine: SnapshotMachine,
    pub settings: Settings,
    pub logger: MemoryLogger,
    pub reporter: MemoryErrorReporter,
    pub clock: ManualClock,
}

impl TestEnv {
    pub fn new(snapshot: MachineSnapshot) -> Self {
        Self::with_settings(snapshot, test_settings())
    }

    pub fn with_settings(snapshot: MachineSnapshot, settings: Settings) -> Self {
        Self {
            machine: SnapshotMachine::new(snapshot),
            settings,
            logger: MemoryLogger::new(),
            reporter: MemoryErrorReporter::new(),
            clock: ManualClock::new(),
        }
    }

    pub fn ctx(&self) -> CleanupContext<'_> {
        CleanupContext::new(
            self.machine.machine(),
            &self.settings,
            &self.logger,
            &self.reporter,
            &self.clock,
        )
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        self.machine.snapshot()
    }
}
