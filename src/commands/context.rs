//! Shared setup for commands
//!
//! Every command opens a [`Session`]: settings resolved from the config file
//! and overrides, a backend (snapshot file or the live system), and the
//! console collaborators the operations report through.

use std::path::{Path, PathBuf};

use crate::clock::SystemClock;
use crate::config::{Settings, SettingsOverrides};
use crate::error::Result;
use crate::machine::{FsTaskFolders, Machine, PowerShellMachine, SnapshotMachine, ensure_supported_host};
use crate::operations::CleanupContext;
use crate::ui::{ConsoleErrorReporter, ConsoleLogger, Verbosity};

/// Global options every command receives
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub snapshot: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub verbosity: Verbosity,
}

/// Where the resource domains live
pub enum Backend {
    Snapshot {
        machine: SnapshotMachine,
        path: PathBuf,
    },
    System {
        shell: PowerShellMachine,
        task_folders: FsTaskFolders,
    },
}

impl Backend {
    /// A snapshot when a path is given, otherwise the live system
    pub fn open(snapshot: Option<&Path>) -> Result<Self> {
        match snapshot {
            Some(path) => Ok(Backend::Snapshot {
                machine: SnapshotMachine::load(path)?,
                path: path.to_path_buf(),
            }),
            None => {
                ensure_supported_host()?;
                Ok(Backend::System {
                    shell: PowerShellMachine::new(),
                    task_folders: FsTaskFolders,
                })
            }
        }
    }

    pub fn machine(&self) -> Machine<'_> {
        match self {
            Backend::Snapshot { machine, .. } => machine.machine(),
            Backend::System {
                shell,
                task_folders,
            } => Machine {
                scheduler: shell,
                task_folders,
                registry: shell,
                certificates: shell,
            },
        }
    }

    /// Write a snapshot back to its file; the live system needs nothing
    pub fn persist(&self) -> Result<()> {
        match self {
            Backend::Snapshot { machine, path } => machine.save(path),
            Backend::System { .. } => Ok(()),
        }
    }
}

/// Everything one command invocation works with
pub struct Session {
    pub settings: Settings,
    pub backend: Backend,
    pub logger: ConsoleLogger,
    pub reporter: ConsoleErrorReporter,
    clock: SystemClock,
}

impl Session {
    pub fn open(options: &GlobalOptions, overrides: &SettingsOverrides) -> Result<Self> {
        Self::open_with_logger(options, overrides, ConsoleLogger::new(options.verbosity))
    }

    /// Same as [`Session::open`], but logs go to stderr only
    pub fn open_for_json(options: &GlobalOptions, overrides: &SettingsOverrides) -> Result<Self> {
        Self::open_with_logger(options, overrides, ConsoleLogger::stderr(options.verbosity))
    }

    fn open_with_logger(
        options: &GlobalOptions,
        overrides: &SettingsOverrides,
        logger: ConsoleLogger,
    ) -> Result<Self> {
        let settings = Settings::resolve(options.config.as_deref(), overrides)?;
        let backend = Backend::open(options.snapshot.as_deref())?;
        Ok(Self {
            settings,
            backend,
            logger,
            reporter: ConsoleErrorReporter::new(options.verbosity == Verbosity::Verbose),
            clock: SystemClock,
        })
    }

    pub fn ctx(&self) -> CleanupContext<'_> {
        CleanupContext::new(
            self.backend.machine(),
            &self.settings,
            &self.logger,
            &self.reporter,
            &self.clock,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdmError;

    #[test]
    fn test_snapshot_backend_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("machine.yaml");
        std::fs::write(
            &path,
            "scheduler:\n  folders:\n    - \\Microsoft\\Windows\\EnterpriseMgmt\n",
        )
        .unwrap();

        let backend = Backend::open(Some(&path)).unwrap();
        let folders = backend
            .machine()
            .scheduler
            .list_identifier_folders("\\Microsoft\\Windows\\EnterpriseMgmt")
            .unwrap();
        assert_eq!(folders, Some(Vec::new()));
        backend.persist().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("EnterpriseMgmt"));
    }

    #[test]
    fn test_missing_snapshot_file() {
        let err = Backend::open(Some(Path::new("/nonexistent/machine.yaml")))
            .err()
            .unwrap();
        assert!(matches!(err, MdmError::SnapshotLoadFailed { .. }));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_system_backend_needs_windows() {
        let err = Backend::open(None).err().unwrap();
        assert!(matches!(err, MdmError::BackendUnavailable));
    }

    #[test]
    fn test_session_applies_overrides() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("machine.yaml");
        std::fs::write(&path, "{}\n").unwrap();

        let options = GlobalOptions {
            snapshot: Some(path),
            ..GlobalOptions::default()
        };
        let overrides = SettingsOverrides {
            timeout_secs: Some(9),
            ..SettingsOverrides::default()
        };
        let session = Session::open(&options, &overrides).unwrap();
        assert_eq!(session.settings.timeout_secs, 9);
        assert_eq!(session.ctx().settings.timeout_secs, 9);
    }
}
