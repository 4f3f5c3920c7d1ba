//! Error types and handling for mdm-cleanup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by resource domain:
//! - [`scheduler`]: Task scheduler and task storage errors
//! - [`registry`]: Registry errors
//! - [`certificate`]: Certificate store errors
//! - [`config`]: Settings and snapshot file errors
//! - [`fs`]: File system errors
//!
//! Absence of a resource (a missing task folder, registry key or certificate) is
//! never an error; only connectivity failures and per-item removal failures are.

pub mod certificate;
pub mod config;
pub mod fs;
pub mod registry;
pub mod scheduler;


pub use certificate::{
    delete_failed as certificate_delete_failed, store_unavailable as certificate_store_unavailable,
};
pub use config::{
    invalid as invalid_settings, parse_failed as config_parse_failed,
    read_failed as config_read_failed,
};
pub use fs::io_error;
pub use registry::{access_failed as registry_access_failed, delete_failed as registry_delete_failed};
pub use scheduler::{
    folder_delete_failed, operation_failed as scheduler_operation_failed, task_folder_remove_failed,
    unavailable as scheduler_unavailable, unregister_failed as task_unregister_failed,
};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mdm-cleanup operations
#[derive(Error, Diagnostic, Debug)]
pub enum MdmError {
    // Task scheduler errors
    #[error("Task scheduler service is unavailable: {reason}")]
    #[diagnostic(
        code(mdm_cleanup::scheduler::unavailable),
        help("Run from an elevated prompt and check that the Schedule service is running")
    )]
    SchedulerUnavailable { reason: String },

    #[error("Task scheduler operation '{operation}' failed: {reason}")]
    #[diagnostic(code(mdm_cleanup::scheduler::operation_failed))]
    SchedulerOperationFailed { operation: String, reason: String },

    #[error("Failed to unregister task '{task}': {reason}")]
    #[diagnostic(code(mdm_cleanup::scheduler::unregister_failed))]
    TaskUnregisterFailed { task: String, reason: String },

    #[error("Failed to delete task folder '{path}': {reason}")]
    #[diagnostic(code(mdm_cleanup::scheduler::folder_delete_failed))]
    FolderDeleteFailed { path: String, reason: String },

    #[error("Failed to remove task storage folder '{path}': {reason}")]
    #[diagnostic(
        code(mdm_cleanup::scheduler::storage_remove_failed),
        help("Task storage folders are owned by SYSTEM; run elevated")
    )]
    TaskFolderRemoveFailed { path: String, reason: String },

    // Registry errors
    #[error("Cannot access registry key '{path}': {reason}")]
    #[diagnostic(
        code(mdm_cleanup::registry::access_failed),
        help("Run from an elevated prompt so HKLM is writable")
    )]
    RegistryAccessFailed { path: String, reason: String },

    #[error("Failed to delete registry key '{path}': {reason}")]
    #[diagnostic(code(mdm_cleanup::registry::delete_failed))]
    RegistryDeleteFailed { path: String, reason: String },

    // Certificate errors
    #[error("Cannot open certificate store '{store}': {reason}")]
    #[diagnostic(
        code(mdm_cleanup::certificate::store_unavailable),
        help("Valid store paths look like LocalMachine\\My or CurrentUser\\My")
    )]
    CertificateStoreUnavailable { store: String, reason: String },

    #[error("Failed to delete certificate '{subject}' ({thumbprint}): {reason}")]
    #[diagnostic(code(mdm_cleanup::certificate::delete_failed))]
    CertificateDeleteFailed {
        subject: String,
        thumbprint: String,
        reason: String,
    },

    // Identifier errors
    #[error("Invalid enrollment identifier: {value}")]
    #[diagnostic(
        code(mdm_cleanup::identifier::invalid),
        help("Enrollment identifiers are GUIDs such as 3F2504E0-4F89-11D3-9A0C-0305E82C3301")
    )]
    InvalidIdentifier { value: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(mdm_cleanup::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(mdm_cleanup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid settings: {message}")]
    #[diagnostic(code(mdm_cleanup::config::invalid))]
    InvalidSettings { message: String },

    // Snapshot errors
    #[error("Failed to load machine snapshot '{path}': {reason}")]
    #[diagnostic(
        code(mdm_cleanup::snapshot::load_failed),
        help("Snapshots are YAML or JSON files describing tasks, registry keys and certificates")
    )]
    SnapshotLoadFailed { path: String, reason: String },

    #[error("Failed to save machine snapshot '{path}': {reason}")]
    #[diagnostic(code(mdm_cleanup::snapshot::save_failed))]
    SnapshotSaveFailed { path: String, reason: String },

    // Backend errors
    #[error("No system backend is available on this platform")]
    #[diagnostic(
        code(mdm_cleanup::backend::unavailable),
        help("Run on Windows, or pass --snapshot <file> to work against a machine snapshot")
    )]
    BackendUnavailable,

    // Output errors
    #[error("Failed to render JSON output: {reason}")]
    #[diagnostic(code(mdm_cleanup::output::json_failed))]
    JsonOutputFailed { reason: String },

    // Run errors
    #[error("Cleanup incomplete: {failed} enrollment(s) failed, {errors} run error(s)")]
    #[diagnostic(
        code(mdm_cleanup::cleanup::incomplete),
        help("Re-run with --verbose for details; removal is safe to repeat")
    )]
    CleanupIncomplete { failed: usize, errors: usize },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(mdm_cleanup::fs::io_error))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MdmError {
    /// Whether this error means a whole resource domain could not be reached,
    /// as opposed to a single item failing.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            MdmError::SchedulerUnavailable { .. }
                | MdmError::RegistryAccessFailed { .. }
                | MdmError::CertificateStoreUnavailable { .. }
                | MdmError::BackendUnavailable
        )
    }
}

impl From<std::io::Error> for MdmError {
    fn from(err: std::io::Error) -> Self {
        MdmError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for MdmError {
    fn from(err: serde_yaml::Error) -> Self {
        MdmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

// serde_json only renders command output; snapshot files map their own errors
impl From<serde_json::Error> for MdmError {
    fn from(err: serde_json::Error) -> Self {
        MdmError::JsonOutputFailed {
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for MdmError {
    fn from(err: inquire::InquireError) -> Self {
        MdmError::IoError {
            message: format!("Failed to read confirmation: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, MdmError>;
