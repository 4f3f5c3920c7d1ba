//! Task scheduler and task storage errors

use super::MdmError;

/// Creates a scheduler unavailable error
pub fn unavailable(reason: impl Into<String>) -> MdmError {
    MdmError::SchedulerUnavailable {
        reason: reason.into(),
    }
}

/// Creates a generic scheduler operation failure
pub fn operation_failed(operation: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::SchedulerOperationFailed {
        operation: operation.into(),
        reason: reason.into(),
    }
}

/// Creates a task unregister failure
pub fn unregister_failed(task: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::TaskUnregisterFailed {
        task: task.into(),
        reason: reason.into(),
    }
}

/// Creates a scheduler folder delete failure
pub fn folder_delete_failed(path: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::FolderDeleteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a task storage folder removal failure
pub fn task_folder_remove_failed(path: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::TaskFolderRemoveFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
