//! Registry errors

use super::MdmError;

/// Creates a registry access failure
pub fn access_failed(path: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::RegistryAccessFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a registry delete failure
pub fn delete_failed(path: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::RegistryDeleteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
