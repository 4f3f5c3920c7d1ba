//! Configuration errors

use super::MdmError;

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid settings error
pub fn invalid(message: impl Into<String>) -> MdmError {
    MdmError::InvalidSettings {
        message: message.into(),
    }
}
