//! File system errors

use super::MdmError;

/// Creates an IO error without an underlying source
pub fn io_error(message: impl Into<String>) -> MdmError {
    MdmError::IoError {
        message: message.into(),
        source: None,
    }
}
