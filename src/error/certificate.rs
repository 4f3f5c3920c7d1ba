//! Certificate store errors

use super::MdmError;

/// Creates a certificate store unavailable error
pub fn store_unavailable(store: impl Into<String>, reason: impl Into<String>) -> MdmError {
    MdmError::CertificateStoreUnavailable {
        store: store.into(),
        reason: reason.into(),
    }
}

/// Creates a certificate delete failure
pub fn delete_failed(
    subject: impl Into<String>,
    thumbprint: impl Into<String>,
    reason: impl Into<String>,
) -> MdmError {
    MdmError::CertificateDeleteFailed {
        subject: subject.into(),
        thumbprint: thumbprint.into(),
        reason: reason.into(),
    }
}
