//! Error types module
//!
//! `StoreError` is the complete failure taxonomy of the image store. Storage and
//! processing crates have their own low-level error types; those are translated
//! into `StoreError` at the store façade so that no raw I/O or codec error ever
//! reaches a caller.

use crate::models::SizeLabel;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// Transport layers map these onto their own status codes and bodies.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("No file provided")]
    MissingFile,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {message} ({removed} file(s) removed)")]
    StorageUnavailable { message: String, removed: usize },

    #[error(
        "Upload of {filename} stopped at size {failed} after {} variant(s) were written: {reason}",
        .written.len()
    )]
    PartialUploadFailure {
        filename: String,
        written: Vec<SizeLabel>,
        failed: SizeLabel,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Storage failure that removed nothing.
    pub fn storage(message: impl Into<String>) -> Self {
        StoreError::StorageUnavailable {
            message: message.into(),
            removed: 0,
        }
    }

    /// Name of the failure kind, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::InvalidResource(_) => "InvalidResource",
            StoreError::MissingFile => "MissingFile",
            StoreError::InvalidImage(_) => "InvalidImage",
            StoreError::InvalidCrop(_) => "InvalidCrop",
            StoreError::NotFound(_) => "NotFound",
            StoreError::StorageUnavailable { .. } => "StorageUnavailable",
            StoreError::PartialUploadFailure { .. } => "PartialUploadFailure",
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, log_level).
fn store_error_static_metadata(
    err: &StoreError,
) -> (u16, &'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        StoreError::InvalidResource(_) => (
            404,
            "INVALID_RESOURCE",
            false,
            Some("Check the resource type and id"),
            LogLevel::Debug,
        ),
        StoreError::MissingFile => (
            422,
            "MISSING_FILE",
            false,
            Some("Attach an image in the 'file' field"),
            LogLevel::Debug,
        ),
        StoreError::InvalidImage(_) => (
            422,
            "INVALID_IMAGE",
            false,
            Some("Check image format and try a different file"),
            LogLevel::Debug,
        ),
        StoreError::InvalidCrop(_) => (
            422,
            "INVALID_CROP",
            false,
            Some("Use crop offsets that intersect the image"),
            LogLevel::Debug,
        ),
        StoreError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource and filename exist"),
            LogLevel::Debug,
        ),
        StoreError::StorageUnavailable { .. } => (
            503,
            "STORAGE_UNAVAILABLE",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        StoreError::PartialUploadFailure { .. } => (
            500,
            "PARTIAL_UPLOAD_FAILURE",
            true,
            Some("Upload the same file again to regenerate all sizes"),
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for StoreError {
    fn http_status_code(&self) -> u16 {
        store_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        store_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        store_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        store_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        store_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            StoreError::StorageUnavailable { removed, .. } if *removed > 0 => format!(
                "Storage is unavailable; {} file(s) were removed before the failure",
                removed
            ),
            StoreError::StorageUnavailable { .. } => "Storage is unavailable".to_string(),
            StoreError::PartialUploadFailure {
                filename, failed, ..
            } => format!(
                "Original {} was stored but generating size {} failed",
                filename, failed
            ),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_invalid_resource() {
        let err = StoreError::InvalidResource("unknown_type".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "INVALID_RESOURCE");
        assert!(!err.is_recoverable());
        assert_eq!(err.kind(), "InvalidResource");
        assert!(err.client_message().contains("unknown_type"));
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_storage_unavailable() {
        let err = StoreError::storage("permission denied");
        assert_eq!(err.http_status_code(), 503);
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Storage is unavailable");
        assert_eq!(err.log_level(), LogLevel::Error);

        let err = StoreError::StorageUnavailable {
            message: "permission denied".to_string(),
            removed: 2,
        };
        assert!(err.client_message().contains("2 file(s)"));
    }

    #[test]
    fn test_partial_upload_failure_message() {
        let err = StoreError::PartialUploadFailure {
            filename: "cat.jpeg".to_string(),
            written: vec![SizeLabel::new(500, 400)],
            failed: SizeLabel::new(400, 300),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.kind(), "PartialUploadFailure");
        assert_eq!(err.http_status_code(), 500);
        let message = err.to_string();
        assert!(message.contains("400x300"));
        assert!(message.contains("1 variant(s)"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn test_client_errors_are_unprocessable() {
        for err in [
            StoreError::MissingFile,
            StoreError::InvalidImage("truncated".to_string()),
            StoreError::InvalidCrop("+900+0".to_string()),
        ] {
            assert_eq!(err.http_status_code(), 422);
            assert!(!err.is_recoverable());
        }
    }
}
