//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by object-storage backends.
///
/// `NotFound` is kept separate from `Backend` so callers can treat absence as
/// a legitimate "nothing there yet" signal instead of a fault.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The backend rejected or failed the operation
    #[error("storage backend error during {operation} on {bucket}/{key}: {message}")]
    Backend {
        operation: &'static str,
        bucket: String,
        key: String,
        message: String,
    },

    /// Local file I/O failed while staging an upload
    #[error("local file error: {0}")]
    LocalFile(#[from] std::io::Error),
}

impl StorageError {
    pub fn backend(
        operation: &'static str,
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        StorageError::Backend {
            operation,
            bucket: bucket.into(),
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// True if this error represents a missing object rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
