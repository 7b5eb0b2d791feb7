//! Error types for the thumbnail layout service

use thiserror::Error;

/// Result type for thumbs-service operations
pub type Result<T> = std::result::Result<T, ThumbsError>;

/// Application error types.
///
/// Absence (missing asset, missing manifest, missing blob) is modelled as
/// `Ok(None)` / empty results at the call sites, never as an error variant;
/// these variants cover genuine faults only.
#[derive(Debug, Error)]
pub enum ThumbsError {
    /// Object storage operation failed
    #[error("storage error: {0}")]
    Storage(#[from] blob_store::StorageError),

    /// Database lookup failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Geometry input was rejected before any I/O
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// Manifest (de)serialization failed
    #[error("manifest serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
