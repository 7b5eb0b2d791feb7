//! Object storage abstraction for S3-compatible backends
//!
//! Exposes a narrow read/write/copy/delete/list trait so that services can be
//! tested against in-memory implementations and deployed against S3 or any
//! S3-compatible endpoint (e.g., MinIO).

pub mod error;
pub mod location;
pub mod s3;

pub use error::{StorageError, StorageResult};
pub use location::ObjectLocation;
pub use s3::S3ObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Narrow object-storage contract consumed by services.
///
/// "Not found" is reported distinctly from other failures: reads return
/// `Ok(None)` for absent objects, and only genuine storage faults surface as
/// `Err`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all object keys under a prefix.
    async fn list(&self, root: &ObjectLocation) -> StorageResult<Vec<String>>;

    /// Fetch an object's bytes, or `None` if it does not exist.
    async fn get(&self, location: &ObjectLocation) -> StorageResult<Option<Bytes>>;

    /// Write an object from an in-memory buffer.
    async fn put_bytes(
        &self,
        location: &ObjectLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Write an object from a local file.
    async fn put_file(
        &self,
        location: &ObjectLocation,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Copy an object within a single bucket. Returns `false` if the source
    /// object does not exist.
    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> StorageResult<bool>;

    /// Delete a batch of objects from a bucket. Missing keys are not an error.
    async fn delete(&self, bucket: &str, keys: &[String]) -> StorageResult<()>;
}
