//! In-memory collaborators with call counters
//!
//! Mirrors production contracts closely enough to exercise the layout engine
//! end to end: listing is prefix-based, reads distinguish absence from
//! failure, and copy failures can be injected per source key.

use async_trait::async_trait;
use blob_store::{ObjectLocation, ObjectStore, StorageError, StorageResult};
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use thumbs_service::error::Result;
use thumbs_service::model::{Asset, AssetId, ThumbnailPolicy};
use thumbs_service::repo::{AssetRepository, PolicyRepository};

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    puts: AtomicUsize,
    copies: AtomicUsize,
    deletes: AtomicUsize,
    failing_copy_sources: Mutex<HashSet<String>>,
}

impl InMemoryObjectStore {
    pub fn seed(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Make every copy from `source_key` fail with a backend error.
    pub fn fail_copies_from(&self, source_key: &str) {
        self.failing_copy_sources
            .lock()
            .unwrap()
            .insert(source_key.to_string());
    }

    pub fn clear_copy_failures(&self) {
        self.failing_copy_sources.lock().unwrap().clear();
    }

    /// Total storage-mutating calls issued (puts + copies + deletes).
    pub fn mutation_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
            + self.copies.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list(&self, root: &ObjectLocation) -> StorageResult<Vec<String>> {
        let objects = self.objects.lock().unwrap();
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|(bucket, key)| *bucket == root.bucket && key.starts_with(&root.key))
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, location: &ObjectLocation) -> StorageResult<Option<Bytes>> {
        Ok(self
            .object(&location.bucket, &location.key)
            .map(Bytes::from))
    }

    async fn put_bytes(
        &self,
        location: &ObjectLocation,
        body: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.seed(&location.bucket, &location.key, body);
        Ok(())
    }

    async fn put_file(
        &self,
        location: &ObjectLocation,
        path: &Path,
        _content_type: &str,
    ) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let body = std::fs::read(path)?;
        self.seed(&location.bucket, &location.key, body);
        Ok(())
    }

    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> StorageResult<bool> {
        if self
            .failing_copy_sources
            .lock()
            .unwrap()
            .contains(source_key)
        {
            return Err(StorageError::backend(
                "copy",
                bucket,
                source_key,
                "injected failure",
            ));
        }
        self.copies.fetch_add(1, Ordering::SeqCst);
        let Some(body) = self.object(bucket, source_key) else {
            return Ok(false);
        };
        self.seed(bucket, dest_key, body);
        Ok(true)
    }

    async fn delete(&self, bucket: &str, keys: &[String]) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(&(bucket.to_string(), key.clone()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAssetRepository {
    assets: Mutex<HashMap<AssetId, Asset>>,
    lookups: AtomicUsize,
}

impl InMemoryAssetRepository {
    pub fn insert(&self, asset: Asset) {
        self.assets.lock().unwrap().insert(asset.id.clone(), asset);
    }

    /// Number of get_asset calls, for mutual-exclusion verification.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetRepository for InMemoryAssetRepository {
    async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        // Yield so overlapping callers genuinely interleave.
        tokio::task::yield_now().await;
        Ok(self.assets.lock().unwrap().get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPolicyRepository {
    policies: Mutex<HashMap<String, ThumbnailPolicy>>,
}

impl InMemoryPolicyRepository {
    pub fn insert(&self, policy: ThumbnailPolicy) {
        self.policies
            .lock()
            .unwrap()
            .insert(policy.id.clone(), policy);
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    async fn get_thumbnail_policy(&self, policy_id: &str) -> Result<Option<ThumbnailPolicy>> {
        Ok(self.policies.lock().unwrap().get(policy_id).cloned())
    }
}
