//! Layout engine
//!
//! Orchestrates migration of one asset's thumbnails from the legacy blob
//! layout to the canonical layout, and first-time creation of canonical
//! thumbnails from freshly generated on-disk files. All work for one asset is
//! guarded by a per-root-key lock; the canonical manifest is always written
//! last, so its presence is the single signal that a layout is valid and any
//! interrupted run is safely redone by the next caller.

use crate::error::Result;
use crate::geometry::Size;
use crate::layout::keyed_lock::KeyedLock;
use crate::manifest::SizesManifest;
use crate::model::{Asset, AssetId, OnDiskThumb};
use crate::naming;
use crate::repo::{AssetRepository, PolicyRepository};
use blob_store::{ObjectLocation, ObjectStore};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const JPEG_CONTENT_TYPE: &str = "image/jpeg";
const MANIFEST_CONTENT_TYPE: &str = "application/json";

/// Mapping from one canonical key to the legacy alias keys that must also
/// resolve to the same content.
#[derive(Debug, Default)]
pub struct LegacyAliasMap {
    entries: Vec<(String, Vec<String>)>,
}

impl LegacyAliasMap {
    pub fn add(&mut self, canonical_key: String, aliases: Vec<String>) {
        self.entries.push((canonical_key, aliases));
    }

    /// Flatten into (source, destination) copy pairs.
    pub fn copy_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(canonical, aliases)| {
                aliases
                    .iter()
                    .map(move |alias| (canonical.clone(), alias.clone()))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Migrates and creates canonical thumbnail layouts.
pub struct ThumbLayoutEngine {
    store: Arc<dyn ObjectStore>,
    assets: Arc<dyn AssetRepository>,
    policies: Arc<dyn PolicyRepository>,
    locks: KeyedLock,
}

impl ThumbLayoutEngine {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        assets: Arc<dyn AssetRepository>,
        policies: Arc<dyn PolicyRepository>,
    ) -> Self {
        Self {
            store,
            assets,
            policies,
            locks: KeyedLock::new(),
        }
    }

    /// Idempotent migration of one asset's thumbnails to the canonical
    /// layout. Safe to call concurrently and repeatedly for the same root
    /// key; a no-op once the canonical manifest exists.
    pub async fn ensure_canonical_layout(&self, root: &ObjectLocation) -> Result<()> {
        let _guard = self.locks.lock(&root.to_string()).await;

        let existing = self.store.list(root).await?;
        let manifest_key = naming::manifest_key(&root.key);
        if existing.iter().any(|key| *key == manifest_key) {
            debug!(root = %root, "Canonical manifest present; layout already valid");
            return Ok(());
        }

        let Some(asset_id) = AssetId::from_prefix(&root.key) else {
            warn!(root = %root, "Root key prefix does not name an asset");
            return Ok(());
        };
        let Some(asset) = self.assets.get_asset(&asset_id).await? else {
            debug!(asset = %asset_id, "Asset not ingested yet; nothing to migrate");
            return Ok(());
        };
        let Some(policy) = self
            .policies
            .get_thumbnail_policy(&asset.thumbnail_policy)
            .await?
        else {
            warn!(
                asset = %asset_id,
                policy = %asset.thumbnail_policy,
                "Thumbnail policy not found; skipping migration"
            );
            return Ok(());
        };

        let edges = policy.edges_descending();
        let Some(largest_edge) = edges.first().copied() else {
            warn!(
                asset = %asset_id,
                policy = %policy.id,
                "Thumbnail policy has no sizes; skipping migration"
            );
            return Ok(());
        };

        let real_size = asset.size();
        let mut manifest = SizesManifest::new(asset.max_available(largest_edge));
        let mut copies: Vec<(String, String)> = Vec::new();
        let mut previous_max: Option<u32> = None;

        for edge in &edges {
            let thumb = Size::confine(*edge, real_size);
            // Edges at or above the real size all confine to the same thumb;
            // record it once.
            if previous_max == Some(thumb.max_dimension()) {
                continue;
            }
            let largest = previous_max.is_none();
            previous_max = Some(thumb.max_dimension());

            let tier = manifest.add(thumb);
            let source = if largest {
                naming::legacy_largest_key(&root.key)
            } else {
                naming::legacy_size_key(&root.key, thumb)
            };
            let dest = naming::confined_square_key(&root.key, tier, thumb.max_dimension());
            copies.push((source, dest));
        }

        let copy_failures = self.copy_batch(&root.bucket, copies).await;
        if copy_failures > 0 {
            // Without the manifest the migration stays incomplete and the
            // next caller redoes it in full.
            warn!(
                asset = %asset_id,
                failures = copy_failures,
                "Copies failed; leaving layout unmigrated for retry"
            );
            return Ok(());
        }

        // Written last on purpose: presence of the manifest is the only
        // completion signal, so a crash before this point just means the next
        // caller redoes the work.
        self.store
            .put_bytes(
                &root.with_key(manifest_key),
                manifest.to_json()?,
                MANIFEST_CONTENT_TYPE,
            )
            .await?;

        self.cleanup_legacy(root, &existing).await;

        info!(
            asset = %asset_id,
            open = manifest.open().len(),
            auth = manifest.auth().len(),
            "Migrated thumbnail layout"
        );
        Ok(())
    }

    /// Create the canonical layout from freshly generated on-disk thumbnail
    /// files, immediately after an ingestion run. No-op for an empty set.
    pub async fn create_canonical_thumbs(
        &self,
        asset: &Asset,
        thumbs_on_disk: &[OnDiskThumb],
        root: &ObjectLocation,
    ) -> Result<()> {
        if thumbs_on_disk.is_empty() {
            return Ok(());
        }
        let _guard = self.locks.lock(&root.to_string()).await;

        let mut thumbs = thumbs_on_disk.to_vec();
        thumbs.sort_by(|a, b| b.size.max_dimension().cmp(&a.size.max_dimension()));
        let largest_edge = thumbs[0].size.max_dimension();

        let mut manifest = SizesManifest::new(asset.max_available(largest_edge));
        let mut aliases = LegacyAliasMap::default();

        let mut uploads = Vec::new();
        for (index, thumb) in thumbs.iter().enumerate() {
            let tier = manifest.add(thumb.size);
            let canonical_key =
                naming::confined_square_key(&root.key, tier, thumb.size.max_dimension());

            let mut legacy_keys = vec![
                naming::legacy_size_key(&root.key, thumb.size),
                naming::legacy_width_key(&root.key, thumb.size),
            ];
            if index == 0 {
                legacy_keys.push(naming::legacy_largest_key(&root.key));
            }
            aliases.add(canonical_key.clone(), legacy_keys);

            let store = self.store.clone();
            let location = root.with_key(canonical_key);
            let path = thumb.path.clone();
            uploads.push(async move {
                if let Err(e) = store.put_file(&location, &path, JPEG_CONTENT_TYPE).await {
                    error!(
                        location = %location,
                        path = %path.display(),
                        error = %e,
                        "Failed to upload canonical thumbnail"
                    );
                }
            });
        }
        join_all(uploads).await;

        self.store
            .put_bytes(
                &root.with_key(naming::manifest_key(&root.key)),
                manifest.to_json()?,
                MANIFEST_CONTENT_TYPE,
            )
            .await?;

        let alias_failures = self.copy_batch(&root.bucket, aliases.copy_pairs()).await;
        if alias_failures > 0 {
            warn!(
                asset = %asset.id,
                failures = alias_failures,
                "Some legacy aliases were not written"
            );
        }

        let existing = self.store.list(root).await?;
        self.cleanup_legacy(root, &existing).await;

        info!(
            asset = %asset.id,
            thumbs = thumbs.len(),
            "Created canonical thumbnail layout"
        );
        Ok(())
    }

    /// Fetch the asset's sizes manifest, migrating the layout first if the
    /// manifest is absent. `None` means there is still nothing to serve
    /// (asset unknown, or an earlier failure left the layout incomplete).
    pub async fn get_or_create_manifest(
        &self,
        root: &ObjectLocation,
    ) -> Result<Option<SizesManifest>> {
        let manifest_location = root.with_key(naming::manifest_key(&root.key));
        if let Some(bytes) = self.store.get(&manifest_location).await? {
            return Ok(Some(SizesManifest::from_json(&bytes)?));
        }

        self.ensure_canonical_layout(root).await?;

        match self.store.get(&manifest_location).await? {
            Some(bytes) => Ok(Some(SizesManifest::from_json(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Run a batch of within-bucket copies concurrently, returning how many
    /// hard-failed. Individual failures are logged and do not abort siblings;
    /// a missing source is not a failure, just nothing to copy.
    async fn copy_batch(&self, bucket: &str, copies: Vec<(String, String)>) -> usize {
        let futures = copies.into_iter().map(|(source, dest)| {
            let store = self.store.clone();
            let bucket = bucket.to_string();
            async move {
                match store.copy(&bucket, &source, &dest).await {
                    Ok(true) => 0usize,
                    Ok(false) => {
                        warn!(bucket = %bucket, source = %source, dest = %dest, "Copy source missing");
                        0
                    }
                    Err(e) => {
                        error!(
                            bucket = %bucket,
                            source = %source,
                            dest = %dest,
                            error = %e,
                            "Copy failed"
                        );
                        1
                    }
                }
            }
        });
        join_all(futures).await.into_iter().sum()
    }

    /// Best-effort deletion of legacy flat artifacts under the root prefix.
    async fn cleanup_legacy(&self, root: &ObjectLocation, existing_keys: &[String]) {
        let doomed: Vec<String> = existing_keys
            .iter()
            .filter(|key| {
                key.strip_prefix(&root.key)
                    .is_some_and(naming::is_legacy_artifact)
            })
            .cloned()
            .collect();
        if doomed.is_empty() {
            return;
        }

        debug!(root = %root, count = doomed.len(), "Deleting legacy artifacts");
        if let Err(e) = self.store.delete(&root.bucket, &doomed).await {
            error!(root = %root, error = %e, "Legacy artifact cleanup failed");
        }
    }
}
