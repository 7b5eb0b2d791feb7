//! Thumbnail read-side service
//!
//! The caller-facing surface: resolves a (customer, space, request) triple to
//! the open sizes that exist for an asset, or to the concrete canonical key
//! to stream bytes from. Migration is triggered transparently when an asset
//! still carries the legacy layout. Manifests are never cached in process
//! memory; storage is the system of record and every resolution re-reads it.

use crate::error::Result;
use crate::geometry::Size;
use crate::layout::ThumbLayoutEngine;
use crate::naming::{self, AccessTier};
use crate::request::ThumbnailRequest;
use crate::resolver::{self, SizeCandidate};
use blob_store::ObjectLocation;
use std::sync::Arc;
use tracing::debug;

pub struct ThumbsService {
    engine: Arc<ThumbLayoutEngine>,
    thumbs_bucket: String,
}

impl ThumbsService {
    pub fn new(engine: Arc<ThumbLayoutEngine>, thumbs_bucket: impl Into<String>) -> Self {
        Self {
            engine,
            thumbs_bucket: thumbs_bucket.into(),
        }
    }

    /// Root key of one asset's thumbnail family.
    pub fn root_key(&self, customer: i32, space: i32, name: &str) -> ObjectLocation {
        ObjectLocation::new(
            self.thumbs_bucket.clone(),
            format!("{}/{}/{}/", customer, space, name),
        )
    }

    /// The openly servable sizes for an asset, migrating its layout first if
    /// needed. Empty when the asset is unknown or nothing open exists.
    pub async fn get_sizes(
        &self,
        customer: i32,
        space: i32,
        request: &ThumbnailRequest,
    ) -> Result<Vec<Size>> {
        let root = self.root_key(customer, space, &request.name);
        match self.engine.get_or_create_manifest(&root).await? {
            Some(manifest) => Ok(manifest.open().to_vec()),
            None => Ok(Vec::new()),
        }
    }

    /// Resolve a request to the canonical key of a stored open thumbnail.
    /// `None` is the cache-miss-equivalent answer: nothing stored satisfies
    /// the request (the system self-heals on a later call if a migration
    /// failed part-way).
    pub async fn get_thumb_location(
        &self,
        customer: i32,
        space: i32,
        request: &ThumbnailRequest,
    ) -> Result<Option<ObjectLocation>> {
        let root = self.root_key(customer, space, &request.name);
        let Some(manifest) = self.engine.get_or_create_manifest(&root).await? else {
            debug!(root = %root, "No manifest; thumbnail unavailable");
            return Ok(None);
        };

        match resolver::resolve(manifest.open(), request.size, false)? {
            SizeCandidate::Exact { longest_edge } => {
                let key = naming::confined_square_key(&root.key, AccessTier::Open, longest_edge);
                Ok(Some(root.with_key(key)))
            }
            _ => Ok(None),
        }
    }
}
