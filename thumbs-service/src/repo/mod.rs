//! Read-only asset and policy lookups
//!
//! The relational store is owned by the ingestion pipeline; this service only
//! reads from it, so the contracts here are lookup-shaped and absence is an
//! ordinary `None`.

pub mod postgres;

pub use postgres::{PgAssetRepository, PgPolicyRepository};

use crate::error::Result;
use crate::model::{Asset, AssetId, ThumbnailPolicy};
use async_trait::async_trait;

/// Read-only asset lookup.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>>;
}

/// Read-only thumbnail-policy lookup. Policies are immutable after creation,
/// so implementations are free to cache by id indefinitely.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn get_thumbnail_policy(&self, policy_id: &str) -> Result<Option<ThumbnailPolicy>>;
}
