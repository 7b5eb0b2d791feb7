//! Shared fixtures and mocks for integration tests
#![allow(dead_code)]

pub mod mocks;

use self::mocks::{InMemoryAssetRepository, InMemoryObjectStore, InMemoryPolicyRepository};
use std::sync::Arc;
use thumbs_service::layout::ThumbLayoutEngine;
use thumbs_service::model::{Asset, AssetId, ThumbnailPolicy};

pub const BUCKET: &str = "thumbs-bucket";

/// A 4000x8000 image restricted to 350px without auth.
pub fn restricted_asset() -> Asset {
    Asset {
        id: AssetId::new(10, 20, "ocean"),
        width: 4000,
        height: 8000,
        max_unauthorised: 350,
        roles: vec!["clickthrough".to_string()],
        thumbnail_policy: "standard".to_string(),
    }
}

/// The same image with no access restrictions.
pub fn open_asset() -> Asset {
    Asset {
        roles: Vec::new(),
        max_unauthorised: -1,
        ..restricted_asset()
    }
}

pub fn standard_policy() -> ThumbnailPolicy {
    ThumbnailPolicy {
        id: "standard".to_string(),
        sizes: vec![1024, 400, 200, 100],
    }
}

pub struct TestHarness {
    pub store: Arc<InMemoryObjectStore>,
    pub assets: Arc<InMemoryAssetRepository>,
    pub engine: Arc<ThumbLayoutEngine>,
}

/// Wire an engine against in-memory collaborators.
pub fn harness(asset: Option<Asset>, policy: Option<ThumbnailPolicy>) -> TestHarness {
    let store = Arc::new(InMemoryObjectStore::default());
    let assets = Arc::new(InMemoryAssetRepository::default());
    let policies = Arc::new(InMemoryPolicyRepository::default());

    if let Some(asset) = asset {
        assets.insert(asset);
    }
    if let Some(policy) = policy {
        policies.insert(policy);
    }

    let engine = Arc::new(ThumbLayoutEngine::new(
        store.clone(),
        assets.clone(),
        policies,
    ));
    TestHarness {
        store,
        assets,
        engine,
    }
}

/// Seed the legacy blob layout the pre-migration system left behind for the
/// 4000x8000 fixture image: the "largest" blob, per-size blobs, flat numeric
/// artifacts and the legacy manifest.
pub fn seed_legacy_layout(store: &InMemoryObjectStore, prefix: &str) {
    store.seed(BUCKET, &format!("{prefix}low.jpg"), b"largest".to_vec());
    for (w, h) in [(200u32, 400u32), (100, 200), (50, 100)] {
        store.seed(
            BUCKET,
            &format!("{prefix}full/{w},{h}/0/default.jpg"),
            format!("thumb-{w}x{h}").into_bytes(),
        );
    }
    store.seed(BUCKET, &format!("{prefix}200.jpg"), b"flat-200".to_vec());
    store.seed(BUCKET, &format!("{prefix}100.jpg"), b"flat-100".to_vec());
    store.seed(BUCKET, &format!("{prefix}sizes.json"), b"[]".to_vec());
}
