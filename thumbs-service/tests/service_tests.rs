//! Read-side service tests: sizes listing and location resolution

mod common;

use common::{harness, restricted_asset, seed_legacy_layout, standard_policy, BUCKET};
use thumbs_service::geometry::Size;
use thumbs_service::request::{SizeParam, ThumbnailRequest};
use thumbs_service::service::ThumbsService;

const PREFIX: &str = "10/20/ocean/";

#[tokio::test]
async fn get_sizes_migrates_then_returns_open_sizes() {
    let h = harness(Some(restricted_asset()), Some(standard_policy()));
    seed_legacy_layout(&h.store, PREFIX);
    let service = ThumbsService::new(h.engine.clone(), BUCKET);

    let sizes = service
        .get_sizes(10, 20, &ThumbnailRequest::new("ocean", SizeParam::Max))
        .await
        .unwrap();

    assert_eq!(sizes, vec![Size::new(100, 200), Size::new(50, 100)]);
    // The migration ran as a side effect.
    assert!(h.store.object(BUCKET, "10/20/ocean/s.json").is_some());
}

#[tokio::test]
async fn get_sizes_for_unknown_asset_is_empty() {
    let h = harness(None, None);
    let service = ThumbsService::new(h.engine.clone(), BUCKET);

    let sizes = service
        .get_sizes(10, 20, &ThumbnailRequest::new("ghost", SizeParam::Max))
        .await
        .unwrap();

    assert!(sizes.is_empty());
}

#[tokio::test]
async fn get_thumb_location_resolves_canonical_open_key() {
    let h = harness(Some(restricted_asset()), Some(standard_policy()));
    seed_legacy_layout(&h.store, PREFIX);
    let service = ThumbsService::new(h.engine.clone(), BUCKET);

    let location = service
        .get_thumb_location(10, 20, &ThumbnailRequest::new("ocean", SizeParam::Width(100)))
        .await
        .unwrap()
        .expect("expected a stored thumbnail");

    assert_eq!(location.bucket, BUCKET);
    assert_eq!(location.key, "10/20/ocean/open/200.jpg");
}

#[tokio::test]
async fn get_thumb_location_max_uses_largest_open_size() {
    let h = harness(Some(restricted_asset()), Some(standard_policy()));
    seed_legacy_layout(&h.store, PREFIX);
    let service = ThumbsService::new(h.engine.clone(), BUCKET);

    let location = service
        .get_thumb_location(10, 20, &ThumbnailRequest::new("ocean", SizeParam::Max))
        .await
        .unwrap()
        .expect("expected a stored thumbnail");

    // Auth-tier sizes (1024, 400) never resolve here; the largest open wins.
    assert_eq!(location.key, "10/20/ocean/open/200.jpg");
}

#[tokio::test]
async fn get_thumb_location_without_match_is_none() {
    let h = harness(Some(restricted_asset()), Some(standard_policy()));
    seed_legacy_layout(&h.store, PREFIX);
    let service = ThumbsService::new(h.engine.clone(), BUCKET);

    let location = service
        .get_thumb_location(10, 20, &ThumbnailRequest::new("ocean", SizeParam::Width(999)))
        .await
        .unwrap();

    assert!(location.is_none());
}

#[tokio::test]
async fn unknown_asset_resolves_to_none() {
    let h = harness(None, None);
    let service = ThumbsService::new(h.engine.clone(), BUCKET);

    let location = service
        .get_thumb_location(10, 20, &ThumbnailRequest::new("ghost", SizeParam::Max))
        .await
        .unwrap();

    assert!(location.is_none());
}
