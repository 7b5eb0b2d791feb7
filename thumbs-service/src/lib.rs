//! Thumbnail layout service
//!
//! Derives, stores, migrates and serves image thumbnails for a multi-tenant
//! image repository backed by key-addressed blob storage. Thumbnails are
//! generated once per source image at the bounding-square sizes of a
//! per-asset policy, recorded in a small per-asset sizes manifest, and reused
//! for every subsequent request. A legacy blob layout from a prior system
//! version is migrated to the canonical layout on demand, idempotently and
//! under per-asset mutual exclusion.

pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod repo;
pub mod request;
pub mod resolver;
pub mod service;

pub use config::Config;
pub use error::{Result, ThumbsError};
pub use geometry::{Shape, Size};
pub use layout::{KeyedLock, LegacyAliasMap, ThumbLayoutEngine};
pub use manifest::SizesManifest;
pub use model::{Asset, AssetId, OnDiskThumb, ThumbnailPolicy};
pub use naming::AccessTier;
pub use request::{SizeParam, ThumbnailRequest};
pub use resolver::SizeCandidate;
pub use service::ThumbsService;
