//! Domain model for thumbnail layout derivation
//!
//! Strongly-typed records populated field-by-field at the repository
//! boundary. Assets are read-only to this service; only the ingestion
//! pipeline mutates them.

use crate::geometry::Size;
use std::fmt;

/// Composite identity of one asset: (customer, space, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId {
    pub customer: i32,
    pub space: i32,
    pub name: String,
}

impl AssetId {
    pub fn new(customer: i32, space: i32, name: impl Into<String>) -> Self {
        Self {
            customer,
            space,
            name: name.into(),
        }
    }

    /// Parse an id from a storage prefix by trimming the trailing separator,
    /// e.g. `"10/20/ocean/"` -> `10/20/ocean`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        let trimmed = prefix.trim_end_matches('/');
        let mut parts = trimmed.splitn(3, '/');
        let customer = parts.next()?.parse().ok()?;
        let space = parts.next()?.parse().ok()?;
        let name = parts.next()?;
        if name.is_empty() {
            return None;
        }
        Some(Self::new(customer, space, name))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.customer, self.space, self.name)
    }
}

/// The subset of an asset relevant to thumbnail layout.
#[derive(Debug, Clone)]
pub struct Asset {
    pub id: AssetId,
    /// Actual pixel width, set once known by the ingestion pipeline.
    pub width: u32,
    /// Actual pixel height, set once known by the ingestion pipeline.
    pub height: u32,
    /// Largest bounding-square edge servable without authentication.
    /// -1 means unrestricted; 0 means nothing is served without auth.
    pub max_unauthorised: i32,
    /// Access roles; a non-empty set means an access restriction exists.
    pub roles: Vec<String>,
    /// Id of the thumbnail policy assigned at ingest.
    pub thumbnail_policy: String,
}

impl Asset {
    /// The asset's real pixel dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when serving any size requires an access decision.
    pub fn has_restrictions(&self) -> bool {
        !self.roles.is_empty() && self.max_unauthorised >= 0
    }

    /// The bounding square separating openly servable sizes from
    /// authorised-only ones. `None` means nothing is openly servable.
    /// `largest_edge` is the biggest bounding-square edge in play (the
    /// largest policy edge, or the largest generated thumbnail).
    pub fn max_available(&self, largest_edge: u32) -> Option<Size> {
        if !self.has_restrictions() {
            return Some(Size::square(largest_edge));
        }
        match u32::try_from(self.max_unauthorised) {
            Ok(edge) if edge > 0 => Some(Size::square(edge)),
            _ => None,
        }
    }
}

/// A freshly generated thumbnail file on local disk, produced by the external
/// image processor and awaiting upload to its canonical key.
#[derive(Debug, Clone)]
pub struct OnDiskThumb {
    pub path: std::path::PathBuf,
    pub size: Size,
}

/// An ordered list of bounding-square edge lengths, assigned per asset at
/// ingest time and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailPolicy {
    pub id: String,
    pub sizes: Vec<u32>,
}

impl ThumbnailPolicy {
    /// Bounding-square edges sorted descending.
    pub fn edges_descending(&self) -> Vec<u32> {
        let mut edges = self.sizes.clone();
        edges.sort_unstable_by(|a, b| b.cmp(a));
        edges
    }
}
