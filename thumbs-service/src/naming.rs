//! Blob key naming for canonical and legacy thumbnail layouts
//!
//! Pure, stateless key builders shared by the layout engine and by the
//! ingestion pipeline's thumbnail-writing step, which must stay
//! key-compatible with this module. All keys are suffixes relative to an
//! asset's storage prefix.

use crate::geometry::Size;

/// File name of the canonical sizes manifest.
pub const SIZES_MANIFEST: &str = "s.json";

/// File name of the legacy sizes manifest.
pub const LEGACY_SIZES_MANIFEST: &str = "sizes.json";

/// Access tier of a stored thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    Open,
    Auth,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Open => "open",
            AccessTier::Auth => "auth",
        }
    }
}

/// Canonical key of a confined square: `{prefix}{tier}/{max}.jpg`.
pub fn confined_square_key(prefix: &str, tier: AccessTier, max_dimension: u32) -> String {
    format!("{}{}/{}.jpg", prefix, tier.as_str(), max_dimension)
}

/// Canonical key of the sizes manifest: `{prefix}s.json`.
pub fn manifest_key(prefix: &str) -> String {
    format!("{}{}", prefix, SIZES_MANIFEST)
}

/// Legacy key of the largest generated thumbnail: `{prefix}low.jpg`.
pub fn legacy_largest_key(prefix: &str) -> String {
    format!("{}low.jpg", prefix)
}

/// Legacy per-size key: `{prefix}full/{w},{h}/0/default.jpg`.
pub fn legacy_size_key(prefix: &str, size: Size) -> String {
    format!(
        "{}full/{},{}/0/default.jpg",
        prefix,
        size.width(),
        size.height()
    )
}

/// Width-only legacy per-size key: `{prefix}full/{w},/0/default.jpg`.
///
/// Kept for external consumers that request by width alone.
pub fn legacy_width_key(prefix: &str, size: Size) -> String {
    format!("{}full/{},/0/default.jpg", prefix, size.width())
}

/// True if a key relative to the prefix is a legacy flat artifact: either
/// `{digits}.jpg` or the legacy manifest name.
pub fn is_legacy_artifact(relative_key: &str) -> bool {
    if relative_key == LEGACY_SIZES_MANIFEST {
        return true;
    }
    match relative_key.strip_suffix(".jpg") {
        Some(stem) => !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
