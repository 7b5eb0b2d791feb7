//! Sizes manifest
//!
//! The persisted record of which thumbnail sizes exist for one asset,
//! partitioned into open and authorised tiers. Stored as a single small JSON
//! object per asset, e.g. `{"o":[[200,400],[100,200]],"a":[]}`; this is the
//! only wire format owned by this service. Sizes appear in descending
//! max-dimension order with no duplicate max dimensions.

use crate::error::Result;
use crate::geometry::Size;
use crate::naming::AccessTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizesManifest {
    /// Openly servable sizes, descending by max dimension.
    #[serde(rename = "o")]
    open: Vec<Size>,

    /// Sizes requiring access validation, descending by max dimension.
    #[serde(rename = "a")]
    auth: Vec<Size>,

    /// Classification seed for newly added sizes; `None` means every size is
    /// authorised-only. Runtime-only: manifests read back from storage carry
    /// no seed and accept no further sizes.
    #[serde(skip)]
    max_available: Option<Size>,
}

impl SizesManifest {
    /// A fresh manifest that classifies added sizes against `max_available`.
    pub fn new(max_available: Option<Size>) -> Self {
        Self {
            open: Vec::new(),
            auth: Vec::new(),
            max_available,
        }
    }

    /// Append a size into the tier it belongs to and report that tier.
    ///
    /// Callers append in descending policy order, which keeps both lists
    /// sorted without re-sorting here.
    pub fn add(&mut self, size: Size) -> AccessTier {
        let open = match self.max_available {
            Some(max) => size.is_confined_within(max),
            None => false,
        };
        if open {
            self.open.push(size);
            AccessTier::Open
        } else {
            self.auth.push(size);
            AccessTier::Auth
        }
    }

    pub fn open(&self) -> &[Size] {
        &self.open
    }

    pub fn auth(&self) -> &[Size] {
        &self.auth
    }

    /// Total number of recorded sizes across both tiers.
    pub fn count(&self) -> usize {
        self.open.len() + self.auth.len()
    }

    /// The tier the largest recorded size lives in. Sizes descend, so any
    /// authorised entry means the largest one is authorised.
    pub fn largest_tier(&self) -> AccessTier {
        if self.auth.is_empty() {
            AccessTier::Open
        } else {
            AccessTier::Auth
        }
    }

    /// All sizes in descending max-dimension order, with their tiers.
    pub fn all_sizes(&self) -> Vec<(Size, AccessTier)> {
        let mut sizes: Vec<(Size, AccessTier)> = self
            .auth
            .iter()
            .map(|s| (*s, AccessTier::Auth))
            .chain(self.open.iter().map(|s| (*s, AccessTier::Open)))
            .collect();
        sizes.sort_by(|a, b| b.0.max_dimension().cmp(&a.0.max_dimension()));
        sizes
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_sizes_by_max_available() {
        let mut manifest = SizesManifest::new(Some(Size::square(350)));
        assert_eq!(manifest.add(Size::new(512, 1024)), AccessTier::Auth);
        assert_eq!(manifest.add(Size::new(200, 400)), AccessTier::Auth);
        assert_eq!(manifest.add(Size::new(100, 200)), AccessTier::Open);
        assert_eq!(manifest.add(Size::new(50, 100)), AccessTier::Open);

        assert_eq!(manifest.open(), &[Size::new(100, 200), Size::new(50, 100)]);
        assert_eq!(manifest.auth(), &[Size::new(512, 1024), Size::new(200, 400)]);
        assert_eq!(manifest.count(), 4);
        assert_eq!(manifest.largest_tier(), AccessTier::Auth);
    }

    #[test]
    fn wire_format_is_o_and_a() {
        let mut manifest = SizesManifest::new(Some(Size::square(1024)));
        manifest.add(Size::new(200, 400));
        manifest.add(Size::new(100, 200));
        manifest.add(Size::new(50, 100));

        let json = String::from_utf8(manifest.to_json().unwrap()).unwrap();
        assert_eq!(json, r#"{"o":[[200,400],[100,200],[50,100]],"a":[]}"#);
    }

    #[test]
    fn round_trip_preserves_tiers_and_count() {
        let mut manifest = SizesManifest::new(Some(Size::square(350)));
        manifest.add(Size::new(512, 1024));
        manifest.add(Size::new(200, 400));
        manifest.add(Size::new(100, 200));
        manifest.add(Size::new(50, 100));

        let bytes = manifest.to_json().unwrap();
        let restored = SizesManifest::from_json(&bytes).unwrap();
        assert_eq!(restored.open(), manifest.open());
        assert_eq!(restored.auth(), manifest.auth());
        assert_eq!(restored.count(), manifest.count());
    }

    #[test]
    fn all_sizes_descends_across_tiers() {
        let mut manifest = SizesManifest::new(Some(Size::square(350)));
        manifest.add(Size::new(512, 1024));
        manifest.add(Size::new(100, 200));

        let all = manifest.all_sizes();
        assert_eq!(all[0], (Size::new(512, 1024), AccessTier::Auth));
        assert_eq!(all[1], (Size::new(100, 200), AccessTier::Open));
    }
}
