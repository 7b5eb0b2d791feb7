//! Rectangular size geometry
//!
//! Pure functions for confining, resizing and comparing sizes. No I/O and no
//! state; everything downstream (manifest construction, tier partitioning,
//! size resolution) is built on these primitives.

use crate::error::{Result, ThumbsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall shape of a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Portrait,
    Landscape,
}

/// An immutable (width, height) pair. Both dimensions are always positive.
///
/// Serializes as a `[width, height]` array, the form used by the sizes
/// manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u32; 2]", from = "[u32; 2]")]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "Size dimensions must be positive");
        Self { width, height }
    }

    /// A size with equal edges, used for bounding-square comparisons.
    pub fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The longer of the two dimensions.
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn shape(&self) -> Shape {
        if self.width == self.height {
            Shape::Square
        } else if self.height > self.width {
            Shape::Portrait
        } else {
            Shape::Landscape
        }
    }

    /// True iff this size fits entirely within `other`.
    pub fn is_confined_within(&self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Scale `size` down (never up) so its longer dimension equals `edge`,
    /// preserving aspect ratio. The shorter dimension is rounded half away
    /// from zero; confining 4553x5668 to edge 200 yields 161x200.
    pub fn confine(edge: u32, size: Size) -> Size {
        if size.max_dimension() <= edge {
            return size;
        }

        match size.shape() {
            Shape::Square => Size::square(edge),
            Shape::Portrait => {
                let width = scale_dimension(size.width, edge, size.height);
                Size::new(width, edge)
            }
            Shape::Landscape => {
                let height = scale_dimension(size.height, edge, size.width);
                Size::new(edge, height)
            }
        }
    }

    /// Compute a new size preserving aspect ratio given one or both target
    /// dimensions. Supplying both returns them verbatim; supplying neither is
    /// an error, rejected before any I/O happens.
    pub fn resize(&self, target_width: Option<u32>, target_height: Option<u32>) -> Result<Size> {
        match (target_width, target_height) {
            (Some(w), Some(h)) => Ok(Size::new(w, h)),
            (Some(w), None) => {
                let h = scale_dimension(self.height, w, self.width);
                Ok(Size::new(w, h))
            }
            (None, Some(h)) => {
                let w = scale_dimension(self.width, h, self.height);
                Ok(Size::new(w, h))
            }
            (None, None) => Err(ThumbsError::InvalidSize(
                "resize requires at least one target dimension".to_string(),
            )),
        }
    }
}

/// `shorter * target / longer`, rounded half away from zero, floored at 1.
fn scale_dimension(shorter: u32, target: u32, longer: u32) -> u32 {
    let scaled = (shorter as f64) * (target as f64) / (longer as f64);
    (scaled.round() as u32).max(1)
}

impl From<Size> for [u32; 2] {
    fn from(size: Size) -> Self {
        [size.width, size.height]
    }
}

impl From<[u32; 2]> for Size {
    fn from(pair: [u32; 2]) -> Self {
        Size::new(pair[0], pair[1])
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = ThumbsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ThumbsError::InvalidSize(format!("invalid size string: {s:?}"));
        let (w, h) = s.split_once(',').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Size::new(width, height))
    }
}
