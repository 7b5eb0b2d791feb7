//! Size resolution
//!
//! Maps an arbitrary image-size request onto the best matching or derivable
//! stored thumbnail. Pure logic over a manifest's known open sizes; fetching
//! and migrating the manifest itself is the layout engine's job.

use crate::error::Result;
use crate::geometry::Size;
use crate::request::SizeParam;

/// Outcome of resolving a size request against the known open sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeCandidate {
    /// A stored thumbnail with this longest edge satisfies the request.
    Exact { longest_edge: u32 },

    /// Nothing stored matches and resizing was not permitted.
    Unavailable,

    /// A resize plan bracketed by the nearest known sizes: `larger` is the
    /// tightest known size still containing the ideal, `smaller` the first
    /// known size that does not. `larger` is `None` when the ideal exceeds
    /// every known size.
    Resizable {
        ideal: Size,
        larger: Option<Size>,
        smaller: Option<Size>,
    },
}

/// Resolve a size request against `known_open`, which is expected in stored
/// manifest order (descending by max dimension).
pub fn resolve(known_open: &[Size], request: SizeParam, allow_resize: bool) -> Result<SizeCandidate> {
    // Both dimensions fixed: the longest edge is known without any lookup.
    if let SizeParam::Exact { width, height } = request {
        return Ok(SizeCandidate::Exact {
            longest_edge: width.max(height),
        });
    }

    let Some(largest) = known_open.first().copied() else {
        return Ok(SizeCandidate::Unavailable);
    };

    let (target_width, target_height) = match request {
        SizeParam::Max => {
            return Ok(SizeCandidate::Exact {
                longest_edge: largest.max_dimension(),
            });
        }
        SizeParam::Width(w) => (Some(w), None),
        SizeParam::Height(h) => (None, Some(h)),
        SizeParam::Exact { .. } => unreachable!("handled above"),
    };

    let requested = target_width.or(target_height).unwrap_or_default();
    for size in known_open {
        if size.width() == requested || size.height() == requested {
            return Ok(SizeCandidate::Exact {
                longest_edge: size.max_dimension(),
            });
        }
    }

    if !allow_resize {
        return Ok(SizeCandidate::Unavailable);
    }

    // No stored match: plan a resize from the ideal size, bracketed by the
    // nearest known sizes on either side.
    let ideal = largest.resize(target_width, target_height)?;
    let mut larger = None;
    let mut smaller = None;
    for size in known_open {
        if ideal.is_confined_within(*size) {
            larger = Some(*size);
        } else {
            smaller = Some(*size);
            break;
        }
    }

    Ok(SizeCandidate::Resizable {
        ideal,
        larger,
        smaller,
    })
}
