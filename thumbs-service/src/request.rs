//! Thumbnail request types
//!
//! The protocol-parsing layer (out of scope here) validates raw parameters
//! and hands this service a well-formed request: dimensions, when present,
//! are already known to be positive and correctly ordered.

/// The rendering size a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeParam {
    /// The largest available size.
    Max,
    /// A specific width, height derived from aspect ratio.
    Width(u32),
    /// A specific height, width derived from aspect ratio.
    Height(u32),
    /// Both dimensions fixed.
    Exact { width: u32, height: u32 },
}

/// A request for one asset's thumbnail at one rendering size.
#[derive(Debug, Clone)]
pub struct ThumbnailRequest {
    /// Asset name within the caller's (customer, space).
    pub name: String,
    pub size: SizeParam,
}

impl ThumbnailRequest {
    pub fn new(name: impl Into<String>, size: SizeParam) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}
