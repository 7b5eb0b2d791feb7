//! Canonical thumbnail layout management
//!
//! - Keyed lock for per-asset mutual exclusion
//! - Layout engine for migration from the legacy layout and for first-time
//!   creation of canonical thumbnails

pub mod engine;
pub mod keyed_lock;

pub use engine::{LegacyAliasMap, ThumbLayoutEngine};
pub use keyed_lock::KeyedLock;
