//! Constants for the in-memory R-Tree.

/// Maximum number of entries or children per node (M)
pub const DEFAULT_MAX_ENTRIES: usize = 8;

/// Minimum entries or children per non-root node (m)
pub const DEFAULT_MIN_ENTRIES: usize = 4;

/// Smallest fan-out that still allows a split into two valid groups
pub const MIN_FANOUT: usize = 2;
