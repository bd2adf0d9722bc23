//! In-memory R-Tree for rectangle intersection queries.
//!
//! - Arena-backed nodes with a configurable fan-out (default 8 / 4)
//! - Quadratic node splitting
//! - Lazy, pruned intersection search
//! - Structural integrity checks

pub mod integrity;
pub mod rtree_constants;
pub mod rtree_types;
mod rtree_impl;
mod rtree_query;
mod rtree_split;

pub use integrity::IntegrityReport;
pub use rtree_constants::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES};
pub use rtree_impl::RTree;
pub use rtree_query::Intersecting;
pub use rtree_types::{ChildRef, Entry, FeatureId, Node, NodeId, RTreeConfig, RTreeStats};
