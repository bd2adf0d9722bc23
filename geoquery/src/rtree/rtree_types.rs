//! Core types for the in-memory R-Tree.
//!
//! - Entries and feature identifiers
//! - Node types (Leaf and Internal) stored in an arena
//! - Fan-out configuration and statistics

use super::rtree_constants::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES, MIN_FANOUT};
use crate::bounding_box::BoundingBox;
use crate::errors::{SpatialError, SpatialResult};
use serde::{Deserialize, Serialize};

/// Identifier of a feature, as read from the first attribute of the source.
pub type FeatureId = i64;

/// Index of a node inside the tree arena
pub type NodeId = usize;

// ============================================================================
// Entries
// ============================================================================

/// A (bounding box, feature id) pair stored in a leaf.
///
/// Entries are immutable once built. Two entries may share a box, an id, or
/// both; the tree keeps them all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    bbox: BoundingBox,
    id: FeatureId,
}

impl Entry {
    pub fn new(bbox: BoundingBox, id: FeatureId) -> Self {
        Self { bbox, id }
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }
}

// ============================================================================
// Node Types
// ============================================================================

/// A child reference in an internal node
#[derive(Debug, Clone, Copy)]
pub struct ChildRef {
    pub bbox: BoundingBox,
    pub node: NodeId,
}

/// Node types in the R-Tree
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf node containing actual entries
    Leaf { entries: Vec<Entry> },
    /// Internal node containing child references
    Internal {
        children: Vec<ChildRef>,
        level: u32, // Height from leaf level (leaves are 0)
    },
}

impl Node {
    pub(crate) fn empty_leaf() -> Self {
        Node::Leaf {
            entries: Vec::new(),
        }
    }

    /// Tight box around all children/entries, or `None` for an empty node.
    pub fn compute_bbox(&self) -> Option<BoundingBox> {
        match self {
            Node::Leaf { entries } => BoundingBox::enclosing(entries.iter().map(Entry::bbox)),
            Node::Internal { children, .. } => {
                BoundingBox::enclosing(children.iter().map(|c| &c.bbox))
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn level(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { level, .. } => *level,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Node::Leaf { entries } => entries.len(),
            Node::Internal { children, .. } => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Fan-out bounds of an R-Tree.
///
/// Every non-root node holds between `min_entries` and `max_entries` items.
/// `min_entries` may not exceed half of `max_entries`, otherwise a split of
/// `max_entries + 1` items could not give both halves their minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTreeConfig {
    max_entries: usize,
    min_entries: usize,
}

impl RTreeConfig {
    /// Validates and creates a fan-out configuration.
    pub fn new(max_entries: usize, min_entries: usize) -> SpatialResult<Self> {
        if max_entries < 2 * MIN_FANOUT {
            return Err(SpatialError::InvalidConfig(format!(
                "max_entries must be at least {}, got {}",
                2 * MIN_FANOUT,
                max_entries
            )));
        }
        if min_entries < MIN_FANOUT || min_entries > max_entries / 2 {
            return Err(SpatialError::InvalidConfig(format!(
                "min_entries must be between {} and {} for max_entries {}, got {}",
                MIN_FANOUT,
                max_entries / 2,
                max_entries,
                min_entries
            )));
        }
        Ok(Self {
            max_entries,
            min_entries,
        })
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn min_entries(&self) -> usize {
        self.min_entries
    }
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            min_entries: DEFAULT_MIN_ENTRIES,
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Shape statistics of an R-Tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RTreeStats {
    pub total_entries: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    /// Number of levels; a tree whose root is a leaf has height 1
    pub tree_height: u32,
    /// Average leaf occupancy relative to `max_entries` (0.0 - 1.0)
    pub leaf_fill_factor: f64,
}
