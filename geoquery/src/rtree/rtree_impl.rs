//! In-memory R-Tree with quadratic split.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index.
//! Insertion follows the classic algorithm:
//!
//! 1. Descend from the root, always taking the child whose box grows least
//!    (ties: smaller area, then the first child), recording the path.
//! 2. Append the entry to the chosen leaf.
//! 3. If the leaf overflows, split it quadratically and push the new sibling
//!    into the parent, repeating upward. A split root grows the tree by one
//!    level.
//! 4. Re-tighten every box on the path.

use super::rtree_query::Intersecting;
use super::rtree_split::quadratic_split;
use super::rtree_types::{ChildRef, Entry, Node, NodeId, RTreeConfig, RTreeStats};
use crate::bounding_box::BoundingBox;

/// An R-Tree over axis-aligned boxes with feature ids as payload.
///
/// The tree is built once and then queried; it never removes entries.
#[derive(Debug, Clone)]
pub struct RTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    /// Number of levels; 1 while the root is a leaf
    pub(crate) height: u32,
    pub(crate) len: usize,
    pub(crate) config: RTreeConfig,
}

impl Default for RTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RTree {
    /// Creates an empty tree with the default fan-out (8 / 4).
    pub fn new() -> Self {
        Self::with_config(RTreeConfig::default())
    }

    /// Creates an empty tree with the given fan-out.
    pub fn with_config(config: RTreeConfig) -> Self {
        Self {
            nodes: vec![Node::empty_leaf()],
            root: 0,
            height: 1,
            len: 0,
            config,
        }
    }

    /// Builds a tree by inserting every entry in iteration order.
    pub fn bulk_insert<I>(config: RTreeConfig, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut tree = Self::with_config(config);
        for entry in entries {
            tree.insert(entry);
        }
        tree
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels from the root down to the leaves.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tight box around everything in the tree, `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.nodes[self.root].compute_bbox()
    }

    /// Inserts an entry. Always succeeds; duplicates are kept.
    pub fn insert(&mut self, entry: Entry) {
        let mut path = Vec::with_capacity(self.height as usize);
        let leaf_id = self.choose_leaf(entry.bbox(), &mut path);

        match self.insert_into_leaf(leaf_id, entry) {
            Some((new_node, new_bbox)) => self.propagate_split(&path, new_node, new_bbox),
            None => self.update_path_bboxes(&path),
        }
        self.len += 1;
    }

    /// Lazily yields every entry whose box intersects `query` (edges included).
    ///
    /// Order is unspecified; see [`crate::ordering::sort_by_id`].
    pub fn query(&self, query: &BoundingBox) -> Intersecting<'_> {
        Intersecting::new(self, *query)
    }

    /// Every entry in the tree, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Leaf { entries } => Some(entries.iter()),
                Node::Internal { .. } => None,
            })
            .flatten()
    }

    /// Get shape statistics
    pub fn stats(&self) -> RTreeStats {
        let leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
        let leaf_fill_factor = if self.len == 0 {
            0.0
        } else {
            self.len as f64 / (leaf_count * self.config.max_entries()) as f64
        };

        RTreeStats {
            total_entries: self.len,
            node_count: self.nodes.len(),
            leaf_count,
            tree_height: self.height,
            leaf_fill_factor,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Box of a non-empty node; only the root may be empty and it has no parent.
    fn node_bbox(&self, id: NodeId) -> BoundingBox {
        let node = &self.nodes[id];
        debug_assert!(!node.is_empty(), "child node {} is empty", id);
        node.compute_bbox().unwrap_or_default()
    }

    /// Choose the best leaf node for insertion, recording `(parent, child index)` pairs.
    fn choose_leaf(&self, bbox: &BoundingBox, path: &mut Vec<(NodeId, usize)>) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.nodes[current] {
                Node::Leaf { .. } => return current,
                Node::Internal { children, .. } => {
                    // Choose child with minimum enlargement
                    let mut best_idx = 0;
                    let mut best_enlargement = f64::INFINITY;
                    let mut best_area = f64::INFINITY;

                    for (i, child) in children.iter().enumerate() {
                        let enlargement = child.bbox.enlargement(bbox);
                        let area = child.bbox.area();

                        if enlargement < best_enlargement
                            || (enlargement == best_enlargement && area < best_area)
                        {
                            best_enlargement = enlargement;
                            best_area = area;
                            best_idx = i;
                        }
                    }

                    path.push((current, best_idx));
                    current = children[best_idx].node;
                }
            }
        }
    }

    /// Insert entry into leaf, returns the new sibling if the leaf split
    fn insert_into_leaf(&mut self, leaf_id: NodeId, entry: Entry) -> Option<(NodeId, BoundingBox)> {
        let max = self.config.max_entries();
        let overflow = match &mut self.nodes[leaf_id] {
            Node::Leaf { entries } => {
                entries.push(entry);
                if entries.len() > max {
                    Some(std::mem::take(entries))
                } else {
                    None
                }
            }
            Node::Internal { .. } => unreachable!("choose_leaf always stops at a leaf"),
        }?;

        let (remaining, moved) = quadratic_split(overflow, self.config.min_entries());
        log::debug!(
            "Split leaf {} into {} + {} entries",
            leaf_id,
            remaining.len(),
            moved.len()
        );
        self.nodes[leaf_id] = Node::Leaf { entries: remaining };

        let new_node = Node::Leaf { entries: moved };
        let new_bbox = new_node.compute_bbox().unwrap_or_default();
        Some((self.allocate(new_node), new_bbox))
    }

    /// Propagate split up the tree
    fn propagate_split(
        &mut self,
        path: &[(NodeId, usize)],
        mut new_node: NodeId,
        mut new_bbox: BoundingBox,
    ) {
        let max = self.config.max_entries();

        for (depth, &(parent_id, child_idx)) in path.iter().enumerate().rev() {
            let child_bbox = match &self.nodes[parent_id] {
                Node::Internal { children, .. } => self.node_bbox(children[child_idx].node),
                Node::Leaf { .. } => unreachable!("insertion path only holds internal nodes"),
            };

            let overflow = match &mut self.nodes[parent_id] {
                Node::Internal { children, level } => {
                    children[child_idx].bbox = child_bbox;
                    children.push(ChildRef {
                        bbox: new_bbox,
                        node: new_node,
                    });
                    if children.len() > max {
                        Some((std::mem::take(children), *level))
                    } else {
                        None
                    }
                }
                Node::Leaf { .. } => unreachable!("insertion path only holds internal nodes"),
            };

            let Some((children, level)) = overflow else {
                // Absorbed: the ancestors above only need their boxes refreshed
                self.update_path_bboxes(&path[..depth]);
                return;
            };

            let (remaining, moved) = quadratic_split(children, self.config.min_entries());
            log::debug!(
                "Split internal node {} at level {} into {} + {} children",
                parent_id,
                level,
                remaining.len(),
                moved.len()
            );
            self.nodes[parent_id] = Node::Internal {
                children: remaining,
                level,
            };
            let sibling = Node::Internal {
                children: moved,
                level,
            };
            new_bbox = sibling.compute_bbox().unwrap_or_default();
            new_node = self.allocate(sibling);
        }

        self.grow_root(new_node, new_bbox);
    }

    /// Need to create new root above the old one and its new sibling
    fn grow_root(&mut self, new_node: NodeId, new_bbox: BoundingBox) {
        let old_root = self.root;
        let old_root_bbox = self.node_bbox(old_root);

        let new_root = Node::Internal {
            children: vec![
                ChildRef {
                    bbox: old_root_bbox,
                    node: old_root,
                },
                ChildRef {
                    bbox: new_bbox,
                    node: new_node,
                },
            ],
            level: self.height,
        };

        self.root = self.allocate(new_root);
        self.height += 1;
        log::debug!("R-Tree root split, height is now {}", self.height);
    }

    /// Update bounding boxes along the insertion path
    fn update_path_bboxes(&mut self, path: &[(NodeId, usize)]) {
        for &(parent_id, child_idx) in path.iter().rev() {
            let child = match &self.nodes[parent_id] {
                Node::Internal { children, .. } => children[child_idx].node,
                Node::Leaf { .. } => continue,
            };
            let child_bbox = self.node_bbox(child);
            if let Node::Internal { children, .. } = &mut self.nodes[parent_id] {
                children[child_idx].bbox = child_bbox;
            }
        }
    }
}
