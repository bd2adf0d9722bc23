//! Structural checks for an [`RTree`].

use super::rtree_impl::RTree;
use super::rtree_types::{Node, NodeId};

/// Result of [`RTree::check_integrity`]
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes reached from the root
    pub nodes_checked: usize,
    /// Total entries found in reachable leaves
    pub entries_checked: usize,
    /// Nodes in the arena that the root cannot reach
    pub orphaned_nodes: Vec<NodeId>,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_checked: 0,
            orphaned_nodes: Vec::new(),
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RTree {
    /// Verifies the R-Tree invariants.
    ///
    /// - Every non-root node holds between `min_entries` and `max_entries` items
    /// - An internal root has at least two children
    /// - All leaves sit at the same depth, equal to the tree height
    /// - Each child box is exactly the tight envelope of the child
    /// - Entry count matches [`RTree::len`] and no node is orphaned
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();
        let mut reached = vec![false; self.nodes.len()];
        let max = self.config.max_entries();
        let min = self.config.min_entries();

        // (node, depth from root, expected level)
        let mut stack = vec![(self.root, 1u32, self.height - 1)];
        while let Some((id, depth, expected_level)) = stack.pop() {
            if reached[id] {
                report.fail(format!("Node {} is reachable twice", id));
                continue;
            }
            reached[id] = true;
            report.nodes_checked += 1;

            let node = &self.nodes[id];
            let is_root = id == self.root;
            if node.len() > max {
                report.fail(format!("Node {} overflows: {} > {}", id, node.len(), max));
            }
            if !is_root && node.len() < min {
                report.fail(format!("Node {} underflows: {} < {}", id, node.len(), min));
            }
            if node.level() != expected_level {
                report.fail(format!(
                    "Node {} has level {}, expected {}",
                    id,
                    node.level(),
                    expected_level
                ));
            }

            match node {
                Node::Leaf { entries } => {
                    report.entries_checked += entries.len();
                    if depth != self.height {
                        report.fail(format!(
                            "Leaf {} at depth {}, tree height is {}",
                            id, depth, self.height
                        ));
                    }
                }
                Node::Internal { children, .. } => {
                    if is_root && children.len() < 2 {
                        report.fail(format!("Internal root has {} children", children.len()));
                    }
                    for child in children {
                        if child.node >= self.nodes.len() {
                            report.fail(format!("Node {} points at missing node {}", id, child.node));
                            continue;
                        }
                        let actual = self.nodes[child.node].compute_bbox();
                        if actual != Some(child.bbox) {
                            report.fail(format!(
                                "Child {} of node {} has box {}, tight box is {:?}",
                                child.node, id, child.bbox, actual
                            ));
                        }
                        stack.push((child.node, depth + 1, expected_level.saturating_sub(1)));
                    }
                }
            }
        }

        if report.entries_checked != self.len {
            report.fail(format!(
                "Found {} entries, tree reports {}",
                report.entries_checked, self.len
            ));
        }

        report.orphaned_nodes = reached
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(id, _)| id)
            .collect();
        if !report.orphaned_nodes.is_empty() {
            report.fail(format!("{} orphaned nodes", report.orphaned_nodes.len()));
        }

        if !report.is_valid {
            log::warn!("R-Tree integrity check failed: {:?}", report.errors);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_box::BoundingBox;
    use crate::rtree::rtree_types::{ChildRef, Entry};

    fn sample_tree() -> RTree {
        let mut tree = RTree::new();
        for i in 0..100 {
            let v = i as f64;
            tree.insert(Entry::new(BoundingBox::new(v, v, v + 2.0, v + 2.0), i));
        }
        tree
    }

    #[test]
    fn test_integrity_check_with_data() {
        let tree = sample_tree();
        let report = tree.check_integrity();
        assert!(report.is_valid, "{:?}", report.errors);
        assert_eq!(report.nodes_checked, tree.stats().node_count);
        assert_eq!(report.entries_checked, 100);
        assert!(report.orphaned_nodes.is_empty());
    }

    #[test]
    fn test_detects_loose_box() {
        let mut tree = sample_tree();
        let root = tree.root;
        if let Node::Internal { children, .. } = &mut tree.nodes[root] {
            children[0].bbox.max_x += 1.0;
        }
        let report = tree.check_integrity();
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("tight box")));
    }

    #[test]
    fn test_detects_orphan_and_count_mismatch() {
        let mut tree = sample_tree();
        tree.nodes.push(Node::Leaf {
            entries: vec![Entry::new(BoundingBox::point(0.0, 0.0), 1)],
        });
        tree.len += 1;

        let report = tree.check_integrity();
        assert!(!report.is_valid);
        assert_eq!(report.orphaned_nodes, vec![tree.nodes.len() - 1]);
    }

    #[test]
    fn test_detects_underflow() {
        let mut tree = sample_tree();
        let root = tree.root;
        let child = match &tree.nodes[root] {
            Node::Internal { children, .. } => children[0].node,
            Node::Leaf { .. } => unreachable!(),
        };
        let bbox = BoundingBox::point(-5.0, -5.0);
        tree.nodes[child] = Node::Internal {
            children: vec![ChildRef { bbox, node: 0 }],
            level: 1,
        };
        let report = tree.check_integrity();
        assert!(!report.is_valid);
    }
}
