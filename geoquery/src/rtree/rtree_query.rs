//! Lazy intersection search.

use super::rtree_impl::RTree;
use super::rtree_types::{Entry, Node, NodeId};
use crate::bounding_box::BoundingBox;
use std::slice;

/// Iterator over the entries of an [`RTree`] whose box intersects a query box.
///
/// Subtrees whose box misses the query are never visited. Nodes are walked
/// depth-first with an explicit stack, so the iterator holds no recursion and
/// yields the first hit before the rest of the tree is touched.
pub struct Intersecting<'a> {
    tree: &'a RTree,
    query: BoundingBox,
    stack: Vec<NodeId>,
    current: slice::Iter<'a, Entry>,
}

impl<'a> Intersecting<'a> {
    pub(crate) fn new(tree: &'a RTree, query: BoundingBox) -> Self {
        Self {
            tree,
            query,
            stack: vec![tree.root],
            current: Default::default(),
        }
    }

    /// The box this iterator searches for.
    pub fn query(&self) -> &BoundingBox {
        &self.query
    }
}

impl<'a> Iterator for Intersecting<'a> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            for entry in self.current.by_ref() {
                if entry.bbox().intersects(&self.query) {
                    return Some(*entry);
                }
            }

            let node_id = self.stack.pop()?;
            match self.tree.node(node_id) {
                Node::Leaf { entries } => self.current = entries.iter(),
                Node::Internal { children, .. } => {
                    // Only descend into children whose bbox intersects query
                    let query = self.query;
                    self.stack.extend(
                        children
                            .iter()
                            .filter(|child| child.bbox.intersects(&query))
                            .map(|child| child.node),
                    );
                }
            }
        }
    }
}
