//! SpatialIndex trait definition and its implementations.

use crate::bounding_box::BoundingBox;
use crate::ordering::sort_by_id;
use crate::rtree::{Entry, RTree, RTreeConfig};
use parking_lot::RwLock;
use std::sync::Arc;

/// A collection of entries answering rectangle intersection queries.
pub trait SpatialIndex {
    /// Adds an entry. Duplicates are kept.
    fn insert(&mut self, entry: Entry);

    /// Entries whose box intersects `query`, in unspecified order.
    fn query<'a>(&'a self, query: &BoundingBox) -> Box<dyn Iterator<Item = Entry> + 'a>;

    /// Gets the number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Intersecting entries in ascending id order.
    fn query_sorted(&self, query: &BoundingBox) -> Vec<Entry> {
        sort_by_id(self.query(query))
    }
}

impl SpatialIndex for RTree {
    fn insert(&mut self, entry: Entry) {
        RTree::insert(self, entry)
    }

    fn query<'a>(&'a self, query: &BoundingBox) -> Box<dyn Iterator<Item = Entry> + 'a> {
        Box::new(RTree::query(self, query))
    }

    fn len(&self) -> usize {
        RTree::len(self)
    }
}

/// Brute-force index: a plain list scanned on every query.
///
/// Used as the reference the R-Tree is checked against.
#[derive(Debug, Clone, Default)]
pub struct LinearIndex {
    entries: Vec<Entry>,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<Entry> for LinearIndex {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl SpatialIndex for LinearIndex {
    fn insert(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    fn query<'a>(&'a self, query: &BoundingBox) -> Box<dyn Iterator<Item = Entry> + 'a> {
        let query = *query;
        Box::new(
            self.entries
                .iter()
                .filter(move |entry| entry.bbox().intersects(&query))
                .copied(),
        )
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// An [`RTree`] behind a read-write lock, shareable across threads.
///
/// Inserts take the write lock; queries take the read lock and collect their
/// results before releasing it.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<RTree>>,
}

impl SharedIndex {
    pub fn new(config: RTreeConfig) -> Self {
        Self::from_tree(RTree::with_config(config))
    }

    pub fn from_tree(tree: RTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn insert(&self, entry: Entry) {
        self.inner.write().insert(entry);
    }

    /// Intersecting entries in ascending id order.
    pub fn query_sorted(&self, query: &BoundingBox) -> Vec<Entry> {
        let tree = self.inner.read();
        sort_by_id(tree.query(query))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with shared access to the tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&RTree) -> R) -> R {
        f(&self.inner.read())
    }
}
