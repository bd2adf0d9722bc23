//! Deterministic ordering of query results.

use crate::rtree::{Entry, FeatureId};

/// Collects entries and sorts them by ascending feature id.
///
/// The sort is stable, so entries sharing an id keep their encounter order.
pub fn sort_by_id<I>(entries: I) -> Vec<Entry>
where
    I: IntoIterator<Item = Entry>,
{
    let mut sorted: Vec<Entry> = entries.into_iter().collect();
    sorted.sort_by_key(Entry::id);
    sorted
}

/// Feature ids of `entries`, in the given order.
pub fn ids(entries: &[Entry]) -> Vec<FeatureId> {
    entries.iter().map(Entry::id).collect()
}
