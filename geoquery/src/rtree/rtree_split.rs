//! Guttman's quadratic split, shared by leaves and internal nodes.

use super::rtree_types::{ChildRef, Entry};
use crate::bounding_box::BoundingBox;

/// Anything a node can hold: it only needs a box to be split.
pub(crate) trait Bounded {
    fn bounds(&self) -> &BoundingBox;
}

impl Bounded for Entry {
    fn bounds(&self) -> &BoundingBox {
        self.bbox()
    }
}

impl Bounded for ChildRef {
    fn bounds(&self) -> &BoundingBox {
        &self.bbox
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    First,
    Second,
}

struct GroupState<T> {
    items: Vec<T>,
    bbox: BoundingBox,
}

impl<T: Bounded> GroupState<T> {
    fn seeded(seed: T) -> Self {
        let bbox = *seed.bounds();
        Self {
            items: vec![seed],
            bbox,
        }
    }

    fn push(&mut self, item: T) {
        self.bbox.expand(item.bounds());
        self.items.push(item);
    }
}

/// Splits an overflowing node's items into two groups of at least
/// `min_entries` each.
///
/// Seeds are the pair wasting the most area when covered together. Remaining
/// items are assigned one at a time, always taking the item with the strongest
/// preference for one group. Once a group needs every remaining item to reach
/// `min_entries`, it receives them all.
pub(crate) fn quadratic_split<T: Bounded>(mut items: Vec<T>, min_entries: usize) -> (Vec<T>, Vec<T>) {
    debug_assert!(items.len() >= 2, "split needs at least two items");

    let (i, j) = pick_seeds(&items);
    // j > i, so removing j first keeps i valid
    let second_seed = items.remove(j);
    let first_seed = items.remove(i);

    let mut first = GroupState::seeded(first_seed);
    let mut second = GroupState::seeded(second_seed);

    while !items.is_empty() {
        let remaining = items.len();
        if first.items.len() + remaining <= min_entries {
            items.drain(..).for_each(|item| first.push(item));
            break;
        }
        if second.items.len() + remaining <= min_entries {
            items.drain(..).for_each(|item| second.push(item));
            break;
        }

        let (idx, group) = pick_next(&items, &first, &second);
        let item = items.remove(idx);
        match group {
            Group::First => first.push(item),
            Group::Second => second.push(item),
        }
    }

    (first.items, second.items)
}

/// Pair whose covering box wastes the most area.
fn pick_seeds<T: Bounded>(items: &[T]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut max_waste = f64::NEG_INFINITY;

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let a = items[i].bounds();
            let b = items[j].bounds();
            let waste = a.union(b).area() - a.area() - b.area();
            if waste > max_waste {
                max_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// Item with the greatest difference in enlargement cost, and the group it goes to.
fn pick_next<T: Bounded>(
    items: &[T],
    first: &GroupState<T>,
    second: &GroupState<T>,
) -> (usize, Group) {
    let mut best_idx = 0;
    let mut best_diff = f64::NEG_INFINITY;
    let mut best_group = Group::First;

    for (idx, item) in items.iter().enumerate() {
        let d1 = first.bbox.enlargement(item.bounds());
        let d2 = second.bbox.enlargement(item.bounds());
        let diff = (d1 - d2).abs();
        if diff > best_diff {
            best_diff = diff;
            best_idx = idx;
            best_group = select_group(d1, d2, first, second);
        }
    }
    (best_idx, best_group)
}

/// Least enlargement, then smaller area, then fewer members, then the first group.
fn select_group<T>(d1: f64, d2: f64, first: &GroupState<T>, second: &GroupState<T>) -> Group {
    if d1 < d2 {
        return Group::First;
    }
    if d2 < d1 {
        return Group::Second;
    }
    let (a1, a2) = (first.bbox.area(), second.bbox.area());
    if a1 < a2 {
        return Group::First;
    }
    if a2 < a1 {
        return Group::Second;
    }
    if second.items.len() < first.items.len() {
        Group::Second
    } else {
        Group::First
    }
}
