//! Parallel Axis Steps
//!
//! Uses Rayon to evaluate one axis step from many context items at once.
//! Documents are immutable once finalized, so every worker reads the same
//! arrays without locking.

use rayon::prelude::*;

use crate::xdm::Item;
use crate::xpath::{Axis, NodeTest};

/// Apply an axis step to every context item in parallel, returning the
/// union in document order without duplicates
pub fn step_parallel(items: &[Item], axis: Axis, test: Option<&NodeTest>) -> Vec<Item> {
    let mut result: Vec<Item> = items
        .par_iter()
        .flat_map_iter(|item| item.axis(axis, test.cloned()))
        .collect();
    result.par_sort_unstable();
    result.dedup();
    result
}

/// Map every item in parallel, keeping input order
pub fn map_parallel<F, T>(items: &[Item], mapper: F) -> Vec<T>
where
    F: Fn(&Item) -> T + Sync + Send,
    T: Send,
{
    items.par_iter().map(mapper).collect()
}
