use std::hash::Hash;

use ahash::AHashMap;

use crate::{adjacency::AdjacencySet, graph::Graph};

/// Cheap invariants two isomorphic graphs must share. `None` means the pair
/// can be rejected without searching.
pub(crate) fn nogood<A: AdjacencySet, B: AdjacencySet>(
    some_graph: &Graph<A>,
    other_graph: &Graph<B>,
) -> Option<()> {
    if some_graph.edge_count() != other_graph.edge_count() {
        return None;
    }
    if !is_sorted_equal(
        &some_graph.degree_sequence(),
        &other_graph.degree_sequence(),
    ) {
        return None;
    }
    Some(())
}

/// Check that two slices are equal as multisets.
fn is_sorted_equal<T: Eq + Hash>(x: &[T], y: &[T]) -> bool {
    if x.len() != y.len() {
        return false;
    }

    let mut counts = AHashMap::new();
    for item in x {
        *counts.entry(item).or_insert(0usize) += 1;
    }
    for item in y {
        match counts.get_mut(item) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    true
}
