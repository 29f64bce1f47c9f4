//! Per-vertex neighbor sets.
//!
//! Both implementations keep neighbors in a sorted `Vec` so enumeration is
//! always ascending; they differ in how `contains` is answered once the set
//! has been finalized.

use std::fmt;

use ahash::AHashSet;

use crate::errors::GraphIsoError;

pub type VertexId = usize;

/// Capability contract for the neighbor set owned by one graph vertex.
///
/// The end of an ascending enumeration is signalled by `None`.
pub trait AdjacencySet: Clone + Default + fmt::Debug {
    /// Adds `neighbor`; duplicates are ignored. Invalidates finalization.
    fn insert(&mut self, neighbor: VertexId);

    fn contains(&self, neighbor: VertexId) -> bool;

    /// Neighbors in ascending order.
    fn as_slice(&self) -> &[VertexId];

    /// Builds the fast-lookup representation.
    fn finalize(&mut self) -> Result<(), GraphIsoError>;

    fn is_finalized(&self) -> bool;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first(&self) -> Option<VertexId> {
        self.as_slice().first().copied()
    }

    /// Smallest neighbor strictly greater than `cursor`.
    fn next_after(&self, cursor: VertexId) -> Option<VertexId> {
        let slice = self.as_slice();
        let idx = slice.partition_point(|&n| n <= cursor);
        slice.get(idx).copied()
    }

    fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, VertexId>> {
        self.as_slice().iter().copied()
    }
}

/// Sorted vector answering `contains` by binary search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedAdjacency {
    neighbors: Vec<VertexId>,
    finalized: bool,
}

impl AdjacencySet for SortedAdjacency {
    fn insert(&mut self, neighbor: VertexId) {
        if insert_sorted(&mut self.neighbors, neighbor) {
            self.finalized = false;
        }
    }

    fn contains(&self, neighbor: VertexId) -> bool {
        self.neighbors.binary_search(&neighbor).is_ok()
    }

    fn as_slice(&self) -> &[VertexId] {
        &self.neighbors
    }

    fn finalize(&mut self) -> Result<(), GraphIsoError> {
        ensure_ascending(&self.neighbors)?;
        self.neighbors.shrink_to_fit();
        self.finalized = true;
        Ok(())
    }

    fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// Sorted vector for enumeration plus a hash set for O(1) expected lookups
/// after finalization.
#[derive(Clone, Default)]
pub struct HashedAdjacency {
    neighbors: Vec<VertexId>,
    lookup: Option<AHashSet<VertexId>>,
}

impl fmt::Debug for HashedAdjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedAdjacency")
            .field("neighbors", &self.neighbors)
            .field("finalized", &self.lookup.is_some())
            .finish()
    }
}

impl AdjacencySet for HashedAdjacency {
    fn insert(&mut self, neighbor: VertexId) {
        if insert_sorted(&mut self.neighbors, neighbor) {
            self.lookup = None;
        }
    }

    fn contains(&self, neighbor: VertexId) -> bool {
        match &self.lookup {
            Some(lookup) => lookup.contains(&neighbor),
            None => self.neighbors.binary_search(&neighbor).is_ok(),
        }
    }

    fn as_slice(&self) -> &[VertexId] {
        &self.neighbors
    }

    fn finalize(&mut self) -> Result<(), GraphIsoError> {
        ensure_ascending(&self.neighbors)?;
        let mut lookup = AHashSet::new();
        lookup.try_reserve(self.neighbors.len()).map_err(|e| {
            GraphIsoError::finalize_failed(format!(
                "cannot reserve lookup for {} neighbors: {e}",
                self.neighbors.len()
            ))
        })?;
        lookup.extend(self.neighbors.iter().copied());
        self.lookup = Some(lookup);
        Ok(())
    }

    fn is_finalized(&self) -> bool {
        self.lookup.is_some()
    }
}

fn insert_sorted(neighbors: &mut Vec<VertexId>, neighbor: VertexId) -> bool {
    match neighbors.binary_search(&neighbor) {
        Ok(_) => false,
        Err(pos) => {
            neighbors.insert(pos, neighbor);
            true
        }
    }
}

fn ensure_ascending(neighbors: &[VertexId]) -> Result<(), GraphIsoError> {
    match neighbors.windows(2).find(|pair| pair[0] >= pair[1]) {
        Some(pair) => Err(GraphIsoError::finalize_failed(format!(
            "neighbor list not strictly ascending at {} -> {}",
            pair[0], pair[1]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled<A: AdjacencySet>(values: &[VertexId]) -> A {
        let mut set = A::default();
        for &v in values {
            set.insert(v);
        }
        set
    }

    fn check_contract<A: AdjacencySet>() {
        let mut set: A = filled(&[7, 2, 9, 2, 4]);
        assert_eq!(set.as_slice(), &[2, 4, 7, 9]);
        assert!(!set.is_finalized());
        assert!(set.contains(7));
        assert!(!set.contains(3));

        set.finalize().expect("finalize");
        assert!(set.is_finalized());
        assert!(set.contains(9));
        assert!(!set.contains(8));

        assert_eq!(set.first(), Some(2));
        assert_eq!(set.next_after(2), Some(4));
        assert_eq!(set.next_after(5), Some(7));
        assert_eq!(set.next_after(9), None);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 4, 7, 9]);

        let clone = set.clone();
        set.insert(1);
        assert!(!set.is_finalized());
        assert!(set.contains(1));
        assert!(clone.is_finalized());
        assert!(!clone.contains(1));
        assert_eq!(clone.len(), 4);
    }

    #[test]
    fn test_sorted_adjacency_contract() {
        check_contract::<SortedAdjacency>();
    }

    #[test]
    fn test_hashed_adjacency_contract() {
        check_contract::<HashedAdjacency>();
    }

    #[test]
    fn test_empty_set_enumerates_nothing() {
        let set = HashedAdjacency::default();
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert_eq!(set.next_after(0), None);
    }

    #[test]
    fn test_ensure_ascending_rejects_duplicates() {
        let err = ensure_ascending(&[1, 3, 3]).unwrap_err();
        assert!(matches!(err, GraphIsoError::FinalizeFailed(_)));
    }
}
