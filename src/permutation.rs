use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{
    adjacency::{AdjacencySet, VertexId},
    errors::GraphIsoError,
    graph::Graph,
    random::RandomSource,
};

/// A bijection on `0..len`, stored as `image[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<VertexId>", into = "Vec<VertexId>")]
pub struct Permutation(Vec<VertexId>);

impl Permutation {
    pub fn new(values: impl IntoIterator<Item = VertexId>) -> Result<Self, GraphIsoError> {
        let vec: Vec<VertexId> = values.into_iter().collect();
        let n = vec.len();
        let mut seen = vec![false; n];
        for (idx, &value) in vec.iter().enumerate() {
            if value >= n {
                return Err(GraphIsoError::invalid_permutation(format!(
                    "image {value} of {idx} outside 0..{n}"
                )));
            }
            if seen[value] {
                return Err(GraphIsoError::invalid_permutation(format!(
                    "image {value} repeated"
                )));
            }
            seen[value] = true;
        }
        Ok(Self(vec))
    }

    pub fn identity(size: usize) -> Self {
        Self((0..size).collect())
    }

    /// Identity shuffled by `2 * size` random transpositions.
    ///
    /// This is only approximately uniform over all permutations.
    pub fn random<R: RandomSource>(size: usize, rng: &mut R) -> Self {
        let mut values: Vec<VertexId> = (0..size).collect();
        if size == 0 {
            return Self(values);
        }
        for _ in 0..2 * size {
            let i1 = rng.next_in(0, size - 1);
            let i2 = rng.next_in(0, size - 1);
            values.swap(i1, i2);
        }
        Self(values)
    }

    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0; self.0.len()];
        for (idx, &value) in self.0.iter().enumerate() {
            inverse[value] = idx;
        }
        Self(inverse)
    }

    /// `self` followed by `next`: `i -> next[self[i]]`.
    pub fn then(&self, next: &Permutation) -> Result<Self, GraphIsoError> {
        if self.len() != next.len() {
            return Err(GraphIsoError::invalid_permutation(format!(
                "cannot compose sizes {} and {}",
                self.len(),
                next.len()
            )));
        }
        Ok(Self(self.0.iter().map(|&v| next.0[v]).collect()))
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(idx, &value)| idx == value)
    }

    pub fn into_inner(self) -> Vec<VertexId> {
        self.0
    }
}

impl Deref for Permutation {
    type Target = [VertexId];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<VertexId>> for Permutation {
    type Error = GraphIsoError;

    fn try_from(values: Vec<VertexId>) -> Result<Self, Self::Error> {
        Permutation::new(values)
    }
}

impl From<Permutation> for Vec<VertexId> {
    fn from(permutation: Permutation) -> Self {
        permutation.0
    }
}

/// Relabels vertex `i` of `graph` to `permutation[i]` in a fresh, finalized graph.
pub fn apply_permutation<A: AdjacencySet>(
    graph: &Graph<A>,
    permutation: &Permutation,
) -> Result<Graph<A>, GraphIsoError> {
    if permutation.len() != graph.vertex_count() {
        return Err(GraphIsoError::invalid_permutation(format!(
            "permutation of {} cannot relabel {} vertices",
            permutation.len(),
            graph.vertex_count()
        )));
    }
    let mut relabeled = Graph::new(graph.vertex_count());
    for (u, v) in graph.edges() {
        relabeled.add_edge(permutation[u], permutation[v])?;
    }
    relabeled.finalize()?;
    Ok(relabeled)
}

/// True iff `mapping` carries `some_graph` exactly onto `other_graph`:
/// counts match, `deg(i) == deg(mapping[i])`, and every edge `(u, v)` maps to
/// the edge `(mapping[u], mapping[v])`.
pub fn structurally_equals_under<A, B>(
    some_graph: &Graph<A>,
    other_graph: &Graph<B>,
    mapping: &[VertexId],
) -> bool
where
    A: AdjacencySet,
    B: AdjacencySet,
{
    let n = some_graph.vertex_count();
    if other_graph.vertex_count() != n || mapping.len() != n {
        return false;
    }
    if mapping.iter().any(|&image| image >= n) {
        return false;
    }
    if (0..n).any(|v| some_graph.degree(v) != other_graph.degree(mapping[v])) {
        return false;
    }
    some_graph
        .edges()
        .all(|(u, v)| other_graph.find(mapping[u], mapping[v]))
}
