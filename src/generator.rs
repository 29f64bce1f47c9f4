//! Random connected simple graphs with exact vertex and edge counts.

use ahash::AHashSet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    adjacency::{AdjacencySet, VertexId},
    errors::GraphIsoError,
    graph::Graph,
    random::RandomSource,
};

/// Requested size of a generated graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub vertex_count: usize,
    pub edge_count: usize,
}

impl GraphSpec {
    pub fn new(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertex_count,
            edge_count,
        }
    }

    /// Checks that a connected simple undirected graph of this size exists.
    pub fn validate(&self) -> Result<(), GraphIsoError> {
        if self.edge_count < self.vertex_count.saturating_sub(1) {
            return Err(GraphIsoError::too_few_edges(
                self.vertex_count,
                self.edge_count,
            ));
        }
        let maximum = self.capacity()?;
        if self.edge_count > maximum {
            return Err(GraphIsoError::too_many_edges(
                self.vertex_count,
                self.edge_count,
                maximum,
            ));
        }
        Ok(())
    }

    /// Undirected capacity of the requested vertex count.
    pub fn capacity(&self) -> Result<usize, GraphIsoError> {
        max_edges(self.vertex_count)
            .ok_or_else(|| GraphIsoError::capacity_overflow(self.vertex_count))
    }

    /// Targets above half the undirected capacity are built by removal.
    pub fn is_dense(&self) -> bool {
        max_edges(self.vertex_count).is_some_and(|maximum| self.edge_count > maximum / 2)
    }
}

/// Undirected capacity `n * (n - 1) / 2`, or `None` when it does not fit in
/// a `usize`.
pub fn max_edges(vertex_count: usize) -> Option<usize> {
    let below = vertex_count.saturating_sub(1);
    if vertex_count % 2 == 0 {
        (vertex_count / 2).checked_mul(below)
    } else {
        vertex_count.checked_mul(below / 2)
    }
}

/// Generates a finalized, connected, simple undirected graph with exactly
/// `edge_count` edges.
///
/// Rejected samples (self-loops, repeats) are redrawn, so the number of
/// draws is unbounded in principle; valid inputs terminate with probability 1.
pub fn generate<A, R>(
    vertex_count: usize,
    edge_count: usize,
    rng: &mut R,
) -> Result<Graph<A>, GraphIsoError>
where
    A: AdjacencySet,
    R: RandomSource,
{
    let spec = GraphSpec::new(vertex_count, edge_count);
    spec.validate()?;
    let capacity = spec.capacity()?;

    let forced = spanning_edges(vertex_count, rng);
    let edges = if spec.is_dense() {
        dense_edges(&spec, capacity, &forced, rng)
    } else {
        sparse_edges(&spec, forced, rng)
    };
    debug!(
        "generated {} edges on {} vertices ({} phase)",
        edges.len(),
        vertex_count,
        if spec.is_dense() { "dense" } else { "sparse" }
    );

    let mut graph = Graph::new(vertex_count);
    for (u, v) in edges {
        graph.add_edge(u, v)?;
    }
    graph.finalize()?;
    Ok(graph)
}

/// Random attachment tree: position prefix `0..i` always holds the vertices
/// already connected, so each step joins one new vertex to that component.
fn spanning_edges<R: RandomSource>(
    vertex_count: usize,
    rng: &mut R,
) -> Vec<(VertexId, VertexId)> {
    let mut permutation: Vec<VertexId> = (0..vertex_count).collect();
    let mut edges = Vec::with_capacity(vertex_count.saturating_sub(1));
    for i in 1..vertex_count {
        let i1 = rng.next_in(0, i - 1);
        let i2 = rng.next_in(i, vertex_count - 1);
        edges.push(ordered(permutation[i1], permutation[i2]));
        permutation.swap(i, i2);
    }
    edges
}

fn sparse_edges<R: RandomSource>(
    spec: &GraphSpec,
    forced: Vec<(VertexId, VertexId)>,
    rng: &mut R,
) -> Vec<(VertexId, VertexId)> {
    let mut chosen: AHashSet<(VertexId, VertexId)> = forced.into_iter().collect();
    while chosen.len() < spec.edge_count {
        if let Some(pair) = sample_pair(spec.vertex_count, rng) {
            chosen.insert(pair);
        }
    }
    let mut edges: Vec<_> = chosen.into_iter().collect();
    edges.sort_unstable();
    edges
}

/// Complete graph minus a random set of non-forced pairs.
fn dense_edges<R: RandomSource>(
    spec: &GraphSpec,
    capacity: usize,
    forced: &[(VertexId, VertexId)],
    rng: &mut R,
) -> Vec<(VertexId, VertexId)> {
    let n = spec.vertex_count;
    let forced: AHashSet<(VertexId, VertexId)> = forced.iter().copied().collect();
    let target_removed = capacity - spec.edge_count;
    let mut removable = AHashSet::with_capacity(target_removed);
    while removable.len() < target_removed {
        if let Some(pair) = sample_pair(n, rng) {
            if !forced.contains(&pair) {
                removable.insert(pair);
            }
        }
    }
    let mut edges = Vec::with_capacity(spec.edge_count);
    for u in 0..n {
        for v in (u + 1)..n {
            if !removable.contains(&(u, v)) {
                edges.push((u, v));
            }
        }
    }
    edges
}

fn sample_pair<R: RandomSource>(vertex_count: usize, rng: &mut R) -> Option<(VertexId, VertexId)> {
    let i1 = rng.next_in(0, vertex_count - 1);
    let i2 = rng.next_in(0, vertex_count - 1);
    if i1 == i2 { None } else { Some(ordered(i1, i2)) }
}

fn ordered(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b { (a, b) } else { (b, a) }
}
