use std::collections::VecDeque;

use crate::{
    adjacency::{AdjacencySet, HashedAdjacency, VertexId},
    errors::GraphIsoError,
};

/// A vertex is identified by its position in the owning [`Graph`]; it owns
/// exactly one neighbor set.
#[derive(Clone, Debug, Default)]
pub struct GraphVertex<A> {
    adjacency: A,
}

impl<A: AdjacencySet> GraphVertex<A> {
    pub fn adjacency(&self) -> &A {
        &self.adjacency
    }

    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }

    pub fn contains(&self, neighbor: VertexId) -> bool {
        self.adjacency.contains(neighbor)
    }
}

/// Simple undirected graph over the vertices `0..vertex_count`.
///
/// Adjacency is kept symmetric: `add_edge(u, v)` inserts into both sets and
/// self-loops are rejected. The vertex count is fixed at construction.
#[derive(Clone, Debug)]
pub struct Graph<A: AdjacencySet = HashedAdjacency> {
    vertices: Vec<GraphVertex<A>>,
}

impl<A: AdjacencySet> Graph<A> {
    /// # Panics
    /// Panics if storage for `vertex_count` vertices cannot be allocated;
    /// use [`Graph::try_new`] for untrusted sizes.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertices: vec![GraphVertex::default(); vertex_count],
        }
    }

    pub fn try_new(vertex_count: usize) -> Result<Self, GraphIsoError> {
        let mut vertices = Vec::new();
        vertices.try_reserve_exact(vertex_count).map_err(|e| {
            GraphIsoError::invalid_input(format!("cannot allocate {vertex_count} vertices: {e}"))
        })?;
        vertices.resize_with(vertex_count, GraphVertex::default);
        Ok(Self { vertices })
    }

    /// Builds and finalizes a graph from an undirected edge list.
    pub fn from_edges(
        vertex_count: usize,
        edges: &[(VertexId, VertexId)],
    ) -> Result<Self, GraphIsoError> {
        let mut graph = Self::new(vertex_count);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        graph.finalize()?;
        Ok(graph)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> Result<(), GraphIsoError> {
        let count = self.vertices.len();
        if u >= count || v >= count {
            return Err(GraphIsoError::invalid_vertex(format!(
                "edge ({u}, {v}) outside 0..{count}"
            )));
        }
        if u == v {
            return Err(GraphIsoError::invalid_vertex(format!("self-loop at {u}")));
        }
        self.vertices[u].adjacency.insert(v);
        self.vertices[v].adjacency.insert(u);
        Ok(())
    }

    pub fn finalize(&mut self) -> Result<(), GraphIsoError> {
        for (idx, vertex) in self.vertices.iter_mut().enumerate() {
            vertex
                .adjacency
                .finalize()
                .map_err(|e| GraphIsoError::finalize_failed(format!("vertex {idx}: {e}")))?;
        }
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.vertices.iter().all(|v| v.adjacency.is_finalized())
    }

    /// True iff `v` is in the neighbor set of `u`. Out-of-range `u` is not adjacent to anything.
    pub fn find(&self, u: VertexId, v: VertexId) -> bool {
        self.vertices
            .get(u)
            .is_some_and(|vertex| vertex.adjacency.contains(v))
    }

    pub fn vertex(&self, idx: VertexId) -> Option<&GraphVertex<A>> {
        self.vertices.get(idx)
    }

    pub fn adjacency(&self, v: VertexId) -> Option<&A> {
        self.vertices.get(v).map(GraphVertex::adjacency)
    }

    /// Out-of-range vertices have degree 0.
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices.get(v).map_or(0, GraphVertex::degree)
    }

    /// Neighbors of `v` in ascending order; empty when `v` is out of range.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .get(v)
            .into_iter()
            .flat_map(|vertex| vertex.adjacency.iter())
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(GraphVertex::degree).sum::<usize>() / 2
    }

    /// Every undirected edge once, as `(u, v)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices.iter().enumerate().flat_map(|(u, vertex)| {
            vertex
                .adjacency
                .iter()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    pub fn degree_sequence(&self) -> Vec<usize> {
        self.vertices.iter().map(GraphVertex::degree).collect()
    }

    pub fn is_connected(&self) -> bool {
        if self.vertices.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.vertices.len()];
        let mut queue = VecDeque::new();
        seen[0] = true;
        queue.push_back(0);
        let mut reached = 1;
        while let Some(node) = queue.pop_front() {
            for next in self.neighbors(node) {
                if !seen[next] {
                    seen[next] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        reached == self.vertices.len()
    }

    /// Label-preserving equality: same vertex count, same per-index degree,
    /// and every edge of `self` present in `other` at identical indices.
    /// This is not an isomorphism test.
    pub fn structurally_equals<B: AdjacencySet>(&self, other: &Graph<B>) -> bool {
        if self.vertex_count() != other.vertex_count() {
            return false;
        }
        if (0..self.vertex_count()).any(|v| self.degree(v) != other.degree(v)) {
            return false;
        }
        self.edges().all(|(u, v)| other.find(u, v))
    }
}

impl<A: AdjacencySet, B: AdjacencySet> PartialEq<Graph<B>> for Graph<A> {
    fn eq(&self, other: &Graph<B>) -> bool {
        self.structurally_equals(other)
    }
}
