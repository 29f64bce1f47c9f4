use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a requested (vertex_count, edge_count) pair cannot describe a
/// connected simple undirected graph.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SpecViolation {
    #[error("too few edges: {edge_count} < {minimum} needed to connect {vertex_count} vertices")]
    TooFewEdges {
        vertex_count: usize,
        edge_count: usize,
        minimum: usize,
    },
    #[error("too many edges: {edge_count} > {maximum} possible on {vertex_count} vertices")]
    TooManyEdges {
        vertex_count: usize,
        edge_count: usize,
        maximum: usize,
    },
    #[error("edge capacity of {vertex_count} vertices does not fit in usize")]
    CapacityOverflow { vertex_count: usize },
}

/// Error type for graph construction, generation and isomorphism queries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphIsoError {
    #[error("invalid graph spec: {0}")]
    InvalidGraphSpec(SpecViolation),
    #[error("invalid vertex index: {0}")]
    InvalidVertexIndex(String),
    #[error("finalize failed: {0}")]
    FinalizeFailed(String),
    #[error("incomparable graphs: {some} vertices vs {other} vertices")]
    IncomparableGraphs { some: usize, other: usize },
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Stable discriminant of [`GraphIsoError`], used in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidGraphSpec,
    InvalidVertexIndex,
    FinalizeFailed,
    IncomparableGraphs,
    InvalidPermutation,
    InvalidInput,
    Io,
}

impl GraphIsoError {
    pub fn too_few_edges(vertex_count: usize, edge_count: usize) -> Self {
        GraphIsoError::InvalidGraphSpec(SpecViolation::TooFewEdges {
            vertex_count,
            edge_count,
            minimum: vertex_count.saturating_sub(1),
        })
    }

    pub fn too_many_edges(vertex_count: usize, edge_count: usize, maximum: usize) -> Self {
        GraphIsoError::InvalidGraphSpec(SpecViolation::TooManyEdges {
            vertex_count,
            edge_count,
            maximum,
        })
    }

    pub fn capacity_overflow(vertex_count: usize) -> Self {
        GraphIsoError::InvalidGraphSpec(SpecViolation::CapacityOverflow { vertex_count })
    }

    pub fn invalid_vertex<T: Into<String>>(msg: T) -> Self {
        GraphIsoError::InvalidVertexIndex(msg.into())
    }

    pub fn finalize_failed<T: Into<String>>(msg: T) -> Self {
        GraphIsoError::FinalizeFailed(msg.into())
    }

    pub fn incomparable(some: usize, other: usize) -> Self {
        GraphIsoError::IncomparableGraphs { some, other }
    }

    pub fn invalid_permutation<T: Into<String>>(msg: T) -> Self {
        GraphIsoError::InvalidPermutation(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GraphIsoError::InvalidInput(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        GraphIsoError::Io(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphIsoError::InvalidGraphSpec(_) => ErrorKind::InvalidGraphSpec,
            GraphIsoError::InvalidVertexIndex(_) => ErrorKind::InvalidVertexIndex,
            GraphIsoError::FinalizeFailed(_) => ErrorKind::FinalizeFailed,
            GraphIsoError::IncomparableGraphs { .. } => ErrorKind::IncomparableGraphs,
            GraphIsoError::InvalidPermutation(_) => ErrorKind::InvalidPermutation,
            GraphIsoError::InvalidInput(_) => ErrorKind::InvalidInput,
            GraphIsoError::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_edges_reports_minimum() {
        let err = GraphIsoError::too_few_edges(5, 2);
        assert_eq!(
            err,
            GraphIsoError::InvalidGraphSpec(SpecViolation::TooFewEdges {
                vertex_count: 5,
                edge_count: 2,
                minimum: 4,
            })
        );
        assert_eq!(err.kind(), ErrorKind::InvalidGraphSpec);
        assert!(err.to_string().contains("too few edges"));
    }

    #[test]
    fn test_io_errors_have_their_own_kind() {
        let err = GraphIsoError::io("disk full");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_ne!(err.kind(), GraphIsoError::invalid_input("disk full").kind());
        assert_eq!(err.to_string(), "io error: disk full");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let kind = GraphIsoError::incomparable(3, 4).kind();
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            "\"incomparable_graphs\""
        );
    }
}
