//! Random connected graph generation and exact isomorphism search.
//!
//! graphiso builds simple undirected graphs with a prescribed number of
//! vertices and edges, relabels them with random permutations, and decides
//! whether two graphs of equal order are isomorphic by a backtracking search
//! that returns a witnessing vertex bijection.
//!
//! # Quick Start
//!
//! ```rust
//! use graphiso::{Graph, Permutation, apply_permutation, find_isomorphism, generate, seeded,
//!     structurally_equals_under};
//!
//! let mut rng = seeded(42);
//! let graph: Graph = generate(12, 20, &mut rng)?;
//! let relabeled = apply_permutation(&graph, &Permutation::random(12, &mut rng))?;
//!
//! let outcome = find_isomorphism(&graph, &relabeled)?;
//! let mapping = outcome.mapping().expect("relabeled graphs are isomorphic");
//! assert!(structurally_equals_under(&graph, &relabeled, mapping));
//! # Ok::<(), graphiso::GraphIsoError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`adjacency`] - per-vertex neighbor sets ([`SortedAdjacency`], [`HashedAdjacency`])
//! - [`graph`] - [`Graph`] and [`GraphVertex`]
//! - [`generator`] - [`generate()`] connected graphs with exact edge counts
//! - [`permutation`] - relabeling and the label-aware equality oracle
//! - [`isomorphism`] - the backtracking solver
//! - [`dump`] - JSON-lines persistence
//! - [`harness`] - batched generate/relabel/solve/verify trials

pub mod adjacency;
pub mod client;
pub mod config;
pub mod dump;
pub mod errors;
pub mod generator;
pub mod graph;
pub mod harness;
pub mod isomorphism;
pub mod permutation;
pub mod random;

mod nogood;

pub use adjacency::{AdjacencySet, HashedAdjacency, SortedAdjacency, VertexId};
pub use config::{AdjacencyKind, HarnessConfig, SearchConfig};
pub use dump::{dump_graph_to_path, dump_graph_to_writer, load_graph_from_path, load_graph_from_reader};
pub use errors::{ErrorKind, GraphIsoError, SpecViolation};
pub use generator::{GraphSpec, generate, max_edges};
pub use graph::{Graph, GraphVertex};
pub use harness::{HarnessSummary, TrialReport, run_trials};
pub use isomorphism::{
    IsoOutcome, IsomorphismSearch, IsomorphismSolver, SearchStats, count_automorphisms,
    enumerate_isomorphisms, find_isomorphism,
};
pub use permutation::{Permutation, apply_permutation, structurally_equals_under};
pub use random::{RandomSource, seeded};
