//! Backtracking isomorphism search over an explicit frame stack.
//!
//! Each frame maps one source vertex (`outside_vertex`) of `some_graph` to a
//! candidate (`trial_vertex`) in `other_graph`. Candidates come from the
//! neighbors of an already-matched anchor's image when the source vertex has
//! a matched neighbor, otherwise from every unmatched vertex. A candidate is
//! accepted only if it is unused, has the same degree, and every matched
//! neighbor relation holds in both directions.

use std::time::Instant;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    adjacency::{AdjacencySet, VertexId},
    config::SearchConfig,
    errors::GraphIsoError,
    graph::Graph,
    nogood::nogood,
    permutation::Permutation,
};

/// Result of an isomorphism query that ran to a conclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IsoOutcome {
    /// `mapping[i]` is the vertex of `other_graph` matched to vertex `i`.
    Isomorphic(Permutation),
    NotIsomorphic,
    /// The configured step or time budget ran out before a conclusion.
    BudgetExhausted,
}

impl IsoOutcome {
    pub fn is_isomorphic(&self) -> bool {
        matches!(self, IsoOutcome::Isomorphic(_))
    }

    pub fn mapping(&self) -> Option<&Permutation> {
        match self {
            IsoOutcome::Isomorphic(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IsoOutcome::Isomorphic(_) => "isomorphic",
            IsoOutcome::NotIsomorphic => "not_isomorphic",
            IsoOutcome::BudgetExhausted => "search_aborted_budget",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search-loop iterations.
    pub steps: u64,
    /// Frames popped after their candidates ran out.
    pub backtracks: u64,
    pub max_depth: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct VertexSearchState {
    match_vertex: Option<VertexId>,
    /// Edges from this vertex into the currently matched set.
    border_edges: usize,
}

#[derive(Clone, Copy, Debug)]
struct SearchFrame {
    inside_vertex: Option<VertexId>,
    outside_vertex: VertexId,
    trial_vertex: Option<VertexId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Fresh,
    Matched,
    Exhausted,
    Aborted,
}

/// Stateless entry point; all mutable state lives in [`IsomorphismSearch`].
#[derive(Clone, Copy, Debug, Default)]
pub struct IsomorphismSolver {
    config: SearchConfig,
}

impl IsomorphismSolver {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Starts a resumable search. Fails with `IncomparableGraphs` before
    /// allocating anything when the vertex counts differ.
    pub fn search<'a, A, B>(
        &self,
        some_graph: &'a Graph<A>,
        other_graph: &'a Graph<B>,
    ) -> Result<IsomorphismSearch<'a, A, B>, GraphIsoError>
    where
        A: AdjacencySet,
        B: AdjacencySet,
    {
        IsomorphismSearch::new(some_graph, other_graph, self.config)
    }

    pub fn solve<A, B>(
        &self,
        some_graph: &Graph<A>,
        other_graph: &Graph<B>,
    ) -> Result<IsoOutcome, GraphIsoError>
    where
        A: AdjacencySet,
        B: AdjacencySet,
    {
        self.solve_with_stats(some_graph, other_graph)
            .map(|(outcome, _)| outcome)
    }

    pub fn solve_with_stats<A, B>(
        &self,
        some_graph: &Graph<A>,
        other_graph: &Graph<B>,
    ) -> Result<(IsoOutcome, SearchStats), GraphIsoError>
    where
        A: AdjacencySet,
        B: AdjacencySet,
    {
        let mut search = self.search(some_graph, other_graph)?;
        let outcome = search.next_match()?;
        Ok((outcome, search.stats()))
    }
}

/// Finds one isomorphism with an unbounded search.
pub fn find_isomorphism<A, B>(
    some_graph: &Graph<A>,
    other_graph: &Graph<B>,
) -> Result<IsoOutcome, GraphIsoError>
where
    A: AdjacencySet,
    B: AdjacencySet,
{
    IsomorphismSolver::default().solve(some_graph, other_graph)
}

/// Collects up to `limit` distinct isomorphisms.
pub fn enumerate_isomorphisms<A, B>(
    some_graph: &Graph<A>,
    other_graph: &Graph<B>,
    limit: usize,
) -> Result<Vec<Permutation>, GraphIsoError>
where
    A: AdjacencySet,
    B: AdjacencySet,
{
    let mut search = IsomorphismSolver::default().search(some_graph, other_graph)?;
    let mut mappings = Vec::new();
    while mappings.len() < limit {
        match search.next_match()? {
            IsoOutcome::Isomorphic(mapping) => mappings.push(mapping),
            IsoOutcome::NotIsomorphic | IsoOutcome::BudgetExhausted => break,
        }
    }
    Ok(mappings)
}

/// Number of automorphisms of `graph`, counting at most `limit`.
pub fn count_automorphisms<A: AdjacencySet>(
    graph: &Graph<A>,
    limit: usize,
) -> Result<usize, GraphIsoError> {
    enumerate_isomorphisms(graph, graph, limit).map(|mappings| mappings.len())
}

/// Per-invocation search state. Calling [`next_match`](Self::next_match)
/// again after a match resumes backtracking and yields the next distinct
/// bijection.
pub struct IsomorphismSearch<'a, A: AdjacencySet, B: AdjacencySet> {
    some_graph: &'a Graph<A>,
    other_graph: &'a Graph<B>,
    config: SearchConfig,
    vertices: Vec<VertexSearchState>,
    /// Inverse of `match_vertex`, indexed by `other_graph` vertex.
    matched_by: Vec<Option<VertexId>>,
    stack: Vec<SearchFrame>,
    stats: SearchStats,
    started: Instant,
    phase: Phase,
}

impl<'a, A: AdjacencySet, B: AdjacencySet> IsomorphismSearch<'a, A, B> {
    fn new(
        some_graph: &'a Graph<A>,
        other_graph: &'a Graph<B>,
        config: SearchConfig,
    ) -> Result<Self, GraphIsoError> {
        let n = some_graph.vertex_count();
        if other_graph.vertex_count() != n {
            return Err(GraphIsoError::incomparable(n, other_graph.vertex_count()));
        }
        let mut search = Self {
            some_graph,
            other_graph,
            config,
            vertices: Vec::new(),
            matched_by: Vec::new(),
            stack: Vec::new(),
            stats: SearchStats::default(),
            started: Instant::now(),
            phase: Phase::Fresh,
        };
        if nogood(some_graph, other_graph).is_none() {
            debug!("isomorphism search on {n} vertices rejected by invariant check");
            search.phase = Phase::Exhausted;
            return Ok(search);
        }
        search.vertices = vec![VertexSearchState::default(); n];
        search.matched_by = vec![None; n];
        search.stack = Vec::with_capacity(n);
        debug!(
            "isomorphism search on {n} vertices, {} edges",
            some_graph.edge_count()
        );
        Ok(search)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs until the next complete mapping, exhaustion, or budget overrun.
    pub fn next_match(&mut self) -> Result<IsoOutcome, GraphIsoError> {
        let mut resume_top = match self.phase {
            Phase::Exhausted => return Ok(IsoOutcome::NotIsomorphic),
            Phase::Aborted => return Ok(IsoOutcome::BudgetExhausted),
            Phase::Fresh => false,
            Phase::Matched => true,
        };
        let deadline = self
            .config
            .deadline
            .and_then(|limit| self.started.checked_add(limit));

        loop {
            if self.over_budget(deadline) {
                self.phase = Phase::Aborted;
                debug!("isomorphism search aborted after {:?}", self.stats);
                return Ok(IsoOutcome::BudgetExhausted);
            }
            self.stats.steps += 1;

            if !resume_top {
                if self.stack.len() == self.vertices.len() {
                    self.phase = Phase::Matched;
                    debug!("isomorphism found after {:?}", self.stats);
                    return self.current_mapping().map(IsoOutcome::Isomorphic);
                }
                self.push_next_vertex();
            }

            if self.advance_candidate() {
                resume_top = false;
            } else {
                self.pop_frame();
                if self.stack.is_empty() {
                    self.phase = Phase::Exhausted;
                    debug!("isomorphism search exhausted after {:?}", self.stats);
                    return Ok(IsoOutcome::NotIsomorphic);
                }
                resume_top = true;
            }
        }
    }

    fn over_budget(&self, deadline: Option<Instant>) -> bool {
        if self
            .config
            .max_steps
            .is_some_and(|max| self.stats.steps >= max)
        {
            return true;
        }
        deadline.is_some_and(|at| Instant::now() >= at)
    }

    /// Picks the unmatched source vertex with the most matched neighbors,
    /// lowest index first, and records its border contribution.
    fn push_next_vertex(&mut self) {
        let mut outside_vertex = None;
        let mut best_border = 0;
        for (idx, state) in self.vertices.iter().enumerate() {
            if state.match_vertex.is_some() {
                continue;
            }
            if outside_vertex.is_none() || state.border_edges > best_border {
                outside_vertex = Some(idx);
                best_border = state.border_edges;
            }
        }
        let Some(outside_vertex) = outside_vertex else {
            return;
        };

        let inside_vertex = if best_border > 0 {
            self.some_graph
                .neighbors(outside_vertex)
                .find(|&n| self.vertices[n].match_vertex.is_some())
        } else {
            None
        };

        for neighbor in self.some_graph.neighbors(outside_vertex) {
            let state = &mut self.vertices[neighbor];
            if state.match_vertex.is_none() {
                state.border_edges += 1;
            }
        }

        self.stack.push(SearchFrame {
            inside_vertex,
            outside_vertex,
            trial_vertex: None,
        });
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
        trace!(
            "push depth={} outside={outside_vertex} inside={inside_vertex:?}",
            self.stack.len()
        );
    }

    /// Moves the top frame to its next acceptable candidate. Returns false
    /// (leaving the frame unmatched) when the candidates are used up.
    fn advance_candidate(&mut self) -> bool {
        let Some(frame) = self.stack.last().copied() else {
            return false;
        };
        if let Some(previous) = frame.trial_vertex {
            self.release(frame.outside_vertex, previous);
        }

        let mut cursor = frame.trial_vertex;
        while let Some(candidate) = self.next_candidate(&frame, cursor) {
            if self.accepts(frame.outside_vertex, candidate) {
                self.vertices[frame.outside_vertex].match_vertex = Some(candidate);
                self.matched_by[candidate] = Some(frame.outside_vertex);
                if let Some(top) = self.stack.last_mut() {
                    top.trial_vertex = Some(candidate);
                }
                return true;
            }
            cursor = Some(candidate);
        }

        if let Some(top) = self.stack.last_mut() {
            top.trial_vertex = None;
        }
        false
    }

    fn next_candidate(&self, frame: &SearchFrame, cursor: Option<VertexId>) -> Option<VertexId> {
        let anchor_image = frame
            .inside_vertex
            .and_then(|inside| self.vertices[inside].match_vertex);
        match anchor_image {
            Some(anchor) => {
                let adjacency = self.other_graph.adjacency(anchor)?;
                match cursor {
                    None => adjacency.first(),
                    Some(last) => adjacency.next_after(last),
                }
            }
            None => {
                let start = cursor.map_or(0, |last| last + 1);
                (start..self.matched_by.len()).find(|&c| self.matched_by[c].is_none())
            }
        }
    }

    fn accepts(&self, outside_vertex: VertexId, candidate: VertexId) -> bool {
        if self.matched_by[candidate].is_some() {
            return false;
        }
        if self.other_graph.degree(candidate) != self.some_graph.degree(outside_vertex) {
            return false;
        }
        let forward = self.some_graph.neighbors(outside_vertex).all(|n| {
            self.vertices[n]
                .match_vertex
                .is_none_or(|image| self.other_graph.find(image, candidate))
        });
        if !forward {
            return false;
        }
        self.other_graph.neighbors(candidate).all(|m| {
            self.matched_by[m].is_none_or(|source| self.some_graph.find(source, outside_vertex))
        })
    }

    fn release(&mut self, outside_vertex: VertexId, trial_vertex: VertexId) {
        self.vertices[outside_vertex].match_vertex = None;
        self.matched_by[trial_vertex] = None;
    }

    fn pop_frame(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let Some(trial) = frame.trial_vertex {
            self.release(frame.outside_vertex, trial);
        }
        for neighbor in self.some_graph.neighbors(frame.outside_vertex) {
            let state = &mut self.vertices[neighbor];
            if state.match_vertex.is_none() {
                debug_assert!(state.border_edges > 0);
                state.border_edges -= 1;
            }
        }
        self.stats.backtracks += 1;
        trace!(
            "backtrack depth={} outside={}",
            self.stack.len(),
            frame.outside_vertex
        );
    }

    fn current_mapping(&self) -> Result<Permutation, GraphIsoError> {
        let images = self
            .vertices
            .iter()
            .map(|state| state.match_vertex)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| GraphIsoError::invalid_permutation("search ended with unmatched vertex"))?;
        Permutation::new(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adjacency::SortedAdjacency,
        permutation::{apply_permutation, structurally_equals_under},
    };

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        Graph::from_edges(n, edges).expect("graph")
    }

    fn cycle(n: usize) -> Graph {
        let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        graph(n, &edges)
    }

    #[test]
    fn test_lowest_index_tie_break_fixes_mapping_order() {
        let square = cycle(4);
        let outcome = find_isomorphism(&square, &square).unwrap();
        assert_eq!(outcome.mapping().map(|p| p.to_vec()), Some(vec![0, 1, 2, 3]));
        let mappings = enumerate_isomorphisms(&square, &square, 2).unwrap();
        let mappings: Vec<Vec<VertexId>> = mappings.into_iter().map(Permutation::into_inner).collect();
        assert_eq!(mappings, vec![vec![0, 1, 2, 3], vec![0, 3, 2, 1]]);
    }

    #[test]
    fn test_identity_on_path() {
        let path = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let outcome = find_isomorphism(&path, &path).unwrap();
        let mapping = outcome.mapping().expect("isomorphic");
        assert!(structurally_equals_under(&path, &path, mapping));
    }

    #[test]
    fn test_path_vs_star_is_not_isomorphic() {
        let path = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let star = graph(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(
            find_isomorphism(&path, &star).unwrap(),
            IsoOutcome::NotIsomorphic
        );
    }

    #[test]
    fn test_incomparable_counts_fail_fast() {
        let a = graph(3, &[(0, 1), (1, 2)]);
        let b = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(
            find_isomorphism(&a, &b),
            Err(GraphIsoError::IncomparableGraphs { some: 3, other: 4 })
        );
    }

    #[test]
    fn test_same_degrees_different_structure() {
        // C6 versus two disjoint triangles: both 2-regular on six vertices.
        let hexagon = cycle(6);
        let triangles = graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let (outcome, stats) = IsomorphismSolver::default()
            .solve_with_stats(&hexagon, &triangles)
            .unwrap();
        assert_eq!(outcome, IsoOutcome::NotIsomorphic);
        assert!(stats.backtracks > 0);
        assert_eq!(
            find_isomorphism(&triangles, &hexagon).unwrap(),
            IsoOutcome::NotIsomorphic
        );
    }

    #[test]
    fn test_disconnected_graphs_match_componentwise() {
        let a = graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let p = Permutation::new([4, 0, 2, 5, 1, 3]).unwrap();
        let b = apply_permutation(&a, &p).unwrap();
        let outcome = find_isomorphism(&a, &b).unwrap();
        assert!(structurally_equals_under(&a, &b, outcome.mapping().unwrap()));
    }

    #[test]
    fn test_mixed_adjacency_kinds() {
        let a = cycle(5);
        let b: Graph<SortedAdjacency> =
            Graph::from_edges(5, &[(0, 2), (2, 4), (4, 1), (1, 3), (3, 0)]).unwrap();
        let outcome = find_isomorphism(&a, &b).unwrap();
        assert!(structurally_equals_under(&a, &b, outcome.mapping().unwrap()));
    }

    #[test]
    fn test_empty_and_single_vertex_graphs() {
        let empty: Graph = Graph::new(0);
        let outcome = find_isomorphism(&empty, &empty).unwrap();
        assert_eq!(outcome.mapping().map(|m| m.len()), Some(0));

        let single: Graph = Graph::new(1);
        let outcome = find_isomorphism(&single, &single).unwrap();
        assert_eq!(outcome.mapping().map(|m| m.to_vec()), Some(vec![0]));
    }

    #[test]
    fn test_edgeless_graphs_are_isomorphic() {
        let a: Graph = Graph::new(4);
        let b: Graph = Graph::new(4);
        assert!(find_isomorphism(&a, &b).unwrap().is_isomorphic());
    }

    #[test]
    fn test_step_budget_aborts() {
        let hexagon = cycle(6);
        let triangles = graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let solver = IsomorphismSolver::new(SearchConfig::bounded(2));
        let mut search = solver.search(&hexagon, &triangles).unwrap();
        assert_eq!(search.next_match().unwrap(), IsoOutcome::BudgetExhausted);
        assert_eq!(search.stats().steps, 2);
        assert_eq!(search.next_match().unwrap(), IsoOutcome::BudgetExhausted);
    }

    #[test]
    fn test_zero_deadline_aborts() {
        let hexagon = cycle(6);
        let solver = IsomorphismSolver::new(
            SearchConfig::default().with_deadline(std::time::Duration::ZERO),
        );
        assert_eq!(
            solver.solve(&hexagon, &hexagon).unwrap(),
            IsoOutcome::BudgetExhausted
        );
    }

    #[test]
    fn test_automorphism_counts() {
        assert_eq!(count_automorphisms(&graph(4, &[(0, 1), (1, 2), (2, 3)]), 100).unwrap(), 2);
        assert_eq!(count_automorphisms(&graph(4, &[(0, 1), (0, 2), (0, 3)]), 100).unwrap(), 6);
        assert_eq!(count_automorphisms(&cycle(4), 100).unwrap(), 8);
        assert_eq!(count_automorphisms(&cycle(5), 100).unwrap(), 10);
        let k4 = graph(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(count_automorphisms(&k4, 100).unwrap(), 24);
        assert_eq!(count_automorphisms(&k4, 5).unwrap(), 5);
    }

    #[test]
    fn test_enumerated_mappings_are_distinct_and_valid() {
        let c6 = cycle(6);
        let mappings = enumerate_isomorphisms(&c6, &c6, 100).unwrap();
        assert_eq!(mappings.len(), 12);
        for (idx, mapping) in mappings.iter().enumerate() {
            assert!(structurally_equals_under(&c6, &c6, mapping));
            assert!(!mappings[idx + 1..].contains(mapping));
        }
    }

    #[test]
    fn test_search_exhausts_after_last_match() {
        let path = graph(3, &[(0, 1), (1, 2)]);
        let mut search = IsomorphismSolver::default().search(&path, &path).unwrap();
        assert!(search.next_match().unwrap().is_isomorphic());
        assert!(search.next_match().unwrap().is_isomorphic());
        assert_eq!(search.next_match().unwrap(), IsoOutcome::NotIsomorphic);
        assert_eq!(search.next_match().unwrap(), IsoOutcome::NotIsomorphic);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(IsoOutcome::NotIsomorphic.label(), "not_isomorphic");
        assert_eq!(IsoOutcome::BudgetExhausted.label(), "search_aborted_budget");
        assert!(!IsoOutcome::BudgetExhausted.is_isomorphic());
    }
}
