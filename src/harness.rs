//! Self-test trials: generate, relabel, solve, verify.

use std::time::Instant;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    adjacency::{AdjacencySet, HashedAdjacency, SortedAdjacency},
    config::{AdjacencyKind, HarnessConfig},
    errors::GraphIsoError,
    generator::generate,
    graph::Graph,
    isomorphism::{IsoOutcome, IsomorphismSolver, SearchStats},
    permutation::{Permutation, apply_permutation, structurally_equals_under},
    random::{RandomSource, seeded},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialReport {
    pub trial: usize,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub outcome: String,
    /// The returned mapping carries the original graph onto the relabeled one.
    pub verified: bool,
    #[serde(flatten)]
    pub stats: SearchStats,
    pub elapsed_micros: u64,
}

impl TrialReport {
    pub fn aborted(&self) -> bool {
        self.outcome == IsoOutcome::BudgetExhausted.label()
    }

    /// Relabeled pairs are isomorphic by construction, so anything other
    /// than a verified mapping or a budget abort is a solver failure.
    pub fn passed(&self) -> bool {
        self.verified || self.aborted()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HarnessSummary {
    pub config: HarnessConfig,
    pub reports: Vec<TrialReport>,
    pub verified: usize,
    pub aborted: usize,
    pub failures: usize,
}

impl HarnessSummary {
    fn from_reports(config: HarnessConfig, reports: Vec<TrialReport>) -> Self {
        let verified = reports.iter().filter(|r| r.verified).count();
        let aborted = reports.iter().filter(|r| r.aborted()).count();
        let failures = reports.iter().filter(|r| !r.passed()).count();
        Self {
            config,
            reports,
            verified,
            aborted,
            failures,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }
}

pub fn run_trials(config: &HarnessConfig) -> Result<HarnessSummary, GraphIsoError> {
    match config.adjacency {
        AdjacencyKind::Sorted => run_trials_with::<SortedAdjacency>(config),
        AdjacencyKind::Hashed => run_trials_with::<HashedAdjacency>(config),
    }
}

pub fn run_trials_with<A: AdjacencySet>(
    config: &HarnessConfig,
) -> Result<HarnessSummary, GraphIsoError> {
    config.validate()?;
    let mut rng = seeded(config.seed);
    let solver = IsomorphismSolver::new(config.search);
    let mut reports = Vec::with_capacity(config.trials);
    for trial in 0..config.trials {
        reports.push(run_trial::<A, _>(trial, config, &solver, &mut rng)?);
    }
    let summary = HarnessSummary::from_reports(config.clone(), reports);
    debug!(
        "{} trials: {} verified, {} aborted, {} failed",
        config.trials, summary.verified, summary.aborted, summary.failures
    );
    Ok(summary)
}

fn run_trial<A: AdjacencySet, R: RandomSource>(
    trial: usize,
    config: &HarnessConfig,
    solver: &IsomorphismSolver,
    rng: &mut R,
) -> Result<TrialReport, GraphIsoError> {
    let spec = config.spec;
    let original: Graph<A> = generate(spec.vertex_count, spec.edge_count, rng)?;
    let permutation = Permutation::random(spec.vertex_count, rng);
    let relabeled = apply_permutation(&original, &permutation)?;

    let started = Instant::now();
    let (outcome, stats) = solver.solve_with_stats(&original, &relabeled)?;
    let elapsed_micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    let verified = outcome
        .mapping()
        .is_some_and(|mapping| structurally_equals_under(&original, &relabeled, mapping));
    if !verified && outcome != IsoOutcome::BudgetExhausted {
        warn!("trial {trial}: {} without a valid mapping", outcome.label());
    }
    Ok(TrialReport {
        trial,
        vertex_count: spec.vertex_count,
        edge_count: spec.edge_count,
        outcome: outcome.label().to_string(),
        verified,
        stats,
        elapsed_micros,
    })
}
