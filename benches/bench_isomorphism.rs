use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graphiso::{
    Graph, HashedAdjacency, IsomorphismSolver, Permutation, SortedAdjacency, apply_permutation,
    count_automorphisms, generate, seeded,
};

const SPARSE_SEED: u64 = 0x15A0;
const DENSE_SEED: u64 = 0x15D0;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

struct RelabeledPair<A: graphiso::AdjacencySet> {
    label: String,
    original: Graph<A>,
    relabeled: Graph<A>,
}

fn bench_scales() -> &'static [usize] {
    #[cfg(feature = "bench-ci")]
    {
        &[32, 64]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[64, 128, 256]
    }
}

fn relabeled_pair<A: graphiso::AdjacencySet>(
    vertices: usize,
    edges: usize,
    seed: u64,
    label: String,
) -> RelabeledPair<A> {
    let mut rng = seeded(seed);
    let original: Graph<A> = generate(vertices, edges, &mut rng).expect("generate");
    let permutation = Permutation::random(vertices, &mut rng);
    let relabeled = apply_permutation(&original, &permutation).expect("relabel");
    RelabeledPair {
        label,
        original,
        relabeled,
    }
}

fn bench_relabeled_sparse(c: &mut Criterion) {
    let solver = IsomorphismSolver::default();
    let mut group = c.benchmark_group("isomorphism_sparse");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for &n in bench_scales() {
        let sorted: RelabeledPair<SortedAdjacency> =
            relabeled_pair(n, n * 3, SPARSE_SEED + n as u64, format!("sorted_{n}"));
        let hashed: RelabeledPair<HashedAdjacency> =
            relabeled_pair(n, n * 3, SPARSE_SEED + n as u64, format!("hashed_{n}"));
        group.bench_function(BenchmarkId::from_parameter(&sorted.label), |b| {
            b.iter(|| solver.solve(&sorted.original, &sorted.relabeled).expect("solve"));
        });
        group.bench_function(BenchmarkId::from_parameter(&hashed.label), |b| {
            b.iter(|| solver.solve(&hashed.original, &hashed.relabeled).expect("solve"));
        });
    }
    group.finish();
}

fn bench_relabeled_dense(c: &mut Criterion) {
    let solver = IsomorphismSolver::default();
    let mut group = c.benchmark_group("isomorphism_dense");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for &n in bench_scales() {
        let edges = n * (n - 1) / 2 * 3 / 4;
        let case: RelabeledPair<HashedAdjacency> =
            relabeled_pair(n, edges, DENSE_SEED + n as u64, format!("hashed_{n}"));
        group.bench_function(BenchmarkId::from_parameter(&case.label), |b| {
            b.iter(|| solver.solve(&case.original, &case.relabeled).expect("solve"));
        });
    }
    group.finish();
}

fn bench_automorphisms(c: &mut Criterion) {
    let n = 12;
    let cycle: Graph = Graph::from_edges(
        n,
        &(0..n).map(|v| (v, (v + 1) % n)).collect::<Vec<_>>(),
    )
    .expect("cycle");
    let mut group = c.benchmark_group("automorphisms");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    group.bench_function("cycle_12", |b| {
        b.iter(|| count_automorphisms(&cycle, usize::MAX).expect("count"));
    });
    group.finish();
}

criterion_group!(
    name = isomorphism_benches;
    config = Criterion::default();
    targets = bench_relabeled_sparse, bench_relabeled_dense, bench_automorphisms
);
criterion_main!(isomorphism_benches);
