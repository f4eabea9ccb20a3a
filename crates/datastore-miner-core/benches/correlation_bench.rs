//! Correlator benchmark suite
//!
//! Compares the three Moran's I variants on a square grid of areas, plus
//! the one-off weight model and neighbour index builds they depend on.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datastore_miner_core::correlation::{
    spatial_bivariate_moran_i, FastCorrelator, KnnCorrelator,
};
use datastore_miner_core::spatial::{CentroidSet, KNearestNeighbourIndex, SpatialWeightModel};

// =============================================================================
// Helper Functions
// =============================================================================

fn grid(side: usize) -> CentroidSet {
    let mut points = Vec::with_capacity(side * side);
    for r in 0..side {
        for c in 0..side {
            points.push((format!("G{}_{}", r, c), c as f64 * 100.0, r as f64 * 100.0));
        }
    }
    CentroidSet::from_points(points).expect("grid keys are unique")
}

fn column(n: usize, seed: u64) -> Vec<f64> {
    (0..n)
        .map(|i| ((i as f64 + seed as f64) * 0.37).sin() * 10.0 + 50.0)
        .collect()
}

// =============================================================================
// Correlator Benchmarks
// =============================================================================

fn bench_correlators(c: &mut Criterion) {
    let mut group = c.benchmark_group("moran_i");
    for side in [10usize, 20, 30] {
        let set = grid(side);
        let n = set.len();
        let coords = set.coords();
        let model = SpatialWeightModel::from_centroids(&set);
        let index = KNearestNeighbourIndex::build(8, &set).unwrap();
        let x = column(n, 1);
        let y = column(n, 7);

        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("exact", n), &n, |b, _| {
            b.iter(|| spatial_bivariate_moran_i(black_box(&x), black_box(&y), black_box(&coords)))
        });

        let fast = FastCorrelator::new(&model);
        group.bench_with_input(BenchmarkId::new("fast", n), &n, |b, _| {
            b.iter(|| fast.correlate(black_box(&x), black_box(&y)))
        });

        let knn = KnnCorrelator::new(&index);
        group.bench_with_input(BenchmarkId::new("knn", n), &n, |b, _| {
            b.iter(|| knn.correlate(black_box(&x), black_box(&y)))
        });
    }
    group.finish();
}

// =============================================================================
// Precompute Benchmarks
// =============================================================================

fn bench_weight_model_build(c: &mut Criterion) {
    let set = grid(30);
    let coords = set.coords();
    c.bench_function("weight_model_build_900", |b| {
        b.iter(|| SpatialWeightModel::build(black_box(&coords)))
    });
}

fn bench_knn_build(c: &mut Criterion) {
    let set = grid(30);
    c.bench_function("knn_index_build_900_k8", |b| {
        b.iter(|| KNearestNeighbourIndex::build(black_box(8), black_box(&set)))
    });
}

criterion_group!(
    benches,
    bench_correlators,
    bench_weight_model_build,
    bench_knn_build
);
criterion_main!(benches);
