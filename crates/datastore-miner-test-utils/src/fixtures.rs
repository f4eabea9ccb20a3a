//! Centroid grids, synthetic columns and block matrices.

use datastore_miner_core::{CentroidSet, SquareMatrix, VariableVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `side × side` centroids `spacing` apart, keyed `A000`, `A001`, ... in
/// row-major order.
pub fn grid_centroids(side: usize, spacing: f64) -> CentroidSet {
    let points = (0..side * side)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            (
                format!("A{:03}", i),
                col as f64 * spacing,
                row as f64 * spacing,
            )
        })
        .collect();
    CentroidSet::from_points(points).expect("grid keys are unique")
}

/// `dx * x + dy * y` at every centroid: a smooth spatial trend.
pub fn gradient_column(name: &str, centroids: &CentroidSet, dx: f64, dy: f64) -> VariableVector {
    VariableVector::from_pairs(
        name,
        centroids
            .iter()
            .map(|c| (c.key.clone(), c.x * dx + c.y * dy)),
    )
}

/// Uniform noise in `[0, 100)`.
pub fn random_column(name: &str, centroids: &CentroidSet, seed: u64) -> VariableVector {
    let mut rng = StdRng::seed_from_u64(seed);
    VariableVector::from_pairs(
        name,
        centroids
            .iter()
            .map(|c| (c.key.clone(), rng.gen_range(0.0..100.0))),
    )
}

pub fn constant_column(name: &str, centroids: &CentroidSet, value: f64) -> VariableVector {
    VariableVector::from_pairs(name, centroids.iter().map(|c| (c.key.clone(), value)))
}

/// `v0`, `v1`, ...
pub fn variable_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("v{}", i)).collect()
}

/// Symmetric matrix of diagonal blocks with the given sizes.
///
/// Entries inside a block are `within`, entries across blocks `between`,
/// the diagonal is 1.
pub fn block_correlation_matrix(sizes: &[usize], within: f32, between: f32) -> SquareMatrix<f32> {
    let block: Vec<usize> = sizes
        .iter()
        .enumerate()
        .flat_map(|(b, &size)| std::iter::repeat(b).take(size))
        .collect();
    let n = block.len();
    let mut m = SquareMatrix::filled(n, between);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                m.set(i, j, 1.0);
            } else if block[i] == block[j] {
                m.set(i, j, within);
            }
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let g = grid_centroids(3, 2.0);
        assert_eq!(g.len(), 9);
        let last = g.get(8).unwrap();
        assert_eq!((last.x, last.y), (4.0, 4.0));
        assert_eq!(g.index_of("A004"), Some(4));
    }

    #[test]
    fn test_random_column_is_seeded() {
        let g = grid_centroids(2, 1.0);
        assert_eq!(random_column("r", &g, 7), random_column("r", &g, 7));
        assert_ne!(random_column("r", &g, 7), random_column("r", &g, 8));
    }

    #[test]
    fn test_block_matrix() {
        let m = block_correlation_matrix(&[2, 1], 0.9, 0.1);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.get(0, 1), 0.9);
        assert_eq!(m.get(1, 2), 0.1);
        assert_eq!(m.get(2, 2), 1.0);
        assert!(m.is_symmetric());
    }
}
