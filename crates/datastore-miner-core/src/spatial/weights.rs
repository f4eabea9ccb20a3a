use rayon::prelude::*;
use tracing::debug;

use super::CentroidSet;
use crate::matrix::SquareMatrix;

#[inline]
pub fn euclidean(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// 1 for points closer than one length unit (coincident points included),
/// otherwise 1 / distance.
#[inline]
pub fn inverse_distance_weight(a: [f64; 2], b: [f64; 2]) -> f64 {
    let d = euclidean(a, b);
    if d < 1.0 {
        1.0
    } else {
        1.0 / d
    }
}

/// Dense inverse-distance weight matrix over one geography and its total S0.
///
/// O(N²) memory, so only practical up to a few thousand areas. Built once,
/// then read-only.
#[derive(Debug, Clone)]
pub struct SpatialWeightModel {
    weights: SquareMatrix<f64>,
    s0: f64,
}

impl SpatialWeightModel {
    /// Build from centroid coordinates in area order.
    pub fn build(coords: &[[f64; 2]]) -> Self {
        let n = coords.len();
        let mut weights = SquareMatrix::zeros(n);
        // each task owns one row
        weights
            .as_mut_slice()
            .par_chunks_mut(n.max(1))
            .enumerate()
            .for_each(|(i, row)| {
                for (j, w) in row.iter_mut().enumerate() {
                    *w = inverse_distance_weight(coords[i], coords[j]);
                }
            });
        let s0 = weights.sum();
        debug!(areas = n, s0, "built spatial weight model");
        Self { weights, s0 }
    }

    pub fn from_centroids(centroids: &CentroidSet) -> Self {
        Self::build(&centroids.coords())
    }

    pub fn weights(&self) -> &SquareMatrix<f64> {
        &self.weights
    }

    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights.get(i, j)
    }

    /// Sum of every weight, diagonal included.
    #[inline]
    pub fn s0(&self) -> f64 {
        self.s0
    }

    /// Number of areas.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.dim()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_coincident_and_distant_points() {
        let model = SpatialWeightModel::build(&[[0.0, 0.0], [0.0, 0.0], [10.0, 0.0]]);
        assert_eq!(model.len(), 3);
        assert_eq!(model.weight(0, 1), 1.0);
        assert!((model.weight(0, 2) - 0.1).abs() < 1e-15);
        assert!((model.weight(2, 1) - 0.1).abs() < 1e-15);
        for i in 0..3 {
            assert_eq!(model.weight(i, i), 1.0);
        }
        assert!((model.s0() - 5.4).abs() < 1e-12);
    }

    #[test]
    fn test_sub_unit_distance_clamped() {
        assert_eq!(inverse_distance_weight([0.0, 0.0], [0.5, 0.5]), 1.0);
        assert_eq!(inverse_distance_weight([0.0, 0.0], [3.0, 4.0]), 0.2);
    }

    #[test]
    fn test_empty_model() {
        let model = SpatialWeightModel::build(&[]);
        assert!(model.is_empty());
        assert_eq!(model.s0(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_weights_symmetric_and_s0_is_sum(
            points in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..30)
        ) {
            let coords: Vec<[f64; 2]> = points.iter().map(|&(x, y)| [x, y]).collect();
            let model = SpatialWeightModel::build(&coords);
            let n = coords.len();
            let mut total = 0.0;
            for i in 0..n {
                prop_assert_eq!(model.weight(i, i), 1.0);
                for j in 0..n {
                    prop_assert_eq!(model.weight(i, j), model.weight(j, i));
                    prop_assert!(model.weight(i, j) > 0.0 && model.weight(i, j) <= 1.0);
                    total += model.weight(i, j);
                }
            }
            prop_assert!((model.s0() - total).abs() <= 1e-9 * total);
        }
    }
}
