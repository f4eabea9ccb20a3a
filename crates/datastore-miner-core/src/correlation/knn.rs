use super::{
    check_lengths, z_scores, BivariateCorrelator, CorrelatorVariant, MoranPair,
    KNN_NEIGHBOUR_WEIGHT, KNN_SELF_WEIGHT,
};
use crate::error::{MinerError, MinerResult};
use crate::spatial::{JoinedColumns, KNearestNeighbourIndex};

/// Moran's I approximated over each area and its K nearest neighbours.
///
/// X is the base location: for area `i` the self term is `zY[i]·zX[i]` and
/// each neighbour `n` adds `zY[n]·zX[i]`, with fixed weights rather than
/// distance weights. S0 is the sum of the weights used.
#[derive(Debug, Clone, Copy)]
pub struct KnnCorrelator<'a> {
    index: &'a KNearestNeighbourIndex,
    self_weight: f64,
    neighbour_weight: f64,
}

impl<'a> KnnCorrelator<'a> {
    pub fn new(index: &'a KNearestNeighbourIndex) -> Self {
        Self {
            index,
            self_weight: KNN_SELF_WEIGHT,
            neighbour_weight: KNN_NEIGHBOUR_WEIGHT,
        }
    }

    #[must_use]
    pub fn with_weights(mut self, self_weight: f64, neighbour_weight: f64) -> Self {
        self.self_weight = self_weight;
        self.neighbour_weight = neighbour_weight;
        self
    }

    pub fn correlate(&self, x: &[f64], y: &[f64]) -> MinerResult<f64> {
        let n = self.index.len();
        check_lengths(x, y, n)?;

        let zx = z_scores(x);
        let zy = z_scores(y);

        let (mut sum, mut s0) = (0.0, 0.0);
        for i in 0..n {
            sum += zy[i] * self.self_weight * zx[i];
            s0 += self.self_weight;
            for &nb in self.index.neighbour_indices(i) {
                sum += zy[nb] * self.neighbour_weight * zx[i];
                s0 += self.neighbour_weight;
            }
        }
        Ok(sum / s0)
    }
}

impl BivariateCorrelator for KnnCorrelator<'_> {
    fn variant(&self) -> CorrelatorVariant {
        CorrelatorVariant::Knn
    }

    fn correlate_joined(&self, columns: &JoinedColumns) -> MinerResult<MoranPair> {
        if !columns.covers(self.index.len()) {
            return Err(MinerError::length_mismatch(
                "joined areas",
                self.index.len(),
                columns.len(),
            ));
        }
        self.correlate(&columns.x, &columns.y).map(MoranPair::single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::CentroidSet;

    fn line(n: usize) -> CentroidSet {
        CentroidSet::from_points(
            (0..n)
                .map(|i| (format!("L{}", i), i as f64 * 3.0, 0.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_three_areas_one_neighbour() {
        // L0 -> L1, L1 -> L0 (tie with L2, lower index), L2 -> L1
        let index = KNearestNeighbourIndex::build(1, &line(3)).unwrap();
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 2.0, 1.0];
        let i = KnnCorrelator::new(&index).correlate(&x, &y).unwrap();
        // zX = [-1, 0, 1], zY = [1, 0, -1]
        // self: -1 + 0 - 1 = -2; neighbours: 0.5*(0*-1) + 0.5*(1*0) + 0.5*(0*1) = 0
        // S0 = 3 * 1.5
        assert!((i - (-2.0 / 4.5)).abs() < 1e-12);
    }

    #[test]
    fn test_custom_weights() {
        let index = KNearestNeighbourIndex::build(1, &line(3)).unwrap();
        let x = [1.0, 2.0, 3.0];
        let i = KnnCorrelator::new(&index)
            .with_weights(1.0, 0.0)
            .correlate(&x, &x)
            .unwrap();
        // neighbours contribute nothing, self terms sum to 2 over S0 = 3
        assert!((i - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let index = KNearestNeighbourIndex::build(1, &line(3)).unwrap();
        assert!(KnnCorrelator::new(&index)
            .correlate(&[1.0; 4], &[1.0; 4])
            .is_err());
    }
}
