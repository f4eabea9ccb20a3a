use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use super::weights::euclidean;
use super::CentroidSet;
use crate::error::{MinerError, MinerResult};

/// The K nearest other areas of every area, by centroid distance.
///
/// Brute force: every area sorts its distances to all others, so the build
/// is O(N² log N). Computed once per geography and cached. An area is never
/// its own neighbour, even when another area shares its centroid. Equal
/// distances are ordered by area index.
#[derive(Debug, Clone)]
pub struct KNearestNeighbourIndex {
    k: usize,
    keys: Vec<String>,
    positions: HashMap<String, usize>,
    neighbours: Vec<Vec<usize>>,
    distances: Vec<Vec<f64>>,
}

impl KNearestNeighbourIndex {
    /// # Errors
    ///
    /// `InvalidNeighbourCount` when `k` is 0 or not smaller than the number
    /// of areas.
    pub fn build(k: usize, centroids: &CentroidSet) -> MinerResult<Self> {
        let n = centroids.len();
        if k == 0 || k >= n {
            return Err(MinerError::InvalidNeighbourCount { k, areas: n });
        }
        let coords = centroids.coords();

        let (neighbours, distances): (Vec<Vec<usize>>, Vec<Vec<f64>>) = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut ranked: Vec<(f64, usize)> = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| (euclidean(coords[i], coords[j]), j))
                    .collect();
                ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                ranked.truncate(k);
                let (idx, dist): (Vec<usize>, Vec<f64>) =
                    ranked.into_iter().map(|(d, j)| (j, d)).unzip();
                (idx, dist)
            })
            .unzip();

        let keys: Vec<String> = centroids.keys().map(str::to_owned).collect();
        let positions = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), i))
            .collect();
        debug!(areas = n, k, "built nearest neighbour index");
        Ok(Self {
            k,
            keys,
            positions,
            neighbours,
            distances,
        })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of areas indexed.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Neighbour positions of area `i`, nearest first.
    #[inline]
    pub fn neighbour_indices(&self, i: usize) -> &[usize] {
        &self.neighbours[i]
    }

    /// Distances matching [`Self::neighbour_indices`].
    #[inline]
    pub fn neighbour_distances(&self, i: usize) -> &[f64] {
        &self.distances[i]
    }

    /// Position of the area named `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Neighbour keys of the area named `key`, nearest first.
    pub fn neighbours(&self, key: &str) -> MinerResult<Vec<&str>> {
        let i = self
            .position(key)
            .ok_or_else(|| MinerError::UnknownArea(key.to_string()))?;
        Ok(self.neighbours[i]
            .iter()
            .map(|&j| self.keys[j].as_str())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(n: usize) -> CentroidSet {
        CentroidSet::from_points(
            (0..n)
                .map(|i| (format!("L{}", i), i as f64 * 2.0, 0.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_on_a_line() {
        let index = KNearestNeighbourIndex::build(2, &line(5)).unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(index.k(), 2);
        // L0 -> L1, L2
        assert_eq!(index.neighbour_indices(0), &[1, 2]);
        // L2: L1 and L3 tie at distance 2, lower index first
        assert_eq!(index.neighbours("L2").unwrap(), vec!["L1", "L3"]);
        assert_eq!(index.neighbour_distances(2), &[2.0, 2.0]);
        assert_eq!(index.position("L3"), Some(3));
    }

    #[test]
    fn test_coincident_area_is_not_self() {
        let set = CentroidSet::from_points(vec![
            ("A".to_string(), 0.0, 0.0),
            ("B".to_string(), 0.0, 0.0),
            ("C".to_string(), 10.0, 0.0),
        ])
        .unwrap();
        let index = KNearestNeighbourIndex::build(1, &set).unwrap();
        assert_eq!(index.neighbours("A").unwrap(), vec!["B"]);
        assert_eq!(index.neighbours("B").unwrap(), vec!["A"]);
        assert_eq!(index.neighbours("C").unwrap(), vec!["A"]);
    }

    #[test]
    fn test_invalid_k() {
        assert!(matches!(
            KNearestNeighbourIndex::build(5, &line(5)),
            Err(MinerError::InvalidNeighbourCount { k: 5, areas: 5 })
        ));
        assert!(KNearestNeighbourIndex::build(0, &line(5)).is_err());
    }

    #[test]
    fn test_unknown_key() {
        let index = KNearestNeighbourIndex::build(1, &line(3)).unwrap();
        assert!(matches!(index.neighbours("nope"), Err(MinerError::UnknownArea(_))));
        assert_eq!(index.position("nope"), None);
    }

    proptest! {
        #[test]
        fn prop_k_sorted_neighbours_excluding_self(
            points in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..25),
            k_seed in 1usize..24,
        ) {
            let set = CentroidSet::from_points(
                points.iter().enumerate().map(|(i, &(x, y))| (format!("P{}", i), x, y)).collect(),
            ).unwrap();
            let k = 1 + k_seed % (points.len() - 1);
            let index = KNearestNeighbourIndex::build(k, &set).unwrap();
            for i in 0..points.len() {
                let ns = index.neighbour_indices(i);
                prop_assert_eq!(ns.len(), k);
                prop_assert!(!ns.contains(&i));
                let ds = index.neighbour_distances(i);
                prop_assert!(ds.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
