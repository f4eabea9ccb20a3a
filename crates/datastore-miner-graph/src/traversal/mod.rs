//! Graph traversal algorithms.
//!
//! - [`dijkstra`]: single-pair shortest path with early exit
//! - [`k_connected`]: every vertex within a path-weight budget
//! - [`mst`]: Kruskal minimum spanning forest
//! - [`flatten`]: depth-first decomposition into polylines
//!
//! Per-vertex scratch state (distance, previous, union-find root and rank)
//! lives in maps local to each call and never outlives it.

pub mod dijkstra;
pub mod flatten;
pub mod k_connected;
pub mod mst;

pub use dijkstra::PathResult;

use std::cmp::Ordering;

use crate::graph::VertexId;

/// Frontier entry ordered so that `BinaryHeap` pops the smallest distance.
///
/// Equal distances pop the lower vertex id first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrontierNode {
    pub(crate) vertex: VertexId,
    pub(crate) distance: f32,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN sinks to the bottom of the heap
        let by_distance = match (self.distance.is_nan(), other.distance.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => other
                .distance
                .partial_cmp(&self.distance)
                .unwrap_or(Ordering::Equal),
        };
        by_distance.then_with(|| other.vertex.cmp(&self.vertex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_frontier_pops_smallest_then_lowest_id() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierNode { vertex: 3, distance: 2.0 });
        heap.push(FrontierNode { vertex: 1, distance: f32::NAN });
        heap.push(FrontierNode { vertex: 5, distance: 1.0 });
        heap.push(FrontierNode { vertex: 2, distance: 1.0 });

        let order: Vec<VertexId> = std::iter::from_fn(|| heap.pop().map(|n| n.vertex)).collect();
        assert_eq!(order, vec![2, 5, 3, 1]);
    }
}
