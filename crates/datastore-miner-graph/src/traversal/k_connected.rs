//! Every vertex within a path-weight budget of a source.

use std::collections::{BTreeMap, BinaryHeap};

use super::FrontierNode;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, VertexId};

impl<T> Graph<T> {
    /// Vertices reachable from `source` by a path of total weight `<= limit`,
    /// each with its lowest such weight. The source maps to 0.
    ///
    /// A bounded Dijkstra, so it assumes non-negative weights.
    pub fn k_connected(&self, limit: f32, source: VertexId) -> GraphResult<BTreeMap<VertexId, f32>> {
        if !self.contains(source) {
            return Err(GraphError::VertexNotFound(source));
        }

        let mut best: BTreeMap<VertexId, f32> = BTreeMap::new();
        let mut frontier = BinaryHeap::new();
        best.insert(source, 0.0);
        frontier.push(FrontierNode {
            vertex: source,
            distance: 0.0,
        });

        while let Some(current) = frontier.pop() {
            if best.get(&current.vertex).map_or(false, |d| current.distance > *d) {
                continue;
            }
            for (edge_id, next) in self.neighbours(current.vertex)? {
                let weight = match self.edge(edge_id) {
                    Some(e) => e.weight,
                    None => continue,
                };
                let total = current.distance + weight;
                if !(total <= limit) {
                    continue;
                }
                if best.get(&next).map_or(true, |d| total < *d) {
                    best.insert(next, total);
                    frontier.push(FrontierNode {
                        vertex: next,
                        distance: total,
                    });
                }
            }
        }
        Ok(best)
    }
}
