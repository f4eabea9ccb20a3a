//! Dijkstra shortest path between one source and one target.
//!
//! Edge weights are distances. The search stops as soon as the target is
//! popped from the frontier instead of settling every vertex. Undirected
//! edges are followed both ways.

use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use super::FrontierNode;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, VertexId};

/// Outcome of a shortest path search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Source to target inclusive; empty when the target is unreachable.
    pub path: Vec<VertexId>,
    /// Sum of edge weights along `path` (infinite when unreachable).
    pub cost: f32,
    /// Vertices settled before the search stopped.
    pub settled: usize,
}

impl PathResult {
    #[must_use]
    pub fn unreachable(settled: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: f32::INFINITY,
            settled,
        }
    }

    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

impl<T> Graph<T> {
    /// Vertices on the cheapest path from `source` to `target`.
    ///
    /// Returns an empty list when `target` cannot be reached.
    pub fn shortest_path(&self, source: VertexId, target: VertexId) -> GraphResult<Vec<VertexId>> {
        Ok(self.shortest_path_detailed(source, target)?.path)
    }

    /// Like [`Graph::shortest_path`], with cost and search statistics.
    pub fn shortest_path_detailed(
        &self,
        source: VertexId,
        target: VertexId,
    ) -> GraphResult<PathResult> {
        if !self.contains(source) {
            return Err(GraphError::VertexNotFound(source));
        }
        if !self.contains(target) {
            return Err(GraphError::VertexNotFound(target));
        }

        let mut distance: HashMap<VertexId, f32> = HashMap::new();
        let mut previous: HashMap<VertexId, VertexId> = HashMap::new();
        let mut settled: HashSet<VertexId> = HashSet::new();
        let mut frontier = BinaryHeap::new();

        distance.insert(source, 0.0);
        frontier.push(FrontierNode {
            vertex: source,
            distance: 0.0,
        });

        while let Some(current) = frontier.pop() {
            let u = current.vertex;
            if !settled.insert(u) {
                continue;
            }

            if u == target {
                let mut path = vec![target];
                let mut node = target;
                while let Some(&p) = previous.get(&node) {
                    path.push(p);
                    node = p;
                }
                path.reverse();
                debug!(source, target, settled = settled.len(), "shortest path found");
                return Ok(PathResult {
                    path,
                    cost: current.distance,
                    settled: settled.len(),
                });
            }

            for (edge_id, v) in self.neighbours(u)? {
                if settled.contains(&v) {
                    continue;
                }
                let weight = match self.edge(edge_id) {
                    Some(e) => e.weight,
                    None => continue,
                };
                let alt = current.distance + weight;
                let best = distance.get(&v).copied().unwrap_or(f32::INFINITY);
                if alt < best {
                    distance.insert(v, alt);
                    previous.insert(v, u);
                    frontier.push(FrontierNode {
                        vertex: v,
                        distance: alt,
                    });
                }
            }
        }

        debug!(source, target, "target unreachable");
        Ok(PathResult::unreachable(settled.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond(directed: bool) -> Graph<()> {
        // 0 -1- 1 -1- 3
        //  \         /
        //   5 - 2 - 1
        let mut g = Graph::new(directed);
        for _ in 0..5 {
            g.add_vertex(());
        }
        g.connect_vertices(0, 1, "", 1.0).unwrap();
        g.connect_vertices(1, 3, "", 1.0).unwrap();
        g.connect_vertices(0, 2, "", 5.0).unwrap();
        g.connect_vertices(2, 3, "", 1.0).unwrap();
        g
    }

    #[test]
    fn test_shortest_path_prefers_light_route() {
        let g = diamond(false);
        let result = g.shortest_path_detailed(0, 3).unwrap();
        assert_eq!(result.path, vec![0, 1, 3]);
        assert_eq!(result.cost, 2.0);
        assert!(result.found());
    }

    #[test]
    fn test_undirected_edges_followed_backwards() {
        let g = diamond(false);
        assert_eq!(g.shortest_path(3, 0).unwrap(), vec![3, 1, 0]);
        assert_eq!(g.shortest_path(2, 0).unwrap(), vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_directed_respects_direction() {
        let g = diamond(true);
        assert_eq!(g.shortest_path(0, 3).unwrap(), vec![0, 1, 3]);
        assert!(g.shortest_path(3, 0).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_isolated_vertex() {
        let g = diamond(false);
        let result = g.shortest_path_detailed(0, 4).unwrap();
        assert!(result.path.is_empty());
        assert!(result.cost.is_infinite());
    }

    #[test]
    fn test_source_equals_target() {
        let g = diamond(false);
        assert_eq!(g.shortest_path(2, 2).unwrap(), vec![2]);
    }

    #[test]
    fn test_unknown_vertex_is_error() {
        let g = diamond(false);
        assert!(g.shortest_path(0, 99).is_err());
    }
}
