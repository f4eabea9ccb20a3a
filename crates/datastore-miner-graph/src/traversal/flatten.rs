//! Depth-first decomposition of a graph into polylines.
//!
//! Every vertex is visited once. A polyline grows along the first
//! unvisited neighbour until it gets stuck; it then ends at that vertex.
//! When the walk backs up to a vertex with another unvisited neighbour, a
//! new polyline starts at that branch vertex. Each traversed edge therefore
//! lies on exactly one polyline, and only branch vertices appear in more
//! than one. Isolated vertices become single-vertex polylines.
//!
//! Iterative, with an explicit `(vertex, cursor)` stack.

use std::collections::{BTreeMap, HashSet};

use crate::graph::{Graph, VertexId};

impl<T> Graph<T> {
    /// Polylines as vertex id lists, roots taken in ascending id order.
    pub fn polylines(&self) -> Vec<Vec<VertexId>> {
        let adjacency: BTreeMap<VertexId, Vec<VertexId>> = self
            .vertex_ids()
            .map(|v| {
                let next = self
                    .neighbours(v)
                    .map(|ns| ns.into_iter().map(|(_, n)| n).collect())
                    .unwrap_or_default();
                (v, next)
            })
            .collect();

        let mut visited: HashSet<VertexId> = HashSet::with_capacity(adjacency.len());
        let mut lines = Vec::new();

        for &root in adjacency.keys() {
            if !visited.insert(root) {
                continue;
            }
            let mut line = vec![root];
            let mut stack: Vec<(VertexId, usize)> = vec![(root, 0)];

            while let Some((v, cursor)) = stack.last_mut() {
                let v = *v;
                let next = adjacency.get(&v).and_then(|ns| {
                    while *cursor < ns.len() {
                        let n = ns[*cursor];
                        *cursor += 1;
                        if !visited.contains(&n) {
                            return Some(n);
                        }
                    }
                    None
                });

                match next {
                    Some(n) => {
                        if line.is_empty() {
                            line.push(v);
                        }
                        visited.insert(n);
                        line.push(n);
                        stack.push((n, 0));
                    }
                    None => {
                        stack.pop();
                        if !line.is_empty() {
                            lines.push(std::mem::take(&mut line));
                        }
                    }
                }
            }
        }
        lines
    }

    /// Payloads of [`Graph::polylines`], each line followed by a `None`
    /// separator.
    pub fn flatten(&self) -> Vec<Option<&T>> {
        let mut out = Vec::new();
        for line in self.polylines() {
            for id in line {
                if let Some(v) = self.vertex(id) {
                    out.push(Some(&v.payload));
                }
            }
            out.push(None);
        }
        out
    }
}
