//! Kruskal minimum spanning forest.

use std::collections::HashMap;

use tracing::debug;

use crate::graph::{Graph, VertexId};

/// Union-find over dense indices with path compression and union by rank.
struct DisjointSet {
    root: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            root: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut r = i;
        while self.root[r] != r {
            r = self.root[r];
        }
        let mut cur = i;
        while self.root[cur] != r {
            let next = self.root[cur];
            self.root[cur] = r;
            cur = next;
        }
        r
    }

    /// Returns false when `a` and `b` were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.rank[rb] < self.rank[ra] {
            self.root[rb] = ra;
        } else {
            self.root[ra] = rb;
            if self.rank[ra] == self.rank[rb] {
                self.rank[rb] += 1;
            }
        }
        true
    }
}

impl<T: Clone> Graph<T> {
    /// Undirected minimum spanning forest over every vertex.
    ///
    /// Vertices keep their ids, labels and payloads. Edges are taken in
    /// ascending weight (ties by creation order) and keep their labels.
    pub fn minimum_spanning_tree(&self) -> Graph<T> {
        let mut tree = Graph::undirected();
        let mut slot: HashMap<VertexId, usize> = HashMap::with_capacity(self.vertex_count());
        for (i, v) in self.vertices().enumerate() {
            slot.insert(v.id(), i);
            // ids are unique in self
            if tree.add_vertex_with_id(v.id(), v.payload.clone()).is_ok() {
                if let Some(label) = &v.label {
                    let _ = tree.set_label(v.id(), label.clone());
                }
            }
        }

        let mut sorted: Vec<_> = self.edges().collect();
        sorted.sort_by(|a, b| a.weight.total_cmp(&b.weight).then(a.id().cmp(&b.id())));

        let mut sets = DisjointSet::new(self.vertex_count());
        let mut total = 0.0f32;
        for e in sorted {
            let (Some(&a), Some(&b)) = (slot.get(&e.from()), slot.get(&e.to())) else {
                continue;
            };
            if sets.union(a, b) && tree.connect_vertices(e.from(), e.to(), e.label.clone(), e.weight).is_ok() {
                total += e.weight;
            }
        }
        debug!(
            vertices = tree.vertex_count(),
            edges = tree.edge_count(),
            total_weight = total,
            "minimum spanning tree"
        );
        tree
    }
}
