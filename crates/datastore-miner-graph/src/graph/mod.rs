//! Arena-style weighted graph.
//!
//! Vertices live in a map keyed by id and edges in a master list keyed by
//! [`EdgeId`]. Vertices reference their edges by id only, so deleting an
//! edge or vertex is a matter of removing ids from the two endpoint lists
//! and the master list.
//!
//! Directedness is fixed for the whole graph. An undirected edge is
//! registered as an out-edge and an in-edge of both endpoints, so traversal
//! code can treat "out-edges" as "all incident edges" either way.

mod edge;
mod metrics;
mod vertex;

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{GraphError, GraphResult};

pub use edge::{Edge, EdgeId};
pub use vertex::Vertex;

/// Vertex identifier, unique within one graph.
pub type VertexId = i64;

#[derive(Debug, Clone)]
pub struct Graph<T> {
    directed: bool,
    vertices: BTreeMap<VertexId, Vertex<T>>,
    edges: BTreeMap<EdgeId, Edge>,
    next_vertex_id: VertexId,
    next_edge_id: u64,
}

impl<T> Graph<T> {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            next_vertex_id: 0,
            next_edge_id: 0,
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<T>> {
        self.vertices.get(&id)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex<T>> {
        self.vertices.get_mut(&id)
    }

    /// Vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<T>> {
        self.vertices.values()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Mutable access for in-place weight or label updates.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    fn require(&self, id: VertexId) -> GraphResult<&Vertex<T>> {
        self.vertices.get(&id).ok_or(GraphError::VertexNotFound(id))
    }

    /// Add a vertex with the next free counter id.
    pub fn add_vertex(&mut self, payload: T) -> VertexId {
        while self.vertices.contains_key(&self.next_vertex_id) {
            self.next_vertex_id += 1;
        }
        let id = self.next_vertex_id;
        self.next_vertex_id += 1;
        self.vertices.insert(id, Vertex::new(id, payload));
        id
    }

    /// Add a vertex with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// `DuplicateVertex` if the id is already in use.
    pub fn add_vertex_with_id(&mut self, id: VertexId, payload: T) -> GraphResult<VertexId> {
        if self.vertices.contains_key(&id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        self.vertices.insert(id, Vertex::new(id, payload));
        Ok(id)
    }

    pub fn set_label(&mut self, id: VertexId, label: impl Into<String>) -> GraphResult<()> {
        let v = self
            .vertices
            .get_mut(&id)
            .ok_or(GraphError::VertexNotFound(id))?;
        v.label = Some(label.into());
        Ok(())
    }

    /// Always creates a new edge; parallel edges are never merged.
    pub fn connect_vertices(
        &mut self,
        a: VertexId,
        b: VertexId,
        label: impl Into<String>,
        weight: f32,
    ) -> GraphResult<EdgeId> {
        self.require(a)?;
        self.require(b)?;

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges
            .insert(id, Edge::new(id, self.directed, a, b, label.into(), weight));

        if let Some(va) = self.vertices.get_mut(&a) {
            va.out_edges.push(id);
            if !self.directed {
                va.in_edges.push(id);
            }
        }
        if let Some(vb) = self.vertices.get_mut(&b) {
            vb.in_edges.push(id);
            if !self.directed {
                vb.out_edges.push(id);
            }
        }
        Ok(id)
    }

    /// Remove an edge from both endpoints and the master list.
    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;
        for v in [edge.from(), edge.to()] {
            if let Some(vertex) = self.vertices.get_mut(&v) {
                vertex.out_edges.retain(|e| *e != id);
                vertex.in_edges.retain(|e| *e != id);
            }
        }
        Ok(edge)
    }

    /// Remove a vertex and every edge touching it.
    ///
    /// # Errors
    ///
    /// `VertexNotFound` if there is no such vertex.
    pub fn delete_vertex(&mut self, id: VertexId) -> GraphResult<Vertex<T>> {
        let incident = self.incident_edges(id)?;
        for e in &incident {
            self.delete_edge(*e)?;
        }
        debug!(vertex = id, edges = incident.len(), "deleted vertex");
        self.vertices
            .remove(&id)
            .ok_or(GraphError::VertexNotFound(id))
    }

    /// Distinct edges touching `id`, in id order.
    pub fn incident_edges(&self, id: VertexId) -> GraphResult<Vec<EdgeId>> {
        let v = self.require(id)?;
        let mut ids: Vec<EdgeId> = v.out_edges.iter().chain(&v.in_edges).copied().collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Edges from `a` to `b`; in an undirected graph, edges joining them
    /// either way round.
    pub fn edges_between(&self, a: VertexId, b: VertexId) -> GraphResult<Vec<EdgeId>> {
        let va = self.require(a)?;
        self.require(b)?;
        let mut ids: Vec<EdgeId> = va
            .out_edges
            .iter()
            .filter(|id| {
                self.edges.get(*id).map_or(false, |e| {
                    if self.directed {
                        e.from() == a && e.to() == b
                    } else {
                        e.joins(a, b)
                    }
                })
            })
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Vertices reachable over one edge from `id`, with the edge used.
    ///
    /// Directed graphs follow out-edges only. Undirected graphs follow every
    /// incident edge.
    pub fn neighbours(&self, id: VertexId) -> GraphResult<Vec<(EdgeId, VertexId)>> {
        let v = self.require(id)?;
        let mut seen: Vec<(EdgeId, VertexId)> = Vec::with_capacity(v.out_edges.len());
        for e in &v.out_edges {
            if seen.iter().any(|(s, _)| s == e) {
                continue;
            }
            if let Some(edge) = self.edges.get(e) {
                let next = if self.directed {
                    edge.to()
                } else {
                    edge.other(id).unwrap_or(id)
                };
                seen.push((*e, next));
            }
        }
        Ok(seen)
    }
}

impl<T: PartialEq> Graph<T> {
    /// Delete the first vertex (in id order) whose payload equals `payload`.
    pub fn delete_vertex_by_payload(&mut self, payload: &T) -> Option<Vertex<T>> {
        let id = self
            .vertices
            .values()
            .find(|v| v.payload == *payload)
            .map(Vertex::id)?;
        self.delete_vertex(id).ok()
    }
}

impl<T: Default> Graph<T> {
    /// Build from `(a, b)` connections, keeping the given ids as vertex ids.
    ///
    /// Vertices get `T::default()` payloads; edges are unlabelled with
    /// weight 0.
    pub fn from_edge_pairs<I>(directed: bool, pairs: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut graph = Self::new(directed);
        for (a, b) in pairs {
            for v in [a, b] {
                if !graph.contains(v) {
                    graph.vertices.insert(v, Vertex::new(v, T::default()));
                }
            }
            // both endpoints exist
            let _ = graph.connect_vertices(a, b, "", 0.0);
        }
        graph
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::undirected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_ids_skip_used() {
        let mut g: Graph<&str> = Graph::undirected();
        g.add_vertex_with_id(0, "zero").unwrap();
        g.add_vertex_with_id(1, "one").unwrap();
        assert_eq!(g.add_vertex("two"), 2);
        assert!(matches!(
            g.add_vertex_with_id(2, "again"),
            Err(GraphError::DuplicateVertex(2))
        ));
    }

    #[test]
    fn test_undirected_double_registration() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let e = g.connect_vertices(a, b, "ab", 2.0).unwrap();
        let va = g.vertex(a).unwrap();
        let vb = g.vertex(b).unwrap();
        assert_eq!(va.out_edges(), &[e]);
        assert_eq!(va.in_edges(), &[e]);
        assert_eq!(vb.out_edges(), &[e]);
        assert_eq!(vb.in_edges(), &[e]);
        assert_eq!(g.neighbours(b).unwrap(), vec![(e, a)]);
    }

    #[test]
    fn test_directed_registration() {
        let mut g: Graph<()> = Graph::directed();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let e = g.connect_vertices(a, b, "", 1.0).unwrap();
        assert_eq!(g.vertex(a).unwrap().out_edges(), &[e]);
        assert!(g.vertex(a).unwrap().in_edges().is_empty());
        assert!(g.neighbours(b).unwrap().is_empty());
        assert_eq!(g.edges_between(a, b).unwrap(), vec![e]);
        assert!(g.edges_between(b, a).unwrap().is_empty());
    }

    #[test]
    fn test_parallel_edges_not_merged() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        g.connect_vertices(a, b, "x", 1.0).unwrap();
        g.connect_vertices(b, a, "y", 1.0).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges_between(a, b).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_edge_removes_all_copies() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let e = g.connect_vertices(a, b, "", 1.0).unwrap();
        let removed = g.delete_edge(e).unwrap();
        assert_eq!(removed.label, "");
        assert!(g.vertex(a).unwrap().is_orphan());
        assert!(g.vertex(b).unwrap().is_orphan());
        assert!(matches!(g.delete_edge(e), Err(GraphError::EdgeNotFound(_))));
    }

    #[test]
    fn test_delete_vertex_leaves_no_dangling_edges() {
        let mut g: Graph<u32> = Graph::undirected();
        let a = g.add_vertex(1);
        let b = g.add_vertex(2);
        let c = g.add_vertex(3);
        g.connect_vertices(a, b, "", 1.0).unwrap();
        g.connect_vertices(b, c, "", 1.0).unwrap();
        g.connect_vertices(c, a, "", 1.0).unwrap();

        g.delete_vertex(b).unwrap();
        let d = g.add_vertex(4);
        assert_ne!(d, b);
        assert_eq!(g.edge_count(), 1);
        for e in g.edges() {
            assert!(!e.touches(b));
        }
        for v in g.vertices() {
            for e in v.out_edges().iter().chain(v.in_edges()) {
                assert!(g.edge(*e).is_some());
            }
        }
        assert!(matches!(g.delete_vertex(b), Err(GraphError::VertexNotFound(_))));
    }

    #[test]
    fn test_delete_vertex_by_payload() {
        let mut g: Graph<String> = Graph::undirected();
        g.add_vertex("keep".to_string());
        let gone = g.add_vertex("drop".to_string());
        let removed = g.delete_vertex_by_payload(&"drop".to_string()).unwrap();
        assert_eq!(removed.id(), gone);
        assert!(g.delete_vertex_by_payload(&"missing".to_string()).is_none());
        assert_eq!(g.vertex_count(), 1);
    }

    #[test]
    fn test_self_loop_deleted_cleanly() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        g.connect_vertices(a, a, "loop", 1.0).unwrap();
        assert_eq!(g.incident_edges(a).unwrap().len(), 1);
        g.delete_vertex(a).unwrap();
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_from_edge_pairs_keeps_ids() {
        let g: Graph<()> = Graph::from_edge_pairs(false, vec![(10, 20), (20, 30)]);
        assert_eq!(g.vertex_ids().collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_connect_unknown_vertex() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        assert!(matches!(
            g.connect_vertices(a, 99, "", 1.0),
            Err(GraphError::VertexNotFound(99))
        ));
        assert_eq!(g.edge_count(), 0);
    }
}
