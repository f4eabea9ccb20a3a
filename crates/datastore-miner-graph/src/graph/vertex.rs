use serde::{Deserialize, Serialize};

use super::{EdgeId, VertexId};

/// A vertex with its payload and edge back-references.
///
/// Adjacency lists hold ids into the graph's edge list; the graph owns the
/// edges. In an undirected graph every incident edge appears in both lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex<T> {
    id: VertexId,
    pub label: Option<String>,
    pub payload: T,
    pub(crate) out_edges: Vec<EdgeId>,
    pub(crate) in_edges: Vec<EdgeId>,
}

impl<T> Vertex<T> {
    pub(crate) fn new(id: VertexId, payload: T) -> Self {
        Self {
            id,
            label: None,
            payload,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Label, or the empty string when none was set.
    pub fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    /// No edge in either list.
    pub fn is_orphan(&self) -> bool {
        self.out_edges.is_empty() && self.in_edges.is_empty()
    }
}
