use std::fmt;

use serde::{Deserialize, Serialize};

use super::VertexId;

/// Handle to an edge in its graph's master edge list.
///
/// Ids are never reused within a graph, so a stale handle to a deleted
/// edge is detected rather than aliasing a newer edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) u64);

impl EdgeId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A weighted, labelled edge.
///
/// Endpoints are fixed once created. In an undirected graph `from` and
/// `to` are interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    directed: bool,
    from: VertexId,
    to: VertexId,
    pub weight: f32,
    pub label: String,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        directed: bool,
        from: VertexId,
        to: VertexId,
        label: String,
        weight: f32,
    ) -> Self {
        Self {
            id,
            directed,
            from,
            to,
            weight,
            label,
        }
    }

    #[inline]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    #[inline]
    pub fn from(&self) -> VertexId {
        self.from
    }

    #[inline]
    pub fn to(&self) -> VertexId {
        self.to
    }

    /// The endpoint that is not `v`, or None if `v` is not an endpoint.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.from == v {
            Some(self.to)
        } else if self.to == v {
            Some(self.from)
        } else {
            None
        }
    }

    /// True when the edge joins `a` and `b`, in either order.
    pub fn joins(&self, a: VertexId, b: VertexId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn touches(&self, v: VertexId) -> bool {
        self.from == v || self.to == v
    }
}
