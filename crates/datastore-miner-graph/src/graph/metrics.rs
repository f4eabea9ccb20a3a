//! Association weights and normalised cut metrics.

use super::{Graph, VertexId};
use crate::error::GraphResult;

impl<T> Graph<T> {
    /// Sum of the weights of every edge directly joining `a` and `b`.
    ///
    /// Each edge counts once whichever way round it was created, so
    /// `w(a, b) == w(b, a)`. `w(a, a)` sums `a`'s self-loops.
    pub fn w(&self, a: VertexId, b: VertexId) -> GraphResult<f32> {
        self.require(b)?;
        let sum = self
            .incident_edges(a)?
            .into_iter()
            .filter_map(|id| self.edge(id))
            .filter(|e| e.joins(a, b))
            .map(|e| e.weight)
            .sum();
        Ok(sum)
    }

    /// w(A, V): total weight of the distinct edges touching `a`.
    pub fn incident_weight(&self, a: VertexId) -> GraphResult<f32> {
        Ok(self
            .incident_edges(a)?
            .into_iter()
            .filter_map(|id| self.edge(id))
            .map(|e| e.weight)
            .sum())
    }

    /// NCut(A, B) = w(A,B)/w(A,V) + w(A,B)/w(B,V)
    pub fn normalized_cut(&self, a: VertexId, b: VertexId) -> GraphResult<f32> {
        let w_ab = self.w(a, b)?;
        Ok(w_ab / self.incident_weight(a)? + w_ab / self.incident_weight(b)?)
    }

    /// NAssoc(A, B) = w(A,A)/w(A,V) + w(B,B)/w(B,V)
    pub fn normalized_association(&self, a: VertexId, b: VertexId) -> GraphResult<f32> {
        let w_aa = self.w(a, a)?;
        let w_bb = self.w(b, b)?;
        Ok(w_aa / self.incident_weight(a)? + w_bb / self.incident_weight(b)?)
    }
}
