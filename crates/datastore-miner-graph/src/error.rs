//! Error types for datastore-miner-graph.

use thiserror::Error;

use crate::graph::{EdgeId, VertexId};

/// Error type for graph construction, traversal and export.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Vertex not found: {0}")]
    VertexNotFound(VertexId),

    #[error("Duplicate vertex id: {0}")]
    DuplicateVertex(VertexId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A matrix and its name table disagree in size.
    #[error("Matrix has {matrix} rows but {names} names were given")]
    NameCountMismatch { matrix: usize, names: usize },

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(GraphError::VertexNotFound(7).to_string(), "Vertex not found: 7");
        assert!(GraphError::NameCountMismatch { matrix: 3, names: 2 }
            .to_string()
            .contains("3 rows"));
    }
}
