//! Datastore Miner Graph
//!
//! Weighted graph abstraction used to turn a correlation matrix (or dataset
//! keyword co-occurrence) into clusters and browsable networks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SquareMatrix<f32> ──► ThresholdClusterer ──► cluster counts │
//! │        │                                                     │
//! │        └─► builders::correlation_graph ──► Graph<String>     │
//! │  DatasetText ──► builders::keyword_graph ──► Graph<DataNode> │
//! │                                                              │
//! │  Graph<T> ──► traversal (Dijkstra, k-connected, MST, flatten)│
//! │           ──► export (Pajek .net, GEXF)                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - **Graph Module**: arena-style vertices and edges with NCut/NAssoc metrics
//! - **Traversal Module**: shortest path, bounded reach, spanning forest, polylines
//! - **Clustering Module**: threshold flood-fill over dense matrices
//! - **Export Module**: interchange formats for external visualisation tools
//!
//! # Usage
//!
//! ```
//! use datastore_miner_graph::Graph;
//!
//! let mut g: Graph<&str> = Graph::undirected();
//! let a = g.add_vertex("a");
//! let b = g.add_vertex("b");
//! let c = g.add_vertex("c");
//! g.connect_vertices(a, b, "", 1.0).unwrap();
//! g.connect_vertices(b, c, "", 2.0).unwrap();
//!
//! assert_eq!(g.shortest_path(a, c).unwrap(), vec![a, b, c]);
//! assert_eq!(g.w(c, b).unwrap(), 2.0);
//! ```

pub mod builders;
pub mod clustering;
pub mod error;
pub mod export;
pub mod graph;
pub mod traversal;

// Re-exports
pub use builders::{correlation_graph, keyword_graph, single_connect, DataNode, DatasetText};
pub use clustering::{ClusterAssignment, CutProfileRow, ThresholdClusterer};
pub use error::{GraphError, GraphResult};
pub use export::ExportFormat;
pub use graph::{Edge, EdgeId, Graph, Vertex, VertexId};
pub use traversal::PathResult;
