//! Datastore Miner Core Library
//!
//! Numeric engine for mining spatially-referenced tabular datasets: which
//! per-area variables are spatially related to each other.
//!
//! # Architecture
//!
//! This crate defines:
//! - Error types and result aliases (`MinerError`, `MinerResult`)
//! - Configuration structures (`MinerConfig`)
//! - Progress reporting (`ProgressReporter`, `TracingReporter`)
//! - Dense square matrices (`SquareMatrix`)
//! - Streaming and matrix statistics (`RunningStatistic`, `stats::matrix`)
//! - Area geometry (`CentroidSet`, `VariableVector`, `inner_join`)
//! - Spatial weights (`SpatialWeightModel`) and nearest neighbours (`KNearestNeighbourIndex`)
//! - Bivariate spatial Moran's I in three variants (`ExactCorrelator`,
//!   `FastCorrelator`, `KnnCorrelator`)
//!
//! # Example
//!
//! ```
//! use datastore_miner_core::spatial::{CentroidSet, SpatialWeightModel};
//! use datastore_miner_core::correlation::FastCorrelator;
//!
//! let centroids = CentroidSet::from_points(vec![
//!     ("A".to_string(), 0.0, 0.0),
//!     ("B".to_string(), 0.0, 0.0),
//!     ("C".to_string(), 10.0, 0.0),
//! ])
//! .unwrap();
//! let model = SpatialWeightModel::from_centroids(&centroids);
//! assert!((model.s0() - 5.4).abs() < 1e-12);
//!
//! let fast = FastCorrelator::new(&model);
//! let i = fast.correlate(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
//! assert!(i < 0.0);
//! ```

pub mod config;
pub mod correlation;
pub mod error;
pub mod matrix;
pub mod progress;
pub mod spatial;
pub mod stats;

// Re-exports for convenience
pub use config::MinerConfig;
pub use correlation::{
    BivariateCorrelator, CorrelatorVariant, ExactCorrelator, FastCorrelator, KnnCorrelator,
    MoranPair,
};
pub use error::{MinerError, MinerResult};
pub use matrix::SquareMatrix;
pub use progress::{NullReporter, ProgressEvent, ProgressReporter, SweepSummary, TracingReporter};
pub use spatial::{
    inner_join, AreaKey, Centroid, CentroidSet, JoinedColumns, KNearestNeighbourIndex,
    SpatialWeightModel, VariableVector,
};
pub use stats::RunningStatistic;
