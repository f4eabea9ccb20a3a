//! Clustering over dense weight matrices.

mod threshold;

pub use threshold::{
    threshold_range, ClusterAssignment, CutProfileRow, ThresholdClusterer, UNASSIGNED,
};
