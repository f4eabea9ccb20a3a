//! Area geometry: centroids, per-area variables, weights and neighbours.
//!
//! Every structure here that is built from a [`CentroidSet`] shares its
//! ordering, so index `i` names the same area in the weight matrix, the
//! nearest-neighbour table and an aligned variable array.

mod centroid;
mod knn;
mod weights;

pub use centroid::{inner_join, AreaKey, Centroid, CentroidSet, JoinedColumns, VariableVector};
pub use knn::KNearestNeighbourIndex;
pub use weights::{euclidean, inverse_distance_weight, SpatialWeightModel};
