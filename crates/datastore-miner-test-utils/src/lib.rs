//! Fixtures shared by datastore-miner integration tests.
//!
//! Every generator is deterministic: random data comes from a seeded
//! `StdRng`, so a failing test fails the same way on every run.

mod fixtures;
mod recording;
mod staging;

pub use fixtures::{
    block_correlation_matrix, constant_column, gradient_column, grid_centroids, random_column,
    variable_names,
};
pub use recording::RecordingReporter;
pub use staging::{sample_catalogue, InMemoryCatalogue, InMemoryStager};
