//! Statistics used by the correlators and by matrix comparison.

pub mod matrix;
mod running;

pub use matrix::MatrixComparison;
pub use running::RunningStatistic;
