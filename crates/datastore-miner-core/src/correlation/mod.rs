//! Bivariate spatial Moran's I.
//!
//! Three interchangeable variants:
//!
//! - [`ExactCorrelator`] recomputes every weight inline from coordinates and
//!   returns both the I1 and I2 forms.
//! - [`FastCorrelator`] reuses a prebuilt [`SpatialWeightModel`] and reduces
//!   rows in parallel.
//! - [`KnnCorrelator`] replaces the dense weights with a fixed self weight
//!   plus a fixed weight for each of the K nearest neighbours.
//!
//! Constant inputs make the z-scores divide by zero. The correlators do not
//! fail on that: they return the resulting NaN and leave the decision to
//! the caller.
//!
//! [`SpatialWeightModel`]: crate::spatial::SpatialWeightModel

mod exact;
mod fast;
mod knn;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, MinerResult};
use crate::spatial::JoinedColumns;
use crate::stats::RunningStatistic;

pub use exact::{spatial_bivariate_moran_i, ExactCorrelator};
pub use fast::FastCorrelator;
pub use knn::KnnCorrelator;

/// Weight of an area's own cross product in the nearest-neighbour variant.
pub const KNN_SELF_WEIGHT: f64 = 1.0;
/// Weight of each neighbour's cross product in the nearest-neighbour variant.
pub const KNN_NEIGHBOUR_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelatorVariant {
    Exact,
    Fast,
    Knn,
}

impl CorrelatorVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelatorVariant::Exact => "exact",
            CorrelatorVariant::Fast => "fast",
            CorrelatorVariant::Knn => "knn",
        }
    }
}

impl fmt::Display for CorrelatorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrelatorVariant {
    type Err = MinerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(CorrelatorVariant::Exact),
            "fast" => Ok(CorrelatorVariant::Fast),
            "knn" => Ok(CorrelatorVariant::Knn),
            other => Err(MinerError::ConfigError(format!(
                "unknown correlator variant \"{}\" (expected exact, fast or knn)",
                other
            ))),
        }
    }
}

/// Result of one correlation.
///
/// `i2` is the standard z-scored form every variant produces. `i1` is the
/// alternative un-centred form, only computed by the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoranPair {
    pub i1: Option<f64>,
    pub i2: f64,
}

impl MoranPair {
    pub fn single(i2: f64) -> Self {
        Self { i1: None, i2 }
    }

    /// True when I2 (and I1, if computed) are finite.
    pub fn is_finite(&self) -> bool {
        self.i2.is_finite() && self.i1.map_or(true, f64::is_finite)
    }
}

/// Common interface so the sweep drivers can run any variant.
pub trait BivariateCorrelator: Send + Sync {
    fn variant(&self) -> CorrelatorVariant;

    /// Correlate two inner-joined columns.
    fn correlate_joined(&self, columns: &JoinedColumns) -> MinerResult<MoranPair>;
}

pub(crate) fn check_lengths(x: &[f64], y: &[f64], expected: usize) -> MinerResult<()> {
    if x.len() != expected {
        return Err(MinerError::length_mismatch("x", expected, x.len()));
    }
    if y.len() != expected {
        return Err(MinerError::length_mismatch("y", expected, y.len()));
    }
    Ok(())
}

/// (value - mean) / sd for every value.
pub(crate) fn z_scores(values: &[f64]) -> Vec<f64> {
    let stat = RunningStatistic::from_slice(values);
    let (mean, sd) = (stat.mean(), stat.standard_deviation());
    values.iter().map(|v| (v - mean) / sd).collect()
}
