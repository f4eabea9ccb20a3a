use std::time::Instant;

use tracing::debug;

use super::{check_lengths, BivariateCorrelator, CorrelatorVariant, MoranPair};
use crate::error::MinerResult;
use crate::spatial::{inverse_distance_weight, JoinedColumns};
use crate::stats::RunningStatistic;

/// Full O(N²) Moran's I with weights recomputed from coordinates.
///
/// Needs no prebuilt weight model, so it works on any inner join.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactCorrelator;

impl ExactCorrelator {
    pub fn new() -> Self {
        Self
    }

    pub fn correlate(&self, x: &[f64], y: &[f64], coords: &[[f64; 2]]) -> MinerResult<MoranPair> {
        spatial_bivariate_moran_i(x, y, coords)
    }
}

impl BivariateCorrelator for ExactCorrelator {
    fn variant(&self) -> CorrelatorVariant {
        CorrelatorVariant::Exact
    }

    fn correlate_joined(&self, columns: &JoinedColumns) -> MinerResult<MoranPair> {
        spatial_bivariate_moran_i(&columns.x, &columns.y, &columns.coords)
    }
}

/// Bivariate spatial Moran's I over aligned `x`, `y` and `coords`.
///
/// ```text
/// I1 = ΣΣ Y[i]·W[i][j]·X[j] / (S0 · sqrt(Var(Y)·Var(X)))
/// I2 = ΣΣ zY[i]·W[i][j]·zX[j] / S0
/// ```
///
/// # Errors
///
/// `LengthMismatch` if the three inputs are not the same length.
pub fn spatial_bivariate_moran_i(
    x: &[f64],
    y: &[f64],
    coords: &[[f64; 2]],
) -> MinerResult<MoranPair> {
    check_lengths(x, y, coords.len())?;
    let start = Instant::now();

    let stat_x = RunningStatistic::from_slice(x);
    let stat_y = RunningStatistic::from_slice(y);
    let (mean_x, sd_x) = (stat_x.mean(), stat_x.standard_deviation());
    let (mean_y, sd_y) = (stat_y.mean(), stat_y.standard_deviation());

    let (mut sum1, mut sum2, mut s0) = (0.0, 0.0, 0.0);
    for i in 0..y.len() {
        let zy = (y[i] - mean_y) / sd_y;
        for j in 0..x.len() {
            let w = inverse_distance_weight(coords[i], coords[j]);
            sum1 += y[i] * w * x[j];
            sum2 += zy * w * ((x[j] - mean_x) / sd_x);
            s0 += w;
        }
    }

    let i1 = sum1 / (s0 * (stat_y.variance() * stat_x.variance()).sqrt());
    let i2 = sum2 / s0;
    debug!(
        areas = x.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "exact moran's i"
    );
    Ok(MoranPair { i1: Some(i1), i2 })
}
