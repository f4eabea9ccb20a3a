use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use super::{check_lengths, z_scores, BivariateCorrelator, CorrelatorVariant, MoranPair};
use crate::error::{MinerError, MinerResult};
use crate::spatial::{JoinedColumns, SpatialWeightModel};

/// Moran's I against a prebuilt weight model.
///
/// `x` and `y` must follow the same area order as the centroids the model
/// was built from. Only lengths are checked.
#[derive(Debug, Clone, Copy)]
pub struct FastCorrelator<'a> {
    model: &'a SpatialWeightModel,
}

impl<'a> FastCorrelator<'a> {
    pub fn new(model: &'a SpatialWeightModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &SpatialWeightModel {
        self.model
    }

    /// I2 over columns aligned to the model's areas.
    ///
    /// Rows are summed in parallel into one slot each, then the slots are
    /// added in row order so the result does not depend on scheduling.
    pub fn correlate(&self, x: &[f64], y: &[f64]) -> MinerResult<f64> {
        let n = self.model.len();
        check_lengths(x, y, n)?;
        let start = Instant::now();

        let zx = z_scores(x);
        let zy = z_scores(y);
        let weights = self.model.weights();

        let row_sums: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|i| {
                let row = weights.row(i);
                let mut acc = 0.0;
                for j in 0..n {
                    acc += zy[i] * row[j] * zx[j];
                }
                acc
            })
            .collect();

        let mut sum = 0.0;
        for s in &row_sums {
            sum += s;
        }
        let i = sum / self.model.s0();
        debug!(
            areas = n,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fast moran's i"
        );
        Ok(i)
    }
}

impl BivariateCorrelator for FastCorrelator<'_> {
    fn variant(&self) -> CorrelatorVariant {
        CorrelatorVariant::Fast
    }

    fn correlate_joined(&self, columns: &JoinedColumns) -> MinerResult<MoranPair> {
        if !columns.covers(self.model.len()) {
            return Err(MinerError::length_mismatch(
                "joined areas",
                self.model.len(),
                columns.len(),
            ));
        }
        self.correlate(&columns.x, &columns.y).map(MoranPair::single)
    }
}
