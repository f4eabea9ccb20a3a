//! Streaming mean and variance accumulator.
//!
//! Welford's online algorithm. Variance is the sample variance (n - 1
//! denominator) and is 0 until at least two values have been pushed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStatistic {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStatistic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate every value in `values`.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut stat = Self::new();
        for &v in values {
            stat.push(v);
        }
        stat
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combine two accumulators as if every value had been pushed into one.
    ///
    /// Chan et al. pairwise update, so partial statistics computed on
    /// separate threads can be reduced afterwards.
    pub fn merge(&mut self, other: &RunningStatistic) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let total = self.count + other.count;
        let delta = other.mean - self.mean;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        self.mean += delta * n_b / total as f64;
        self.m2 += other.m2 + delta * delta * n_a * n_b / total as f64;
        self.count = total;
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of the values pushed so far (0 when empty).
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Constant or too-short input: z-scores would divide by zero.
    pub fn is_degenerate(&self) -> bool {
        let sd = self.standard_deviation();
        !(sd > 0.0) || !sd.is_finite() || !self.mean.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_and_single() {
        let stat = RunningStatistic::new();
        assert_eq!(stat.count(), 0);
        assert_eq!(stat.mean(), 0.0);
        assert_eq!(stat.variance(), 0.0);
        assert!(stat.is_degenerate());

        let stat = RunningStatistic::from_slice(&[4.0]);
        assert_eq!(stat.mean(), 4.0);
        assert_eq!(stat.variance(), 0.0);
    }

    #[test]
    fn test_sample_variance() {
        let stat = RunningStatistic::from_slice(&[1.0, 2.0, 3.0]);
        assert!((stat.mean() - 2.0).abs() < 1e-12);
        assert!((stat.variance() - 1.0).abs() < 1e-12);
        assert!((stat.standard_deviation() - 1.0).abs() < 1e-12);
        assert!(!stat.is_degenerate());
    }

    #[test]
    fn test_constant_column_is_degenerate() {
        let stat = RunningStatistic::from_slice(&[5.0; 10]);
        assert_eq!(stat.variance(), 0.0);
        assert!(stat.is_degenerate());
    }

    #[test]
    fn test_nan_input_is_degenerate() {
        let stat = RunningStatistic::from_slice(&[1.0, f64::NAN, 3.0]);
        assert!(stat.is_degenerate());
    }

    #[test]
    fn test_merge_with_empty() {
        let mut a = RunningStatistic::new();
        let b = RunningStatistic::from_slice(&[1.0, 5.0]);
        a.merge(&b);
        assert_eq!(a, b);

        let mut c = b;
        c.merge(&RunningStatistic::new());
        assert_eq!(c, b);
    }

    proptest! {
        #[test]
        fn prop_merge_matches_sequential(
            left in prop::collection::vec(-1000.0f64..1000.0, 0..40),
            right in prop::collection::vec(-1000.0f64..1000.0, 0..40),
        ) {
            let mut merged = RunningStatistic::from_slice(&left);
            merged.merge(&RunningStatistic::from_slice(&right));

            let all: Vec<f64> = left.iter().chain(right.iter()).copied().collect();
            let sequential = RunningStatistic::from_slice(&all);

            prop_assert_eq!(merged.count(), sequential.count());
            prop_assert!((merged.mean() - sequential.mean()).abs() < 1e-6);
            prop_assert!((merged.variance() - sequential.variance()).abs() < 1e-4 * (1.0 + sequential.variance()));
        }
    }
}
