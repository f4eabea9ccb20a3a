//! Comparison metrics between two correlation matrices of the same size.
//!
//! Used to judge how far a nearest-neighbour correlation matrix drifts from
//! the full spatial one. All metrics run over every cell, diagonal included.
//! Cells where a ratio would divide by zero are skipped.

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, MinerResult};
use crate::matrix::SquareMatrix;

type Matrix = SquareMatrix<f32>;

fn check_dims(x: &Matrix, y: &Matrix) -> MinerResult<()> {
    if x.dim() != y.dim() {
        return Err(MinerError::length_mismatch("compared matrix", x.dim(), y.dim()));
    }
    Ok(())
}

fn cells<'a>(x: &'a Matrix, y: &'a Matrix) -> impl Iterator<Item = (f32, f32)> + 'a {
    x.iter().copied().zip(y.iter().copied())
}

pub fn mean(x: &Matrix) -> f32 {
    x.iter().sum::<f32>() / x.len() as f32
}

/// Population standard deviation around `mean`.
pub fn standard_deviation(x: &Matrix, mean: f32) -> f32 {
    let ss: f32 = x.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / x.len() as f32).sqrt()
}

/// Pearson correlation of the two matrices treated as flat vectors.
pub fn matrix_correlate(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    let mean_x = mean(x) as f64;
    let mean_y = mean(y) as f64;
    let (mut cross, mut ss_x, mut ss_y) = (0.0f64, 0.0f64, 0.0f64);
    for (a, b) in cells(x, y) {
        let dx = a as f64 - mean_x;
        let dy = b as f64 - mean_y;
        cross += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }
    Ok((cross / (ss_x.sqrt() * ss_y.sqrt())) as f32)
}

pub fn root_mean_square_error(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    let ss: f32 = cells(x, y).map(|(a, b)| (a - b).powi(2)).sum();
    Ok((ss / x.len() as f32).sqrt())
}

/// sqrt(Σ (x - y)² / x) over cells where both are non-zero.
pub fn chi_squared_difference(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    let chi: f32 = cells(x, y)
        .filter(|(a, b)| *a != 0.0 && *b != 0.0)
        .map(|(a, b)| (a - b).powi(2) / a)
        .sum();
    Ok(chi.sqrt())
}

/// Σ min(x, y) / Σ y.
pub fn sorensen_dice_index(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    let (mut shared, mut total) = (0.0f32, 0.0f32);
    for (a, b) in cells(x, y) {
        shared += a.min(b);
        total += b;
    }
    Ok(shared / total)
}

/// Σ min(x, y) / Σ max(x, y).
pub fn jaccard_index(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    let (mut shared, mut union) = (0.0f32, 0.0f32);
    for (a, b) in cells(x, y) {
        shared += a.min(b);
        union += a.max(b);
    }
    Ok(shared / union)
}

pub fn sum_of_ratios(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    Ok(cells(x, y)
        .filter(|(a, b)| *a != 0.0 && *b != 0.0)
        .map(|(a, b)| a / b)
        .sum())
}

pub fn average_ratio(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    Ok(sum_of_ratios(x, y)? / x.len() as f32)
}

pub fn absolute_difference(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    Ok(cells(x, y).map(|(a, b)| (a - b).abs()).sum())
}

pub fn average_absolute_difference(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    Ok(absolute_difference(x, y)? / x.len() as f32)
}

/// Σ |x - y| / x over cells where both are non-zero.
pub fn absolute_percent_difference(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    Ok(cells(x, y)
        .filter(|(a, b)| *a != 0.0 && *b != 0.0)
        .map(|(a, b)| (a - b).abs() / a)
        .sum())
}

pub fn average_absolute_percent_difference(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    Ok(absolute_percent_difference(x, y)? / x.len() as f32)
}

/// Base-10 Shannon entropy of the cells normalised to sum to one.
pub fn entropy(x: &Matrix) -> f32 {
    let total: f32 = x.iter().sum();
    let mut e = 0.0f32;
    for &v in x.iter() {
        let p = v / total;
        // 0 log 0 = 0
        if p != 0.0 {
            e -= p * p.log10();
        }
    }
    e
}

/// Σ p_x log10 |p_x / p_y| with both matrices normalised to sum to one.
pub fn information_difference(x: &Matrix, y: &Matrix) -> MinerResult<f32> {
    check_dims(x, y)?;
    let total_x: f32 = x.iter().sum();
    let total_y: f32 = y.iter().sum();
    let mut info = 0.0f32;
    for (a, b) in cells(x, y) {
        let px = a / total_x;
        let py = b / total_y;
        if px != 0.0 && py != 0.0 {
            info += px * (px / py).abs().log10();
        }
    }
    Ok(info)
}

/// Every comparison metric for one pair of matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixComparison {
    pub mean_x: f32,
    pub mean_y: f32,
    pub sd_x: f32,
    pub sd_y: f32,
    pub correlation: f32,
    pub rmse: f32,
    pub chi_squared: f32,
    pub sorensen_dice: f32,
    pub jaccard: f32,
    pub sum_of_ratios: f32,
    pub average_ratio: f32,
    pub absolute_difference: f32,
    pub average_absolute_difference: f32,
    pub absolute_percent_difference: f32,
    pub average_absolute_percent_difference: f32,
    pub entropy_x: f32,
    pub entropy_y: f32,
    pub information_difference: f32,
}

impl MatrixComparison {
    pub fn compute(x: &Matrix, y: &Matrix) -> MinerResult<Self> {
        check_dims(x, y)?;
        let mean_x = mean(x);
        let mean_y = mean(y);
        Ok(Self {
            mean_x,
            mean_y,
            sd_x: standard_deviation(x, mean_x),
            sd_y: standard_deviation(y, mean_y),
            correlation: matrix_correlate(x, y)?,
            rmse: root_mean_square_error(x, y)?,
            chi_squared: chi_squared_difference(x, y)?,
            sorensen_dice: sorensen_dice_index(x, y)?,
            jaccard: jaccard_index(x, y)?,
            sum_of_ratios: sum_of_ratios(x, y)?,
            average_ratio: average_ratio(x, y)?,
            absolute_difference: absolute_difference(x, y)?,
            average_absolute_difference: average_absolute_difference(x, y)?,
            absolute_percent_difference: absolute_percent_difference(x, y)?,
            average_absolute_percent_difference: average_absolute_percent_difference(x, y)?,
            entropy_x: entropy(x),
            entropy_y: entropy(y),
            information_difference: information_difference(x, y)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<f32>>) -> Matrix {
        SquareMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_identical_matrices() {
        let x = m(vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
        let cmp = MatrixComparison::compute(&x, &x).unwrap();
        assert!((cmp.correlation - 1.0).abs() < 1e-6);
        assert_eq!(cmp.rmse, 0.0);
        assert_eq!(cmp.chi_squared, 0.0);
        assert!((cmp.sorensen_dice - 1.0).abs() < 1e-6);
        assert!((cmp.jaccard - 1.0).abs() < 1e-6);
        assert!((cmp.average_ratio - 1.0).abs() < 1e-6);
        assert_eq!(cmp.absolute_difference, 0.0);
        assert!(cmp.information_difference.abs() < 1e-6);
        assert_eq!(cmp.entropy_x, cmp.entropy_y);
    }

    #[test]
    fn test_mean_and_sd() {
        let x = m(vec![vec![1.0, 3.0], vec![3.0, 1.0]]);
        assert_eq!(mean(&x), 2.0);
        assert_eq!(standard_deviation(&x, 2.0), 1.0);
    }

    #[test]
    fn test_zero_cells_skipped_in_ratios() {
        let x = m(vec![vec![1.0, 0.0], vec![2.0, 4.0]]);
        let y = m(vec![vec![1.0, 5.0], vec![0.0, 2.0]]);
        // only (0,0) and (1,1) have both non-zero
        assert_eq!(sum_of_ratios(&x, &y).unwrap(), 3.0);
        assert_eq!(absolute_percent_difference(&x, &y).unwrap(), 0.5);
        assert_eq!(absolute_difference(&x, &y).unwrap(), 9.0);
    }

    #[test]
    fn test_uniform_entropy() {
        let x = m(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
        // four equal cells: log10(4)
        assert!((entropy(&x) - 4.0f32.log10()).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = m(vec![vec![1.0]]);
        let y = m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(matches!(
            MatrixComparison::compute(&x, &y),
            Err(MinerError::LengthMismatch { .. })
        ));
    }
}
