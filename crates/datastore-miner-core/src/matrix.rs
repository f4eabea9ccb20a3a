//! Dense row-major square matrix.
//!
//! Used for the N×N spatial weight matrix (`f64`) and for the assembled
//! variable-by-variable correlation matrix (`f32`). Allocated once by its
//! builder and then shared by reference.

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, MinerResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> SquareMatrix<T> {
    /// N×N matrix filled with `T::default()`.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![T::default(); n * n],
        }
    }

    /// N×N matrix filled with `value`.
    pub fn filled(n: usize, value: T) -> Self {
        Self {
            n,
            data: vec![value; n * n],
        }
    }
}

impl<T: Copy> SquareMatrix<T> {
    /// Wrap a row-major buffer of length `n * n`.
    pub fn from_row_major(n: usize, data: Vec<T>) -> MinerResult<Self> {
        if data.len() != n * n {
            return Err(MinerError::length_mismatch("matrix data", n * n, data.len()));
        }
        Ok(Self { n, data })
    }

    /// Build from nested rows; every row must have `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<T>>) -> MinerResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(MinerError::length_mismatch("matrix row", n, row.len()));
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[i * self.n + j] = value;
    }

    /// Write `value` at (i, j) and (j, i).
    #[inline]
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: T) {
        self.set(i, j, value);
        self.set(j, i, value);
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on zero size
        self.data.chunks(self.n.max(1))
    }
}

impl<T: Copy + PartialEq> SquareMatrix<T> {
    /// True when `M[i][j] == M[j][i]` for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}

impl SquareMatrix<f32> {
    /// Replace every NaN cell with `value`, returning how many were replaced.
    pub fn replace_nan(&mut self, value: f32) -> usize {
        let mut replaced = 0;
        for cell in self.data.iter_mut() {
            if cell.is_nan() {
                *cell = value;
                replaced += 1;
            }
        }
        replaced
    }

    /// Largest entry off the diagonal, or None for N < 2.
    pub fn max_off_diagonal(&self) -> Option<f32> {
        let mut best: Option<f32> = None;
        for i in 0..self.n {
            for j in 0..self.n {
                if i == j {
                    continue;
                }
                let v = self.get(i, j);
                best = Some(match best {
                    Some(b) if b >= v => b,
                    _ => v,
                });
            }
        }
        best
    }
}

impl SquareMatrix<f64> {
    /// Sum of every cell, row by row.
    pub fn sum(&self) -> f64 {
        self.rows().map(|r| r.iter().sum::<f64>()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_get() {
        let m = SquareMatrix::from_rows(vec![vec![1.0f32, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), 3.0);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = SquareMatrix::from_rows(vec![vec![1.0f32, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MinerError::LengthMismatch { .. }));
    }

    #[test]
    fn test_set_symmetric() {
        let mut m = SquareMatrix::<f32>::zeros(3);
        m.set_symmetric(0, 2, 0.7);
        assert_eq!(m.get(2, 0), 0.7);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_replace_nan_and_max_off_diagonal() {
        let mut m = SquareMatrix::from_rows(vec![
            vec![1.0f32, f32::NAN, 0.2],
            vec![0.4, 1.0, 0.3],
            vec![0.1, 0.9, 1.0],
        ])
        .unwrap();
        assert_eq!(m.replace_nan(0.0), 1);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.max_off_diagonal(), Some(0.9));
        assert_eq!(SquareMatrix::<f32>::zeros(1).max_off_diagonal(), None);
    }

    #[test]
    fn test_empty_matrix() {
        let m = SquareMatrix::<f64>::zeros(0);
        assert!(m.is_empty());
        assert_eq!(m.sum(), 0.0);
        assert_eq!(m.rows().count(), 0);
    }
}
