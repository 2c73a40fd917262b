use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, DivAssign, Index, IndexMut, SubAssign};

use crate::error::{NetError, Result};

/// Row-major owning matrix. Row `i` is the contiguous slice
/// `data[i * cols .. (i + 1) * cols]`, reachable as `m[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        assert_eq!(
            data.len(),
            rows * cols,
            "matrix storage of length {} cannot hold {}x{}",
            data.len(),
            rows,
            cols
        );
        Matrix { rows, cols, data }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Matrix {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            assert_eq!(row.len(), n_cols, "Matrices rows must all have the same length");
            data.extend(row);
        }
        Matrix {
            rows: n_rows,
            cols: n_cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Moves the storage out, leaving `self` as a 0x0 matrix.
    pub fn take(&mut self) -> Matrix {
        std::mem::take(self)
    }

    /// Checks that the storage length agrees with `rows * cols`. Only needed
    /// for matrices that did not come from a constructor (e.g. deserialized).
    pub fn check_storage(&self) -> Result<()> {
        if self.data.len() != self.rows * self.cols {
            return Err(NetError::ShapeMismatch {
                what: "matrix storage",
                got: self.data.len(),
                expected: self.rows * self.cols,
            });
        }
        Ok(())
    }

    /// `self -= c * other`, elementwise.
    pub fn scaled_sub(&mut self, c: f64, other: &Matrix) {
        self.assert_same_shape(other, "scaled_sub");
        for (x, y) in self.data.iter_mut().zip(&other.data) {
            *x -= c * y;
        }
    }

    fn assert_same_shape(&self, other: &Matrix, op: &str) {
        if self.shape() != other.shape() {
            panic!(
                "Matrices are of incorrect sizes for {}: {}x{} vs {}x{}",
                op, self.rows, self.cols, other.rows, other.cols
            );
        }
    }
}

impl Index<usize> for Matrix {
    type Output = [f64];

    fn index(&self, row: usize) -> &[f64] {
        self.row(row)
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut [f64] {
        self.row_mut(row)
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        self.assert_same_shape(rhs, "+=");
        for (x, y) in self.data.iter_mut().zip(&rhs.data) {
            *x += y;
        }
    }
}

impl SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &Matrix) {
        self.assert_same_shape(rhs, "-=");
        for (x, y) in self.data.iter_mut().zip(&rhs.data) {
            *x -= y;
        }
    }
}

impl DivAssign<f64> for Matrix {
    fn div_assign(&mut self, c: f64) {
        self.data.iter_mut().for_each(|x| *x /= c);
    }
}
