//! Dense products, delegated to `ndarray`'s BLAS-style kernels over
//! borrowed views of our own storage.

use ndarray::linalg::{general_mat_mul, general_mat_vec_mul};
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2, Axis};

use super::{matrix::Matrix, vector::Vector};

impl Matrix {
    pub(crate) fn view(&self) -> ArrayView2<'_, f64> {
        ArrayView2::from_shape(self.shape(), self.as_slice())
            .expect("matrix storage matches its shape")
    }

    pub(crate) fn view_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        let shape = self.shape();
        ArrayViewMut2::from_shape(shape, self.as_mut_slice())
            .expect("matrix storage matches its shape")
    }

    /// `self · x`.
    pub fn mul_vec(&self, x: &Vector) -> Vector {
        let mut y = Vector::zeros(self.rows());
        self.mul_vec_into(x, 0.0, &mut y);
        y
    }

    /// `self · x + b`, accumulated directly into a copy of `b`.
    pub fn mul_vec_add(&self, x: &Vector, b: &Vector) -> Vector {
        assert_eq!(
            b.len(),
            self.rows(),
            "bias of length {} added to a {}x{} product",
            b.len(),
            self.rows(),
            self.cols()
        );
        let mut y = b.clone();
        self.mul_vec_into(x, 1.0, &mut y);
        y
    }

    /// `selfᵗ · x`, without materializing the transpose.
    pub fn transpose_mul_vec(&self, x: &Vector) -> Vector {
        assert_eq!(
            self.rows(),
            x.len(),
            "cannot multiply the transpose of a {}x{} matrix by a vector of length {}",
            self.rows(),
            self.cols(),
            x.len()
        );
        let mut y = Vector::zeros(self.cols());
        let x_view = ArrayView1::from(x.as_slice());
        let mut y_view = ArrayViewMut1::from(y.as_mut_slice());
        general_mat_vec_mul(1.0, &self.view().t(), &x_view, 0.0, &mut y_view);
        y
    }

    fn mul_vec_into(&self, x: &Vector, beta: f64, y: &mut Vector) {
        assert_eq!(
            self.cols(),
            x.len(),
            "cannot multiply a {}x{} matrix by a vector of length {}",
            self.rows(),
            self.cols(),
            x.len()
        );
        let x_view = ArrayView1::from(x.as_slice());
        let mut y_view = ArrayViewMut1::from(y.as_mut_slice());
        general_mat_vec_mul(1.0, &self.view(), &x_view, beta, &mut y_view);
    }
}

/// Outer product: `out[j][k] = a[j] * b[k]`.
pub fn outer(a: &Vector, b: &Vector) -> Matrix {
    let mut out = Matrix::zeros(a.len(), b.len());
    if out.is_empty() {
        return out;
    }
    let col = ArrayView1::from(a.as_slice()).insert_axis(Axis(1));
    let row = ArrayView1::from(b.as_slice()).insert_axis(Axis(0));
    general_mat_mul(1.0, &col, &row, 0.0, &mut out.view_mut());
    out
}
