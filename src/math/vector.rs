use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, DivAssign, Index, IndexMut, SubAssign};

/// Owning, fixed-length numeric buffer.
///
/// `Clone` always produces an independent copy of the storage. Moving a
/// `Vector` transfers the allocation; [`Vector::take`] does the same through a
/// `&mut` and leaves the source empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    pub fn zeros(len: usize) -> Vector {
        Vector { data: vec![0.0; len] }
    }

    pub fn from_vec(data: Vec<f64>) -> Vector {
        Vector { data }
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

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Moves the storage out, leaving `self` with length 0.
    pub fn take(&mut self) -> Vector {
        std::mem::take(self)
    }

    /// `self -= c * other`, elementwise.
    pub fn scaled_sub(&mut self, c: f64, other: &Vector) {
        assert_eq!(
            self.len(),
            other.len(),
            "vector length mismatch in scaled_sub"
        );
        for (x, y) in self.data.iter_mut().zip(&other.data) {
            *x -= c * y;
        }
    }

    /// Elementwise (Hadamard) product. Reuses `self`'s storage.
    pub fn hadamard(mut self, other: &Vector) -> Vector {
        assert_eq!(self.len(), other.len(), "vector length mismatch in hadamard");
        for (x, y) in self.data.iter_mut().zip(&other.data) {
            *x *= y;
        }
        self
    }

    pub fn map<F>(&self, functor: F) -> Vector
    where
        F: Fn(f64) -> f64,
    {
        self.data.iter().map(|&x| functor(x)).collect()
    }

    /// Applies `functor` pairwise; both vectors must have the same length.
    pub fn zip_map<F>(&self, other: &Vector, functor: F) -> Vector
    where
        F: Fn(f64, f64) -> f64,
    {
        assert_eq!(self.len(), other.len(), "vector length mismatch in zip_map");
        self.data
            .iter()
            .zip(&other.data)
            .map(|(&x, &y)| functor(x, y))
            .collect()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Index of the largest entry; ties resolve to the lowest index.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &x) in self.data.iter().enumerate() {
            if x > self.data[best] {
                best = i;
            }
        }
        best
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::from_vec(data)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(data: [f64; N]) -> Self {
        Vector::from_vec(data.to_vec())
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.data[idx]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, idx: usize) -> &mut f64 {
        &mut self.data[idx]
    }
}

impl AddAssign<&Vector> for Vector {
    fn add_assign(&mut self, rhs: &Vector) {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch in +=");
        for (x, y) in self.data.iter_mut().zip(&rhs.data) {
            *x += y;
        }
    }
}

impl SubAssign<&Vector> for Vector {
    fn sub_assign(&mut self, rhs: &Vector) {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch in -=");
        for (x, y) in self.data.iter_mut().zip(&rhs.data) {
            *x -= y;
        }
    }
}

impl DivAssign<f64> for Vector {
    fn div_assign(&mut self, c: f64) {
        self.data.iter_mut().for_each(|x| *x /= c);
    }
}
