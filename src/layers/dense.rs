use serde::{Deserialize, Serialize};

use crate::{
    activation::Activation,
    error::{NetError, Result},
    math::{Matrix, Vector},
};

/// One affine transform `z = W·a + b`. `weights` is `nb_nodes x nb_inputs`,
/// `biases` has `nb_nodes` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Vector,
    nb_nodes: usize,
    nb_inputs: usize,
}

impl Layer {
    /// Zero-filled layer; `Model::init` draws the actual parameters.
    pub fn new(nb_inputs: usize, nb_nodes: usize) -> Layer {
        Layer {
            weights: Matrix::zeros(nb_nodes, nb_inputs),
            biases: Vector::zeros(nb_nodes),
            nb_nodes,
            nb_inputs,
        }
    }

    /// Builds a layer around existing parameters. Panics if the bias length
    /// does not match the weight rows.
    pub fn from_parts(weights: Matrix, biases: Vector) -> Layer {
        assert_eq!(
            weights.rows(),
            biases.len(),
            "a {}x{} weight matrix needs {} biases, got {}",
            weights.rows(),
            weights.cols(),
            weights.rows(),
            biases.len()
        );
        let (nb_nodes, nb_inputs) = weights.shape();
        Layer {
            weights,
            biases,
            nb_nodes,
            nb_inputs,
        }
    }

    pub fn nb_nodes(&self) -> usize {
        self.nb_nodes
    }

    pub fn nb_inputs(&self) -> usize {
        self.nb_inputs
    }

    /// `W·a + b`.
    pub fn compute_z(&self, a: &Vector) -> Vector {
        assert_eq!(
            a.len(),
            self.nb_inputs,
            "layer expects {} inputs, got {}",
            self.nb_inputs,
            a.len()
        );
        self.weights.mul_vec_add(a, &self.biases)
    }

    /// Returns `(z, activation(z))`; the caller keeps both for backprop.
    pub fn feed_from<A: Activation + ?Sized>(&self, input: &Vector, activation: &A) -> (Vector, Vector) {
        let z = self.compute_z(input);
        let a = activation.map(&z);
        (z, a)
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Vector, lr: f64) {
        self.weights.scaled_sub(lr, weights_grad);
        self.biases.scaled_sub(lr, biases_grad);
    }

    /// Verifies the recorded widths against the parameter buffers.
    pub fn check_shape(&self) -> Result<()> {
        self.weights.check_storage()?;
        if self.weights.rows() != self.nb_nodes {
            return Err(NetError::ShapeMismatch {
                what: "weight rows",
                got: self.weights.rows(),
                expected: self.nb_nodes,
            });
        }
        if self.weights.cols() != self.nb_inputs {
            return Err(NetError::ShapeMismatch {
                what: "weight cols",
                got: self.weights.cols(),
                expected: self.nb_inputs,
            });
        }
        if self.biases.len() != self.nb_nodes {
            return Err(NetError::ShapeMismatch {
                what: "biases",
                got: self.biases.len(),
                expected: self.nb_nodes,
            });
        }
        Ok(())
    }
}
