use crate::{
    layers::Layer,
    math::{Matrix, Vector},
    model::Model,
};

use super::optimizer::{assert_matches_model, Gradients, Optimizer};

/// Plain gradient descent: `param -= learning_rate * grad`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgd;

impl Sgd {
    pub fn new() -> Sgd {
        Sgd
    }

    /// Applies one SGD update to a layer given its gradients.
    pub fn step(&self, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Vector, lr: f64) {
        layer.apply_gradients(weights_grad, biases_grad, lr);
    }
}

impl Optimizer for Sgd {
    fn execute(&mut self, model: &mut Model, grads: &Gradients, learning_rate: f64) {
        assert_matches_model(model, grads);
        for (l, layer) in model.layers_mut().iter_mut().enumerate() {
            self.step(layer, &grads.weights[l], &grads.biases[l], learning_rate);
        }
    }
}
