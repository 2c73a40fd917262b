use std::ops::{AddAssign, DivAssign};

use crate::{
    math::{Matrix, Vector},
    model::Model,
};

/// One weight gradient and one bias gradient per layer, shaped exactly like
/// the layer's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Vector>,
}

impl Gradients {
    pub fn zeros_like(model: &Model) -> Gradients {
        Gradients {
            weights: model
                .layers()
                .iter()
                .map(|l| Matrix::zeros(l.nb_nodes(), l.nb_inputs()))
                .collect(),
            biases: model
                .layers()
                .iter()
                .map(|l| Vector::zeros(l.nb_nodes()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl AddAssign<&Gradients> for Gradients {
    fn add_assign(&mut self, rhs: &Gradients) {
        assert_eq!(self.len(), rhs.len(), "gradient bundles cover a different number of layers");
        for (lhs, rhs) in self.weights.iter_mut().zip(&rhs.weights) {
            *lhs += rhs;
        }
        for (lhs, rhs) in self.biases.iter_mut().zip(&rhs.biases) {
            *lhs += rhs;
        }
    }
}

impl DivAssign<f64> for Gradients {
    fn div_assign(&mut self, c: f64) {
        self.weights.iter_mut().for_each(|w| *w /= c);
        self.biases.iter_mut().for_each(|b| *b /= c);
    }
}

/// Turns an aggregated gradient into an in-place parameter update.
pub trait Optimizer {
    fn execute(&mut self, model: &mut Model, grads: &Gradients, learning_rate: f64);
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn execute(&mut self, model: &mut Model, grads: &Gradients, learning_rate: f64) {
        (**self).execute(model, grads, learning_rate)
    }
}

/// Panics unless every gradient has the shape of the matching parameter.
pub(crate) fn assert_matches_model(model: &Model, grads: &Gradients) {
    assert_eq!(
        grads.weights.len(),
        model.len(),
        "got weight gradients for {} layers, model has {}",
        grads.weights.len(),
        model.len()
    );
    assert_eq!(
        grads.biases.len(),
        model.len(),
        "got bias gradients for {} layers, model has {}",
        grads.biases.len(),
        model.len()
    );
    for (l, layer) in model.layers().iter().enumerate() {
        assert_eq!(
            grads.weights[l].shape(),
            (layer.nb_nodes(), layer.nb_inputs()),
            "weight gradient shape mismatch at layer {l}"
        );
        assert_eq!(
            grads.biases[l].len(),
            layer.nb_nodes(),
            "bias gradient length mismatch at layer {l}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_like_follows_model_shapes() {
        let mut m = Model::new();
        m.add_layer(3, 2).add_layer(2, 1);
        let g = Gradients::zeros_like(&m);
        assert_eq!(g.len(), 2);
        assert_eq!(g.weights[0].shape(), (2, 3));
        assert_eq!(g.biases[1].len(), 1);
        assert_matches_model(&m, &g);
    }

    #[test]
    fn sum_then_average() {
        let mut m = Model::new();
        m.add_layer(1, 1);
        let mut acc = Gradients::zeros_like(&m);
        let mut g = Gradients::zeros_like(&m);
        g.weights[0][0][0] = 3.0;
        g.biases[0][0] = 1.0;
        acc += &g;
        acc += &g;
        acc /= 2.0;
        assert_eq!(acc, g);
    }

    #[test]
    #[should_panic(expected = "weight gradient shape mismatch")]
    fn mismatched_bundle_is_fatal() {
        let mut a = Model::new();
        a.add_layer(3, 2);
        let mut b = Model::new();
        b.add_layer(2, 2);
        assert_matches_model(&a, &Gradients::zeros_like(&b));
    }
}
