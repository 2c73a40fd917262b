use crate::{
    activation::Activation,
    data::DatasetEntry,
    layers::Layer,
    loss::Cost,
    math::{outer, Vector},
    model::Model,
    optim::{Gradients, Optimizer},
};

use super::evaluation::{Evaluate, Evaluation};

/// Everything a forward pass produces: `activations[0]` is the input and
/// `activations[l + 1] = activation(zs[l])` for each layer `l`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: Vec<Vector>,
    pub zs: Vec<Vector>,
}

impl ForwardPass {
    pub fn output(&self) -> &Vector {
        self.activations
            .last()
            .expect("a forward pass always holds its input")
    }
}

/// Drives one `Model` with injected activation, cost and optimizer
/// strategies.
pub struct Trainer<A, C, O> {
    pub(super) model: Model,
    pub(super) activation: A,
    pub(super) cost: C,
    pub(super) optimizer: O,
}

impl<A: Activation, C: Cost, O: Optimizer> Trainer<A, C, O> {
    pub fn new(model: Model, activation: A, cost: C, optimizer: O) -> Trainer<A, C, O> {
        Trainer {
            model,
            activation,
            cost,
            optimizer,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    // ── Forward ────────────────────────────────────────────────────────────

    pub fn compute_z(&self, layer: &Layer, a: &Vector) -> Vector {
        layer.compute_z(a)
    }

    /// Runs the input through every layer, keeping each pre-activation and
    /// activation for the backward pass.
    pub fn feedforward(&self, input: &Vector) -> ForwardPass {
        let mut activations = Vec::with_capacity(self.model.len() + 1);
        let mut zs = Vec::with_capacity(self.model.len());
        activations.push(input.clone());

        for layer in self.model.layers() {
            let (z, a) = layer.feed_from(&activations[activations.len() - 1], &self.activation);
            zs.push(z);
            activations.push(a);
        }

        ForwardPass { activations, zs }
    }

    /// Output of the last layer only.
    pub fn predict(&self, input: &Vector) -> Vector {
        let mut pass = self.feedforward(input);
        pass.activations
            .pop()
            .expect("a forward pass always holds its input")
    }

    // ── Backward ───────────────────────────────────────────────────────────

    /// Gradient of the cost of one sample with respect to every weight and
    /// bias.
    ///
    /// # Panics
    /// Panics if `pass` was not produced by this model or `ground_truth` is
    /// not as wide as the output layer.
    ///
    /// With `δ_L = cost'(gt, a_L) ⊙ act'(z_L)` and
    /// `δ_l = (W_{l+1}ᵗ δ_{l+1}) ⊙ act'(z_l)`, the gradients are
    /// `∂C/∂b_l = δ_l` and `∂C/∂W_l = δ_l ⊗ a_{l-1}`.
    pub fn backpropagate(&self, ground_truth: &Vector, pass: &ForwardPass) -> Gradients {
        let layers = self.model.layers();
        let count = layers.len();
        assert_eq!(pass.zs.len(), count, "forward pass does not match the model depth");
        assert_eq!(
            pass.activations.len(),
            count + 1,
            "forward pass does not match the model depth"
        );
        if count == 0 {
            return Gradients {
                weights: vec![],
                biases: vec![],
            };
        }
        assert_eq!(
            ground_truth.len(),
            pass.output().len(),
            "target has {} entries but the model outputs {}",
            ground_truth.len(),
            pass.output().len()
        );

        let mut weights = Vec::with_capacity(count);
        let mut biases = Vec::with_capacity(count);
        let mut delta = self
            .cost
            .map_derivative(ground_truth, pass.output())
            .hadamard(&self.activation.map_derivative(&pass.zs[count - 1]));

        for l in (0..count).rev() {
            weights.push(outer(&delta, &pass.activations[l]));
            let next = if l > 0 {
                layers[l]
                    .weights
                    .transpose_mul_vec(&delta)
                    .hadamard(&self.activation.map_derivative(&pass.zs[l - 1]))
            } else {
                Vector::default()
            };
            biases.push(std::mem::replace(&mut delta, next));
        }

        weights.reverse();
        biases.reverse();
        Gradients { weights, biases }
    }

    /// One optimizer step from the averaged gradient of `minibatch`. Returns
    /// the number of samples used; an empty minibatch leaves the model
    /// untouched.
    ///
    /// # Panics
    /// Panics if a sample's input or target does not match the model's
    /// input or output width.
    pub fn update_minibatch<'d, I>(&mut self, minibatch: I, learning_rate: f64) -> usize
    where
        I: IntoIterator<Item = &'d DatasetEntry>,
    {
        let mut sum = Gradients::zeros_like(&self.model);
        let mut count = 0usize;
        for entry in minibatch {
            let pass = self.feedforward(&entry.input);
            sum += &self.backpropagate(&entry.ground_truth, &pass);
            count += 1;
        }
        if count == 0 {
            return 0;
        }

        sum /= count as f64;
        self.optimizer.execute(&mut self.model, &sum, learning_rate);
        count
    }

    // ── Evaluation ─────────────────────────────────────────────────────────

    /// Mean over samples of the per-unit-averaged cost.
    pub fn evaluate_cost(&self, dataset: &[DatasetEntry]) -> f64 {
        self.evaluate(dataset).cost
    }

    /// Percentage of argmax matches.
    pub fn evaluate_accuracy(&self, dataset: &[DatasetEntry]) -> f64 {
        self.evaluate(dataset).accuracy
    }
}

impl<A: Activation, C: Cost, O: Optimizer> Evaluate for Trainer<A, C, O> {
    fn evaluate(&self, dataset: &[DatasetEntry]) -> Evaluation {
        if dataset.is_empty() {
            return Evaluation::default();
        }

        let mut cost = 0.0;
        let mut matches = 0usize;
        for (i, entry) in dataset.iter().enumerate() {
            let output = self.predict(&entry.input);
            let units = self.cost.map(&entry.ground_truth, &output);
            let sample_cost = if units.is_empty() {
                0.0
            } else {
                units.sum() / units.len() as f64
            };
            cost += (sample_cost - cost) / (i + 1) as f64;

            if output.argmax() == entry.ground_truth.argmax() {
                matches += 1;
            }
        }

        Evaluation {
            cost,
            accuracy: 100.0 * matches as f64 / dataset.len() as f64,
        }
    }
}
