use crate::{
    error::{NetError, Result},
    math::{Matrix, Vector},
    model::Model,
};

use super::optimizer::{assert_matches_model, Gradients, Optimizer};

pub const BETA1: f64 = 0.9;
pub const BETA2: f64 = 0.999;
pub const EPSILON: f64 = 1e-8;

/// First and second moment accumulators, one per parameter array.
#[derive(Debug, Clone)]
struct Moments {
    m_w: Vec<Matrix>,
    v_w: Vec<Matrix>,
    m_b: Vec<Vector>,
    v_b: Vec<Vector>,
}

impl Moments {
    fn zeros_like(grads: &Gradients) -> Moments {
        let mats = || grads.weights.iter().map(|g| Matrix::zeros(g.rows(), g.cols())).collect();
        let vecs = || grads.biases.iter().map(|g| Vector::zeros(g.len())).collect();
        Moments {
            m_w: mats(),
            v_w: mats(),
            m_b: vecs(),
            v_b: vecs(),
        }
    }
}

/// Adam with bias-corrected moment estimates.
///
/// The accumulators are allocated on the first call to `execute`, shaped
/// after the gradients it receives. `beta1_t` and `beta2_t` hold `β1^t` and
/// `β2^t` for the step being applied.
#[derive(Debug, Clone)]
pub struct Adam {
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    beta1_t: f64,
    beta2_t: f64,
    moments: Option<Moments>,
}

impl Default for Adam {
    fn default() -> Self {
        Adam::new()
    }
}

impl Adam {
    pub fn new() -> Adam {
        Adam {
            beta1: BETA1,
            beta2: BETA2,
            epsilon: EPSILON,
            beta1_t: BETA1,
            beta2_t: BETA2,
            moments: None,
        }
    }

    /// Custom hyperparameters. Both betas must lie in `[0, 1)` and epsilon
    /// must be positive.
    pub fn with_params(beta1: f64, beta2: f64, epsilon: f64) -> Result<Adam> {
        for (name, beta) in [("beta1", beta1), ("beta2", beta2)] {
            if !(beta.is_finite() && (0.0..1.0).contains(&beta)) {
                return Err(NetError::InvalidConfig(format!(
                    "adam {name} must be finite and in [0,1), got {beta}"
                )));
            }
        }
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "adam epsilon must be finite and > 0, got {epsilon}"
            )));
        }
        Ok(Adam {
            beta1,
            beta2,
            epsilon,
            beta1_t: beta1,
            beta2_t: beta2,
            moments: None,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.moments.is_some()
    }

    /// `(β1^t, β2^t)` that the next call will use for bias correction.
    pub fn decay_powers(&self) -> (f64, f64) {
        (self.beta1_t, self.beta2_t)
    }

    fn update(&self, params: &mut [f64], grads: &[f64], m: &mut [f64], v: &mut [f64], lr: f64) {
        let Self {
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            beta1_t,
            beta2_t,
            ..
        } = *self;
        let corr1 = 1.0 - beta1_t;
        let corr2 = 1.0 - beta2_t;

        params
            .iter_mut()
            .zip(grads)
            .zip(m.iter_mut())
            .zip(v.iter_mut())
            .for_each(|(((p, &g), m), v)| {
                *m = b1 * *m + (1.0 - b1) * g;
                *v = b2 * *v + (1.0 - b2) * g * g;
                let m_hat = *m / corr1;
                let v_hat = *v / corr2;
                *p -= lr * m_hat / (v_hat.sqrt() + eps);
            });
    }
}

impl Optimizer for Adam {
    fn execute(&mut self, model: &mut Model, grads: &Gradients, learning_rate: f64) {
        assert_matches_model(model, grads);

        let mut moments = match self.moments.take() {
            Some(moments) => moments,
            None => {
                self.beta1_t = self.beta1;
                self.beta2_t = self.beta2;
                Moments::zeros_like(grads)
            }
        };
        assert_eq!(
            moments.m_w.len(),
            grads.len(),
            "adam state was allocated for a different model"
        );

        for (l, layer) in model.layers_mut().iter_mut().enumerate() {
            assert_eq!(
                moments.m_w[l].shape(),
                grads.weights[l].shape(),
                "adam state was allocated for a different model"
            );
            self.update(
                layer.weights.as_mut_slice(),
                grads.weights[l].as_slice(),
                moments.m_w[l].as_mut_slice(),
                moments.v_w[l].as_mut_slice(),
                learning_rate,
            );
            self.update(
                layer.biases.as_mut_slice(),
                grads.biases[l].as_slice(),
                moments.m_b[l].as_mut_slice(),
                moments.v_b[l].as_mut_slice(),
                learning_rate,
            );
        }

        self.moments = Some(moments);
        self.beta1_t *= self.beta1;
        self.beta2_t *= self.beta2;
    }
}
