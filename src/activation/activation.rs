use crate::math::Vector;

/// Elementwise activation strategy applied after each dense layer.
pub trait Activation {
    fn execute(&self, x: f64) -> f64;

    /// Derivative with respect to the pre-activation `x`.
    fn derivative(&self, x: f64) -> f64;

    fn map(&self, z: &Vector) -> Vector {
        z.map(|x| self.execute(x))
    }

    fn map_derivative(&self, z: &Vector) -> Vector {
        z.map(|x| self.derivative(x))
    }
}

/// Logistic function `1 / (1 + e^-x)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    fn execute(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    fn derivative(&self, x: f64) -> f64 {
        let fx = self.execute(x);
        fx * (1.0 - fx)
    }
}
