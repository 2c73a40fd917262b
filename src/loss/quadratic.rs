use super::cost::Cost;

/// `0.5 * (gt - y)²` per output unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadraticLoss;

impl Cost for QuadraticLoss {
    fn execute(&self, ground_truth: f64, output: f64) -> f64 {
        let diff = ground_truth - output;
        0.5 * diff * diff
    }

    fn derivative(&self, ground_truth: f64, output: f64) -> f64 {
        output - ground_truth
    }
}
