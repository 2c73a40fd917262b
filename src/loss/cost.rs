use crate::math::Vector;

/// Per-output-unit cost strategy, taking `(ground_truth, output)` pairs.
pub trait Cost {
    fn execute(&self, ground_truth: f64, output: f64) -> f64;

    /// Derivative with respect to `output`, not the target.
    fn derivative(&self, ground_truth: f64, output: f64) -> f64;

    fn map(&self, ground_truth: &Vector, output: &Vector) -> Vector {
        ground_truth.zip_map(output, |gt, y| self.execute(gt, y))
    }

    fn map_derivative(&self, ground_truth: &Vector, output: &Vector) -> Vector {
        ground_truth.zip_map(output, |gt, y| self.derivative(gt, y))
    }
}
