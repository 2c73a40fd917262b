use serde::{Deserialize, Serialize};

use crate::data::DatasetEntry;

/// Mean cost and classification accuracy of a model over a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Per-sample cost averaged over output units, then over samples.
    pub cost: f64,
    /// Percentage in `[0, 100]` of samples whose argmax output matches the
    /// argmax of the target.
    pub accuracy: f64,
}

impl From<Evaluation> for (f64, f64) {
    fn from(e: Evaluation) -> Self {
        (e.cost, e.accuracy)
    }
}

/// Anything that can score itself against a dataset. Trace sinks receive
/// the trainer through this trait.
pub trait Evaluate {
    fn evaluate(&self, dataset: &[DatasetEntry]) -> Evaluation;
}
