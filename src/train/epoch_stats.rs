use serde::{Deserialize, Serialize};

/// Train/test scores recorded by [`Tracer`](super::Tracer) after one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub epoch: usize,
    pub train_cost: f64,
    /// Percentage in `[0, 100]`.
    pub train_accuracy: f64,
    pub test_cost: f64,
    /// Percentage in `[0, 100]`.
    pub test_accuracy: f64,
}
