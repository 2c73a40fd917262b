pub mod math;
pub mod activation;
pub mod layers;
pub mod model;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::{Matrix, Vector};
pub use activation::{Activation, Sigmoid};
pub use layers::Layer;
pub use model::{Model, ModelSpec};
pub use loss::{Cost, QuadraticLoss};
pub use optim::{Adam, Gradients, Optimizer, Sgd};
pub use data::{Dataset, DatasetEntry, MinibatchGenerator};
pub use train::{Evaluate, Evaluation, TraceSink, Tracer, TrainConfig, Trainer};
pub use error::{NetError, Result};
