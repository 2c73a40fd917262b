pub mod adam;
pub mod optimizer;
pub mod sgd;

pub use adam::Adam;
pub use optimizer::{Gradients, Optimizer};
pub use sgd::Sgd;
