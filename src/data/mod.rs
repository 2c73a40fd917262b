pub mod dataset;
pub mod idx;
pub mod minibatch;

pub use dataset::{Dataset, DatasetEntry};
pub use minibatch::MinibatchGenerator;
