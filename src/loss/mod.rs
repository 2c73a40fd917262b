pub mod cost;
pub mod quadratic;

pub use cost::Cost;
pub use quadratic::QuadraticLoss;
