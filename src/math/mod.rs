pub mod linalg;
pub mod matrix;
pub mod vector;

pub use linalg::outer;
pub use matrix::Matrix;
pub use vector::Vector;
