//! Numerical kernels: least squares, logistic Newton iterations, and coefficient inference.

pub mod inference;
pub mod logit;
pub mod ols;

pub use inference::*;
pub use logit::*;
pub use ols::*;
