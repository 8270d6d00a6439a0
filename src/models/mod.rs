//! Regression models: design matrices and per-family fitting.
//!
//! Models are implemented as small, pure functions so that the selection loop
//! can stay generic over the family.

pub mod design;
pub mod fit;

pub use design::*;
pub use fit::*;
