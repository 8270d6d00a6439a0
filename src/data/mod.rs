//! Tabular data: the in-memory dataset, categorical encoding, and synthetic samples.

pub mod encode;
pub mod frame;
pub mod sample;

pub use encode::*;
pub use frame::*;
pub use sample::*;
