//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration enums (`Family`, `Direction`, `Criterion`, `CategoricalMode`)
//! - fit outputs (`ModelFit`)
//! - selection outputs (`Selection`, `IterationRecord`, `ExcludedTrial`)

pub mod types;

pub use types::*;
