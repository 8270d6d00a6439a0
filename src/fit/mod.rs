//! Stepwise search.
//!
//! Responsibilities:
//!
//! - fit and score one trial predictor set
//! - run forward / backward selection with entry/exit thresholds
//! - record committed steps and excluded trials

pub mod selection;
pub mod trial;

pub use selection::*;
pub use trial::*;
