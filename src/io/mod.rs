//! Input/output helpers.
//!
//! - CSV ingest + column typing (`ingest`)
//! - trace CSV, selection JSON and dataset CSV exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
