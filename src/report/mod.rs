//! Reporting: run summaries, step traces and coefficient tables.

pub mod format;

pub use format::*;
