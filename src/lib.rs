//! `stepwise` library crate.
//!
//! The binary (`stepwise`) is a thin wrapper around this library so that:
//!
//! - the selector is testable without spawning processes
//! - the fitting layer and encoders are reusable from other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
