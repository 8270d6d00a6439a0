//! Error types.
//!
//! - `AppError` covers configuration, data and I/O problems and carries the
//!   process exit code used by the binary.
//! - `FitError` is the outcome of a single failed model fit. The selector
//!   treats it as "trial unavailable" rather than aborting a run.

use thiserror::Error;

/// Exit code for invalid configuration, usage or I/O failures.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for insufficient or degenerate data.
pub const EXIT_DATA: u8 = 3;
/// Exit code for internal numeric failures.
pub const EXIT_NUMERIC: u8 = 4;

#[derive(Clone, PartialEq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Shorthand for an `EXIT_CONFIG` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    /// Shorthand for an `EXIT_DATA` error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(EXIT_DATA, message)
    }

    /// Shorthand for an `EXIT_NUMERIC` error.
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(EXIT_NUMERIC, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a single model fit could not produce usable scores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("singular design matrix (rank {rank} < {cols} columns)")]
    Singular { rank: usize, cols: usize },

    #[error("underdetermined fit: {rows} observations for {cols} parameters")]
    Underdetermined { rows: usize, cols: usize },

    #[error("did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("perfect separation: fitted probabilities reproduce the response")]
    PerfectSeparation,

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}
