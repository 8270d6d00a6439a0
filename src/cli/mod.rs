//! Command-line parsing for the stepwise selector.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{CategoricalMode, Criterion, Direction, Family};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "stepwise", version, about = "Stepwise regression feature selection (AIC/BIC/R²)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run forward or backward selection on a CSV file and print the result.
    Select(SelectArgs),
    /// Write a synthetic dataset with a known structure to CSV.
    Sample(SampleArgs),
    /// Print the summary of a run saved with `stepwise select --export-json`.
    Report(ReportArgs),
}

/// Options for `stepwise select`.
#[derive(Debug, Parser, Clone)]
pub struct SelectArgs {
    /// Input CSV with a header row.
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: PathBuf,

    /// Response column.
    #[arg(short = 'y', long)]
    pub response: String,

    /// Candidate predictors (comma separated). Defaults to every other column.
    #[arg(short = 'p', long, value_delimiter = ',')]
    pub predictors: Option<Vec<String>>,

    /// Model family fitted for each trial.
    #[arg(long, value_enum, default_value_t = Family::Linear)]
    pub family: Family,

    /// Search direction.
    #[arg(long, value_enum, default_value_t = Direction::Forward)]
    pub direction: Direction,

    /// Criterion compared between trials (r2/adjr2 need the linear family).
    #[arg(short = 'c', long, value_enum, default_value_t = Criterion::Aic)]
    pub criterion: Criterion,

    /// How non-numeric predictors are encoded.
    #[arg(long, value_enum, default_value_t = CategoricalMode::DummyDropFirst)]
    pub categorical: CategoricalMode,

    /// Forward only: maximum p-value for a variable to enter.
    #[arg(long, value_name = "P")]
    pub entry_threshold: Option<f64>,

    /// Backward only: a variable may leave only if its p-value exceeds this.
    #[arg(long, value_name = "P")]
    pub exit_threshold: Option<f64>,

    /// Export the step trace to CSV.
    #[arg(long = "export-trace", value_name = "CSV")]
    pub export_trace: Option<PathBuf>,

    /// Export configuration, trace and final model to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Options for `stepwise sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of rows to generate.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Response type: continuous (linear) or 0/1 (logistic).
    #[arg(long, value_enum, default_value_t = Family::Linear)]
    pub family: Family,

    /// Effect of `a` on the response (log-odds for logistic).
    #[arg(long, default_value_t = 2.0)]
    pub signal: f64,
}

/// Options for re-printing a saved run.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Selection JSON produced by `stepwise select --export-json`.
    #[arg(long, value_name = "JSON")]
    pub json: PathBuf,
}
