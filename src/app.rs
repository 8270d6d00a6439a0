//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the selection pipeline and prints the report
//! - writes synthetic samples
//! - re-prints runs saved as JSON

use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Command, ReportArgs, SampleArgs, SelectArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::SelectionConfig;
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the `env_logger` filter.
pub const LOG_ENV: &str = "STEPWISE_LOG";

/// Entry point for the `stepwise` binary.
pub fn run() -> Result<(), AppError> {
    // A project-local `.env` may set STEPWISE_LOG.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let quiet = matches!(&cli.command, Command::Select(args) if args.quiet);
    init_logging(quiet);

    match cli.command {
        Command::Select(args) => handle_select(args),
        Command::Sample(args) => handle_sample(args),
        Command::Report(args) => handle_report(args),
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "warn,stepwise=info" };
    // A second init (tests, embedding) is harmless.
    let _ = env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or(LOG_ENV, default_filter))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_select(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &config.response, &run.selection, &config.selection)
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        rows: args.rows,
        seed: args.seed,
        family: args.family,
        signal: args.signal,
        ..SampleConfig::default()
    };
    let data = generate_sample(&config)?;
    crate::io::export::write_dataset_csv(&args.out, &data)?;
    println!(
        "Wrote {} rows ({}) to '{}'",
        data.n_rows(),
        data.names().join(","),
        args.out.display()
    );
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let file = crate::io::export::read_selection_json(&args.json)?;
    println!("{}", crate::report::format_saved_run(&file));
    Ok(())
}

pub fn run_config_from_args(args: &SelectArgs) -> pipeline::RunConfig {
    pipeline::RunConfig {
        data_path: args.data.clone(),
        response: args.response.trim().to_string(),
        predictors: args.predictors.clone(),
        selection: SelectionConfig {
            family: args.family,
            direction: args.direction,
            criterion: args.criterion,
            entry_threshold: args.entry_threshold,
            exit_threshold: args.exit_threshold,
            categorical: args.categorical,
        },
        export_trace: args.export_trace.clone(),
        export_json: args.export_json.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Criterion, Family};

    #[test]
    fn args_map_onto_run_config() {
        let cli = Cli::try_parse_from([
            "stepwise",
            "select",
            "-d",
            "in.csv",
            "-y",
            " churn ",
            "--family",
            "logistic",
            "--criterion",
            "bic",
            "--entry-threshold",
            "0.05",
        ])
        .unwrap();
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        let config = run_config_from_args(&args);

        assert_eq!(config.response, "churn");
        assert!(config.predictors.is_none());
        assert_eq!(config.selection.family, Family::Logistic);
        assert_eq!(config.selection.criterion, Criterion::Bic);
        assert_eq!(config.selection.entry_threshold, Some(0.05));
        assert!(config.export_json.is_none());
    }
}
