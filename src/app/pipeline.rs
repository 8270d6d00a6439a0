//! Shared "select pipeline" logic.
//!
//! Keeping this in one place keeps the core workflow testable without the CLI:
//! CSV ingest -> predictor resolution -> stepwise selection -> exports
//!
//! The CLI can then focus on presentation.

use std::path::PathBuf;

use crate::domain::{Selection, SelectionConfig};
use crate::error::AppError;
use crate::fit::select;
use crate::io::export::{SelectionFile, write_selection_json, write_trace_csv};
use crate::io::ingest::{IngestedData, load_dataset};

/// Fully resolved settings for one `stepwise select` run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub response: String,
    /// `None` means every non-response column.
    pub predictors: Option<Vec<String>>,
    pub selection: SelectionConfig,
    pub export_trace: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// All computed outputs of a single `stepwise select` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    /// Predictors offered to the selector, before encoding.
    pub candidates: Vec<String>,
    pub selection: Selection,
}

/// Execute the full selection pipeline and write any requested exports.
pub fn run_select(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Read and type the CSV.
    let ingest = load_dataset(&config.data_path)?;
    log::info!(
        "Loaded {} rows x {} columns from '{}'",
        ingest.rows_used,
        ingest.dataset.n_cols(),
        config.data_path.display()
    );

    // 2) Resolve the candidate predictors.
    let candidates = resolve_predictors(&ingest, &config.response, config.predictors.as_deref())?;

    // 3) Run the search.
    let selection = select(&ingest.dataset, &config.response, &candidates, &config.selection)?;

    // 4) Optional exports.
    if let Some(path) = &config.export_trace {
        write_trace_csv(path, &selection.trace, config.selection.criterion)?;
        log::info!("Wrote trace to '{}'", path.display());
    }
    if let Some(path) = &config.export_json {
        let file = SelectionFile::new(&config.response, &candidates, &config.selection, &selection);
        write_selection_json(path, &file)?;
        log::info!("Wrote selection JSON to '{}'", path.display());
    }

    Ok(RunOutput {
        ingest,
        candidates,
        selection,
    })
}

/// Explicit predictors are trimmed; otherwise every column except the response is used.
fn resolve_predictors(
    ingest: &IngestedData,
    response: &str,
    explicit: Option<&[String]>,
) -> Result<Vec<String>, AppError> {
    match explicit {
        Some(list) => {
            let names: Vec<String> = list
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if names.is_empty() {
                return Err(AppError::config("`--predictors` was given but lists no columns."));
            }
            Ok(names)
        }
        None => {
            if !ingest.dataset.contains(response) {
                return Err(AppError::config(format!("Unknown response column `{response}`.")));
            }
            Ok(ingest
                .column_names()
                .iter()
                .filter(|name| name.as_str() != response)
                .cloned()
                .collect())
        }
    }
}
