//! Export selection results and datasets.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts:
//!
//! - trace CSV: one row per committed step
//! - selection JSON: configuration, trace, excluded trials and the final model
//! - dataset CSV: used by `stepwise sample`

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Column, Dataset};
use crate::domain::{Action, Criterion, ExcludedTrial, IterationRecord, ModelFit, Selection, SelectionConfig};
use crate::error::AppError;

/// Portable representation of one selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub response: String,
    pub config: SelectionConfig,
    /// Predictors offered to the selector, before encoding.
    pub candidates: Vec<String>,
    /// Final encoded predictors.
    pub predictors: Vec<String>,
    pub initial_score: Option<f64>,
    pub trace: Vec<IterationRecord>,
    pub excluded: Vec<ExcludedTrial>,
    pub final_model: Option<ModelFit>,
}

impl SelectionFile {
    pub fn new(response: &str, candidates: &[String], config: &SelectionConfig, selection: &Selection) -> Self {
        Self {
            tool: "stepwise".to_string(),
            generated_at: Utc::now(),
            response: response.to_string(),
            config: *config,
            candidates: candidates.to_vec(),
            predictors: selection.predictors.clone(),
            initial_score: selection.initial_score,
            trace: selection.trace.clone(),
            excluded: selection.excluded.clone(),
            final_model: selection.final_model.clone(),
        }
    }

    /// The selection result stored in this file.
    pub fn selection(&self) -> Selection {
        Selection {
            predictors: self.predictors.clone(),
            trace: self.trace.clone(),
            excluded: self.excluded.clone(),
            initial_score: self.initial_score,
            final_model: self.final_model.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TraceRow<'a> {
    step: usize,
    action: &'a str,
    variable: &'a str,
    score: f64,
    criterion: &'a str,
}

/// Write the step trace to a CSV file.
pub fn write_trace_csv(path: &Path, trace: &[IterationRecord], criterion: Criterion) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::config(format!("Failed to create trace CSV '{}': {e}", path.display())))?;

    for record in trace {
        let action = match record.action {
            Action::Add => "add",
            Action::Remove => "remove",
        };
        writer
            .serialize(TraceRow {
                step: record.step,
                action,
                variable: &record.variable,
                score: record.score,
                criterion: criterion.label(),
            })
            .map_err(|e| AppError::config(format!("Failed to write trace CSV row: {e}")))?;
    }

    // An empty trace still gets a header.
    if trace.is_empty() {
        writer
            .write_record(["step", "action", "variable", "score", "criterion"])
            .map_err(|e| AppError::config(format!("Failed to write trace CSV header: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush trace CSV: {e}")))
}

/// Write a selection JSON file.
pub fn write_selection_json(path: &Path, file: &SelectionFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create selection JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::config(format!("Failed to write selection JSON: {e}")))
}

/// Read a selection JSON file written by `write_selection_json`.
pub fn read_selection_json(path: &Path) -> Result<SelectionFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open selection JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::config(format!("Invalid selection JSON: {e}")))
}

/// Write a dataset as CSV (missing numeric cells become empty fields).
pub fn write_dataset_csv(path: &Path, data: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::config(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let write_err = |e: csv::Error| AppError::config(format!("Failed to write CSV '{}': {e}", path.display()));

    writer.write_record(data.names()).map_err(write_err)?;
    for row in 0..data.n_rows() {
        let record: Vec<String> = data
            .iter()
            .map(|(_, column)| match column {
                Column::Numeric(values) if values[row].is_finite() => values[row].to_string(),
                Column::Numeric(_) => String::new(),
                Column::Categorical(levels) => levels[row].clone(),
            })
            .collect();
        writer.write_record(&record).map_err(write_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush CSV '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::load_dataset;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("stepwise-{}-{name}", std::process::id()))
    }

    fn sample_trace() -> Vec<IterationRecord> {
        vec![
            IterationRecord {
                step: 1,
                action: Action::Add,
                variable: "a".to_string(),
                score: 30.8,
            },
            IterationRecord {
                step: 2,
                action: Action::Add,
                variable: "region_south".to_string(),
                score: 12.5,
            },
        ]
    }

    #[test]
    fn trace_csv_has_one_row_per_step() {
        let path = temp_path("trace.csv");
        write_trace_csv(&path, &sample_trace(), Criterion::Aic).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "step,action,variable,score,criterion");
        assert_eq!(lines[1], "1,add,a,30.8,AIC");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_trace_still_writes_header() {
        let path = temp_path("empty-trace.csv");
        write_trace_csv(&path, &[], Criterion::Bic).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text.trim_end(), "step,action,variable,score,criterion");
    }

    #[test]
    fn selection_json_reads_back() {
        let path = temp_path("selection.json");
        let selection = Selection {
            predictors: vec!["a".to_string(), "region_south".to_string()],
            trace: sample_trace(),
            excluded: vec![ExcludedTrial {
                step: 2,
                variable: "b".to_string(),
                reason: "singular design matrix (rank 2 < 3 columns)".to_string(),
            }],
            initial_score: Some(70.8),
            final_model: None,
        };
        let candidates = vec!["a".to_string(), "b".to_string(), "region".to_string()];
        let file = SelectionFile::new("y", &candidates, &SelectionConfig::default(), &selection);

        write_selection_json(&path, &file).unwrap();
        let back = read_selection_json(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.tool, "stepwise");
        assert_eq!(back.predictors, selection.predictors);
        assert_eq!(back.excluded, selection.excluded);
        assert_eq!(raw["config"]["criterion"], "aic");
        assert_eq!(raw["trace"][0]["action"], "add");
    }

    #[test]
    fn selection_json_with_undefined_p_values_reads_back() {
        let path = temp_path("selection-nan.json");
        let fit = ModelFit {
            family: crate::domain::Family::Linear,
            terms: vec!["intercept".to_string(), "a".to_string()],
            coefficients: vec![1.0, 2.0],
            std_errors: vec![0.0, 0.0],
            p_values: vec![f64::NAN, f64::NAN],
            n_obs: 4,
            log_likelihood: 80.0,
            aic: -156.0,
            bic: -157.2,
            r_squared: Some(1.0),
            adj_r_squared: Some(1.0),
            iterations: None,
        };
        let selection = Selection {
            final_model: Some(fit),
            ..Selection::empty()
        };
        let file = SelectionFile::new("y", &["a".to_string()], &SelectionConfig::default(), &selection);

        write_selection_json(&path, &file).unwrap();
        let back = read_selection_json(&path);
        std::fs::remove_file(&path).ok();

        let model = back.unwrap().final_model.unwrap();
        assert!(model.p_values.iter().all(|p| p.is_nan()));
        assert_eq!(model.coefficients, [1.0, 2.0]);
    }

    #[test]
    fn dataset_csv_reloads_with_same_types() {
        let path = temp_path("data.csv");
        let data = Dataset::new()
            .with_column("y", Column::Numeric(vec![1.0, 2.5, f64::NAN]))
            .unwrap()
            .with_column(
                "g",
                Column::Categorical(vec!["x".into(), "y, z".into(), "x".into()]),
            )
            .unwrap();
        write_dataset_csv(&path, &data).unwrap();
        let back = load_dataset(&path).unwrap().dataset;
        std::fs::remove_file(&path).ok();

        assert_eq!(back.names(), data.names());
        assert_eq!(back.column("y").unwrap().missing_count(), 1);
        assert_eq!(back.column("g"), data.column("g"));
    }
}
