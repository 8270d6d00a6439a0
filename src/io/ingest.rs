//! CSV ingest and type inference.
//!
//! This module turns a delimited text file with a header row into a
//! `Dataset` that is safe to hand to the selector.
//!
//! Design goals:
//! - **Header hygiene** (trim + BOM strip; names are otherwise kept verbatim)
//! - **Row-level validation** (skip ragged rows, but report what happened)
//! - **Column typing by content**: numeric when every present cell parses
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::data::{Column, Dataset};
use crate::error::AppError;

/// Cell values that count as missing in addition to the empty string.
const MISSING_TOKENS: [&str; 4] = ["na", "n/a", "nan", "null"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the typed dataset plus row accounting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        self.dataset.names()
    }
}

/// Load a CSV file into a `Dataset`.
pub fn load_dataset(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset(file)
}

/// Same as `load_dataset`, from any reader.
pub fn read_dataset<R: std::io::Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    if names.is_empty() || names.iter().all(String::is_empty) {
        return Err(AppError::config("CSV has no header row."));
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        if is_blank(&record) {
            rows_read -= 1;
            continue;
        }
        if record.len() != names.len() {
            row_errors.push(RowError {
                line,
                message: format!("Expected {} fields, found {}.", names.len(), record.len()),
            });
            continue;
        }
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let rows_used = cells.first().map_or(0, Vec::len);
    if rows_used == 0 {
        return Err(AppError::data("No usable rows in the CSV."));
    }

    let mut dataset = Dataset::new();
    for (name, raw) in names.into_iter().zip(cells) {
        let column = infer_column(raw);
        log::debug!(
            "Column `{name}`: {} ({} missing)",
            if column.is_categorical() { "categorical" } else { "numeric" },
            column.missing_count()
        );
        dataset.push_column(name, column)?;
    }

    if !row_errors.is_empty() {
        log::warn!("Skipped {} malformed row(s) while reading the CSV.", row_errors.len());
    }

    Ok(IngestedData {
        dataset,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the response column is not found.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

/// Numeric if every present cell parses as `f64`; otherwise categorical.
fn infer_column(raw: Vec<String>) -> Column {
    let mut values = Vec::with_capacity(raw.len());
    for cell in &raw {
        if is_missing(cell) {
            values.push(f64::NAN);
            continue;
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                let levels = raw
                    .into_iter()
                    .map(|c| if is_missing(&c) { String::new() } else { c })
                    .collect();
                return Column::Categorical(levels);
            }
        }
    }
    Column::Numeric(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_typed_by_content() {
        let csv = "\u{feff}y, x ,group\n1.5,2,a\n2.5,,b\n3.0,4,a\n";
        let ingested = read_dataset(csv.as_bytes()).unwrap();
        let data = &ingested.dataset;

        assert_eq!(ingested.column_names(), ["y", "x", "group"]);
        assert_eq!(data.column("y").unwrap().as_numeric().unwrap(), [1.5, 2.5, 3.0]);
        let x = data.column("x").unwrap();
        assert_eq!(x.missing_count(), 1);
        assert!(!x.is_categorical());
        assert!(data.column("group").unwrap().is_categorical());
        assert_eq!(ingested.rows_used, 3);
    }

    #[test]
    fn ragged_rows_are_reported_and_skipped() {
        let csv = "y,x\n1,2\n3\n4,5,6\n7,8\n";
        let ingested = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 4);
        assert_eq!(ingested.rows_used, 2);
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.row_errors[0].line, 3);
        assert_eq!(ingested.row_errors[1].line, 4);
    }

    #[test]
    fn mixed_cells_make_a_categorical_column() {
        let csv = "y,code\n1,10\n2,NA\n3,x7\n";
        let data = read_dataset(csv.as_bytes()).unwrap().dataset;
        match data.column("code").unwrap() {
            Column::Categorical(levels) => assert_eq!(levels, &["10", "", "x7"]),
            other => panic!("expected categorical, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_duplicate_inputs_fail() {
        let err = read_dataset("y,x\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert!(read_dataset("y,y\n1,2\n".as_bytes()).is_err());
    }

    #[test]
    fn load_dataset_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("stepwise-ingest-{}.csv", std::process::id()));
        std::fs::write(&path, "y,a\n1,0\n0,1\n").unwrap();
        let ingested = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ingested.dataset.n_rows(), 2);

        assert!(load_dataset(Path::new("/definitely/not/here.csv")).is_err());
    }
}
