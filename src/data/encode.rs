//! Categorical predictor expansion.
//!
//! Numeric predictors pass through unchanged. A categorical predictor `col` with
//! levels `{x, y, z}` becomes indicator columns `col_x`, `col_y`, `col_z`
//! (levels sorted lexicographically). In `DummyDropFirst` mode the first level
//! is the baseline and gets no column.

use std::collections::{BTreeSet, HashSet};

use crate::data::frame::{Column, Dataset};
use crate::domain::CategoricalMode;
use crate::error::AppError;

/// Numeric predictor columns ready for fitting.
///
/// `names[i]` and `columns[i]` describe the same encoded column; the order is
/// the tie-break order used by the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPredictors {
    pub names: Vec<String>,
    pub columns: Vec<Vec<f64>>,
}

impl EncodedPredictors {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push(&mut self, name: String, column: Vec<f64>) {
        self.names.push(name);
        self.columns.push(column);
    }
}

/// Expand `predictors` of `data` into numeric columns.
pub fn encode_predictors(
    data: &Dataset,
    predictors: &[String],
    mode: CategoricalMode,
) -> Result<EncodedPredictors, AppError> {
    let mut out = EncodedPredictors {
        names: Vec::new(),
        columns: Vec::new(),
    };
    let mut expanded = Vec::new();
    let mut dropped = Vec::new();

    for name in predictors {
        let column = data
            .column(name)
            .ok_or_else(|| AppError::config(format!("Unknown predictor column `{name}`.")))?;

        match column {
            Column::Numeric(values) => out.push(name.clone(), values.clone()),
            Column::Categorical(levels) => {
                if mode == CategoricalMode::Drop {
                    dropped.push(name.as_str());
                    continue;
                }
                let distinct: BTreeSet<&str> = levels.iter().map(String::as_str).collect();
                let skip = usize::from(mode == CategoricalMode::DummyDropFirst);
                for level in distinct.into_iter().skip(skip) {
                    let indicator = levels
                        .iter()
                        .map(|v| if v == level { 1.0 } else { 0.0 })
                        .collect();
                    out.push(format!("{name}_{level}"), indicator);
                }
                expanded.push(name.as_str());
            }
        }
    }

    let mut seen = HashSet::new();
    for name in &out.names {
        if !seen.insert(name.as_str()) {
            return Err(AppError::config(format!(
                "Encoded predictor name `{name}` is ambiguous (clashes with another column or level)."
            )));
        }
    }

    if !dropped.is_empty() {
        log::info!("Character variables (dropped): {dropped:?}");
    }
    if !expanded.is_empty() {
        match mode {
            CategoricalMode::DummyDropFirst => log::info!(
                "Character variables (dummies generated, first dummies dropped): {expanded:?}"
            ),
            _ => log::info!("Character variables (dummies generated): {expanded:?}"),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new()
            .with_column("num", Column::Numeric(vec![1.0, 2.0, 3.0, 4.0]))
            .unwrap()
            .with_column(
                "cat",
                Column::Categorical(vec!["z".into(), "x".into(), "y".into(), "x".into()]),
            )
            .unwrap()
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn three_levels_expand_to_two_indicators_with_sorted_baseline() {
        let data = sample();
        let enc = encode_predictors(&data, &names(&["cat"]), CategoricalMode::DummyDropFirst).unwrap();
        assert_eq!(enc.names, names(&["cat_y", "cat_z"]));
        assert_eq!(enc.columns[0], vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(enc.columns[1], vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn full_dummy_keeps_every_level() {
        let data = sample();
        let enc = encode_predictors(&data, &names(&["num", "cat"]), CategoricalMode::Dummy).unwrap();
        assert_eq!(enc.names, names(&["num", "cat_x", "cat_y", "cat_z"]));
    }

    #[test]
    fn drop_mode_removes_categoricals() {
        let data = sample();
        let enc = encode_predictors(&data, &names(&["cat", "num"]), CategoricalMode::Drop).unwrap();
        assert_eq!(enc.names, names(&["num"]));
    }

    #[test]
    fn unknown_predictor_is_an_error() {
        let data = sample();
        let err = encode_predictors(&data, &names(&["nope"]), CategoricalMode::Dummy).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }

    #[test]
    fn clashing_indicator_names_are_rejected() {
        let data = Dataset::new()
            .with_column("cat_y", Column::Numeric(vec![1.0, 2.0]))
            .unwrap()
            .with_column("cat", Column::Categorical(vec!["x".into(), "y".into()]))
            .unwrap();
        let result = encode_predictors(&data, &names(&["cat_y", "cat"]), CategoricalMode::DummyDropFirst);
        assert!(result.is_err());
    }
}
