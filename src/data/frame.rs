//! Column-oriented in-memory dataset.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum Column {
    /// Numeric values; `NaN` marks a missing cell.
    Numeric(Vec<f64>),
    /// Text levels; an empty string marks a missing cell.
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Column::Categorical(_))
    }

    /// Count of missing cells (non-finite numbers or empty levels).
    pub fn missing_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|x| !x.is_finite()).count(),
            Column::Categorical(v) => v.iter().filter(|s| s.trim().is_empty()).count(),
        }
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }
}

/// A table of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; names must be unique and lengths must agree.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), AppError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::config("Column names must not be empty."));
        }
        if self.names.iter().any(|n| *n == name) {
            return Err(AppError::config(format!("Duplicate column `{name}`.")));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(AppError::config(format!(
                    "Column `{name}` has {} rows, expected {}.",
                    column.len(),
                    first.len()
                )));
            }
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style `push_column`.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, AppError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate `(name, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_column_rejects_duplicates_and_ragged_lengths() {
        let mut data = Dataset::new();
        data.push_column("a", Column::Numeric(vec![1.0, 2.0])).unwrap();
        assert!(data.push_column("a", Column::Numeric(vec![3.0, 4.0])).is_err());
        assert!(data.push_column("b", Column::Numeric(vec![1.0])).is_err());
        data.push_column("c", Column::Categorical(vec!["x".into(), "y".into()]))
            .unwrap();

        assert_eq!(data.n_rows(), 2);
        assert_eq!(data.n_cols(), 2);
        assert!(data.column("c").unwrap().is_categorical());
        assert!(data.column("zz").is_none());
    }

    #[test]
    fn missing_cells_are_counted() {
        let col = Column::Numeric(vec![1.0, f64::NAN, 3.0]);
        assert_eq!(col.missing_count(), 1);
        let col = Column::Categorical(vec!["a".into(), "".into(), " ".into()]);
        assert_eq!(col.missing_count(), 2);
    }
}
