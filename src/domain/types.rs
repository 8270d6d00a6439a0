//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during selection
//! - exported to JSON/CSV
//! - parsed from CLI flags (clap `ValueEnum`) or plain string tokens (`FromStr`)

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Regression model family fitted for every trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Ordinary least squares.
    Linear,
    /// Binary logit (response must be 0/1).
    Logistic,
}

impl Family {
    pub fn display_name(self) -> &'static str {
        match self {
            Family::Linear => "OLS",
            Family::Logistic => "Logit",
        }
    }
}

impl FromStr for Family {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "ols" => Ok(Family::Linear),
            "logistic" | "logit" => Ok(Family::Logistic),
            other => Err(AppError::config(format!(
                "Unknown model family `{other}` (expected `linear` or `logistic`)."
            ))),
        }
    }
}

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Start from the intercept-only model and add one variable per step.
    Forward,
    /// Start from the full model and remove one variable per step.
    Backward,
}

impl FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            other => Err(AppError::config(format!(
                "Unknown direction `{other}` (expected `forward` or `backward`)."
            ))),
        }
    }
}

/// Whether a lower or a higher score is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Minimize,
    Maximize,
}

impl Polarity {
    /// `true` when `candidate` is strictly better than `current`.
    pub fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Polarity::Minimize => candidate < current,
            Polarity::Maximize => candidate > current,
        }
    }

    /// The score every real score improves on.
    pub fn worst(self) -> f64 {
        match self {
            Polarity::Minimize => f64::INFINITY,
            Polarity::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// Scalar criterion used to compare nested models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Aic,
    Bic,
    R2,
    #[value(name = "adjr2")]
    AdjR2,
}

impl Criterion {
    pub fn polarity(self) -> Polarity {
        match self {
            Criterion::Aic | Criterion::Bic => Polarity::Minimize,
            Criterion::R2 | Criterion::AdjR2 => Polarity::Maximize,
        }
    }

    /// R² and adjusted R² are only defined for the linear family.
    pub fn supports(self, family: Family) -> bool {
        match self {
            Criterion::Aic | Criterion::Bic => true,
            Criterion::R2 | Criterion::AdjR2 => family == Family::Linear,
        }
    }

    /// Extract this criterion from a fitted model.
    pub fn score(self, fit: &ModelFit) -> Option<f64> {
        let value = match self {
            Criterion::Aic => Some(fit.aic),
            Criterion::Bic => Some(fit.bic),
            Criterion::R2 => fit.r_squared,
            Criterion::AdjR2 => fit.adj_r_squared,
        };
        value.filter(|v| !v.is_nan())
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Aic => "AIC",
            Criterion::Bic => "BIC",
            Criterion::R2 => "R2",
            Criterion::AdjR2 => "AdjR2",
        }
    }
}

impl FromStr for Criterion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aic" => Ok(Criterion::Aic),
            "bic" => Ok(Criterion::Bic),
            "r2" | "rsquared" => Ok(Criterion::R2),
            "adjr2" | "adj_r2" | "rsquared_adj" => Ok(Criterion::AdjR2),
            other => Err(AppError::config(format!(
                "Unknown criterion `{other}` (expected `aic`, `bic`, `r2` or `adjr2`)."
            ))),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How categorical (non-numeric) predictors are turned into numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalMode {
    /// One indicator per level except the first (sorted) level, which is the baseline.
    #[default]
    DummyDropFirst,
    /// One indicator per level. Collinear with the intercept.
    Dummy,
    /// Remove categorical predictors entirely.
    Drop,
}

impl FromStr for CategoricalMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dummy_dropfirst" | "dummy-drop-first" | "dummy_drop_first" => {
                Ok(CategoricalMode::DummyDropFirst)
            }
            "dummy" => Ok(CategoricalMode::Dummy),
            "drop" => Ok(CategoricalMode::Drop),
            other => Err(AppError::config(format!(
                "Unknown categorical mode `{other}` (expected `dummy-drop-first`, `dummy` or `drop`)."
            ))),
        }
    }
}

/// Everything `select` needs besides the data, the response and the predictors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub family: Family,
    pub direction: Direction,
    pub criterion: Criterion,
    /// Forward only: maximum p-value for a variable to be allowed in.
    pub entry_threshold: Option<f64>,
    /// Backward only: a variable may leave only if its p-value exceeds this.
    pub exit_threshold: Option<f64>,
    pub categorical: CategoricalMode,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            family: Family::Linear,
            direction: Direction::Forward,
            criterion: Criterion::Aic,
            entry_threshold: None,
            exit_threshold: None,
            categorical: CategoricalMode::DummyDropFirst,
        }
    }
}

/// What a committed step did to the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Remove,
}

impl Action {
    /// Label used in logs and reports.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Add => "Entered",
            Action::Remove => "Eliminated",
        }
    }
}

/// One committed step of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based step index.
    pub step: usize,
    pub action: Action,
    pub variable: String,
    /// Criterion value of the model after the change.
    pub score: f64,
}

/// A trial that could not be scored because its fit failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTrial {
    pub step: usize,
    pub variable: String,
    pub reason: String,
}

/// A fitted regression model (intercept first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    pub family: Family,
    /// Term names, `"intercept"` first.
    pub terms: Vec<String>,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub coefficients: Vec<f64>,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub std_errors: Vec<f64>,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub p_values: Vec<f64>,
    pub n_obs: usize,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Linear family only.
    pub r_squared: Option<f64>,
    /// Linear family only.
    pub adj_r_squared: Option<f64>,
    /// Newton iterations used (logistic family only).
    pub iterations: Option<usize>,
}

impl ModelFit {
    /// Number of estimated parameters, intercept included.
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// p-value of a named term, if present.
    pub fn p_value(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| t == term)
            .and_then(|idx| self.p_values.get(idx).copied())
    }
}

/// JSON has no NaN; `serde_json` writes it as `null`, so `null` reads back as NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

/// Output of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Final predictors, in encoded predictor order.
    pub predictors: Vec<String>,
    /// Committed steps in encounter order.
    pub trace: Vec<IterationRecord>,
    /// Trials dropped because their fit failed.
    pub excluded: Vec<ExcludedTrial>,
    /// Score of the starting model (`None` if it could not be fitted).
    pub initial_score: Option<f64>,
    /// Refit of the final predictor set.
    pub final_model: Option<ModelFit>,
}

impl Selection {
    pub fn empty() -> Self {
        Self {
            predictors: Vec::new(),
            trace: Vec::new(),
            excluded: Vec::new(),
            initial_score: None,
            final_model: None,
        }
    }
}
