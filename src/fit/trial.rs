//! Trial evaluation: fit one candidate predictor set and decide whether it
//! can compete in the current step.

use nalgebra::DVector;

use crate::data::EncodedPredictors;
use crate::domain::{Criterion, Family, ModelFit};
use crate::error::FitError;
use crate::models::{design_matrix, fit_model, term_names};

/// Encoded predictors plus response, shared by every trial of a run.
#[derive(Debug, Clone)]
pub struct TrialContext<'a> {
    pub encoded: &'a EncodedPredictors,
    pub response: DVector<f64>,
    pub family: Family,
    pub criterion: Criterion,
}

/// Result of evaluating one trial set.
#[derive(Debug, Clone)]
pub enum TrialOutcome {
    /// The fit succeeded and the criterion is defined.
    Scored { score: f64, fit: ModelFit },
    /// The fit failed; the trial is unavailable this step.
    Failed(FitError),
}

impl<'a> TrialContext<'a> {
    pub fn new(encoded: &'a EncodedPredictors, response: Vec<f64>, family: Family, criterion: Criterion) -> Self {
        Self {
            encoded,
            response: DVector::from_vec(response),
            family,
            criterion,
        }
    }

    /// Fit the model with the intercept plus `selected` encoded predictors.
    pub fn fit(&self, selected: &[usize]) -> Result<ModelFit, FitError> {
        let x = design_matrix(self.encoded, selected, self.response.len());
        fit_model(self.family, &x, &self.response, term_names(self.encoded, selected))
    }

    /// Fit and score `selected`.
    pub fn evaluate(&self, selected: &[usize]) -> TrialOutcome {
        match self.fit(selected) {
            Ok(fit) => match self.criterion.score(&fit) {
                Some(score) => TrialOutcome::Scored { score, fit },
                None => TrialOutcome::Failed(FitError::NonFinite("criterion")),
            },
            Err(err) => TrialOutcome::Failed(err),
        }
    }
}

/// Indices of `in_set` that are `true`, in encoded order.
pub fn members(in_set: &[bool]) -> Vec<usize> {
    in_set
        .iter()
        .enumerate()
        .filter_map(|(idx, &inside)| inside.then_some(idx))
        .collect()
}

/// `members(in_set)` with `idx` toggled.
pub fn toggled(in_set: &[bool], idx: usize) -> Vec<usize> {
    in_set
        .iter()
        .enumerate()
        .filter_map(|(i, &inside)| if i == idx { (!inside).then_some(i) } else { inside.then_some(i) })
        .collect()
}
