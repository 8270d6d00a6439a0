//! Stepwise selection (forward / backward) driven by AIC, BIC, R² or adjusted R².
//!
//! Each step fits every trial set that differs from the current set by one
//! encoded predictor and scores it with the criterion:
//!
//! 1. Trials whose fit fails are recorded as excluded and skipped
//! 2. Trials failing the optional p-value entry/exit threshold are skipped
//! 3. The best remaining score wins; ties keep the earliest predictor
//! 4. The winner is committed only if it strictly improves the current score
//!
//! The intercept is part of every model and is never a candidate. A run
//! commits at most one change per encoded predictor, so it terminates after
//! at most `len(predictors)` steps.

use std::collections::HashSet;

use crate::data::{Dataset, encode_predictors};
use crate::domain::{
    Action, Direction, ExcludedTrial, Family, IterationRecord, ModelFit, Selection, SelectionConfig,
};
use crate::error::AppError;
use crate::fit::trial::{TrialContext, TrialOutcome, members, toggled};

/// Run stepwise selection of `predictors` against `response`.
///
/// Configuration problems are reported before any model is fitted. Individual
/// trial failures never abort the run.
pub fn select(
    data: &Dataset,
    response: &str,
    predictors: &[String],
    config: &SelectionConfig,
) -> Result<Selection, AppError> {
    let y = validate(data, response, predictors, config)?;

    if predictors.is_empty() {
        log::info!("No predictors supplied; nothing to select.");
        return Ok(Selection::empty());
    }

    let encoded = encode_predictors(data, predictors, config.categorical)?;
    if encoded.is_empty() {
        log::info!("No numeric predictors remain after categorical processing.");
        return Ok(Selection::empty());
    }

    let ctx = TrialContext::new(&encoded, y, config.family, config.criterion);
    let polarity = config.criterion.polarity();
    let forward = config.direction == Direction::Forward;
    let label = config.criterion.label();

    let mut in_set = vec![!forward; encoded.len()];
    let mut excluded = Vec::new();
    let mut trace = Vec::new();

    let (mut current_fit, initial_score) = match ctx.evaluate(&members(&in_set)) {
        TrialOutcome::Scored { score, fit } => (Some(fit), Some(score)),
        TrialOutcome::Failed(err) => {
            log::warn!("Starting model could not be fitted ({err}); any fitted trial will improve on it.");
            (None, None)
        }
    };
    let mut current_score = initial_score.unwrap_or_else(|| polarity.worst());

    for step in 1..=encoded.len() {
        let candidates: Vec<usize> = (0..encoded.len()).filter(|&i| in_set[i] != forward).collect();
        if candidates.is_empty() {
            log::info!("Break : no candidates left");
            break;
        }

        let mut best: Option<(usize, f64, ModelFit)> = None;
        for idx in candidates {
            let name = &encoded.names[idx];

            if !forward && !exit_allowed(config.exit_threshold, current_fit.as_ref(), name) {
                continue;
            }

            let (score, fit) = match ctx.evaluate(&toggled(&in_set, idx)) {
                TrialOutcome::Scored { score, fit } => (score, fit),
                TrialOutcome::Failed(err) => {
                    log::debug!("Step {step}: trial `{name}` excluded: {err}");
                    excluded.push(ExcludedTrial {
                        step,
                        variable: name.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if forward && !entry_allowed(config.entry_threshold, &fit, name) {
                continue;
            }

            if best.as_ref().is_none_or(|(_, best_score, _)| polarity.improves(score, *best_score)) {
                best = Some((idx, score, fit));
            }
        }

        let Some((idx, score, fit)) = best else {
            log::info!("Break : no eligible trial");
            break;
        };
        if !polarity.improves(score, current_score) {
            log::info!("Break : criterion ({label} {score:.4} does not improve on {current_score:.4})");
            break;
        }

        let action = if forward { Action::Add } else { Action::Remove };
        let variable = encoded.names[idx].clone();
        log::info!("{} : {variable}\t{label} : {score:.4}", action.verb());

        in_set[idx] = forward;
        trace.push(IterationRecord {
            step,
            action,
            variable,
            score,
        });
        current_score = score;
        current_fit = Some(fit);
    }

    let predictors: Vec<String> = members(&in_set)
        .into_iter()
        .map(|idx| encoded.names[idx].clone())
        .collect();
    log::info!("Final variables: {predictors:?}");

    Ok(Selection {
        predictors,
        trace,
        excluded,
        initial_score,
        final_model: current_fit,
    })
}

/// Forward: the added variable must be significant at `threshold`.
fn entry_allowed(threshold: Option<f64>, trial: &ModelFit, name: &str) -> bool {
    match threshold {
        None => true,
        Some(threshold) => trial.p_value(name).is_some_and(|p| p <= threshold),
    }
}

/// Backward: the removed variable must be insignificant at `threshold` in the current model.
fn exit_allowed(threshold: Option<f64>, current: Option<&ModelFit>, name: &str) -> bool {
    match (threshold, current) {
        (Some(threshold), Some(current)) => current.p_value(name).is_some_and(|p| p > threshold),
        _ => true,
    }
}

/// Check everything that can be checked without fitting; returns the response values.
fn validate(
    data: &Dataset,
    response: &str,
    predictors: &[String],
    config: &SelectionConfig,
) -> Result<Vec<f64>, AppError> {
    if !config.criterion.supports(config.family) {
        return Err(AppError::config(format!(
            "Criterion {} is undefined for the {:?} family; use AIC or BIC.",
            config.criterion.label(),
            config.family
        )));
    }
    for (flag, value) in [
        ("entry", config.entry_threshold),
        ("exit", config.exit_threshold),
    ] {
        if let Some(v) = value {
            if !(v > 0.0 && v <= 1.0) {
                return Err(AppError::config(format!(
                    "The {flag} threshold must be in (0, 1], got {v}."
                )));
            }
        }
    }
    match config.direction {
        Direction::Forward if config.exit_threshold.is_some() => {
            log::warn!("Exit threshold is ignored in forward selection.");
        }
        Direction::Backward if config.entry_threshold.is_some() => {
            log::warn!("Entry threshold is ignored in backward selection.");
        }
        _ => {}
    }

    let column = data
        .column(response)
        .ok_or_else(|| AppError::config(format!("Unknown response column `{response}`.")))?;
    let y = column
        .as_numeric()
        .ok_or_else(|| AppError::config(format!("Response column `{response}` must be numeric.")))?;

    let mut seen = HashSet::new();
    for name in predictors {
        if name == response {
            return Err(AppError::config(format!(
                "Response `{response}` cannot also be a predictor."
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(AppError::config(format!("Predictor `{name}` is listed twice.")));
        }
        let column = data
            .column(name)
            .ok_or_else(|| AppError::config(format!("Unknown predictor column `{name}`.")))?;
        let missing = column.missing_count();
        if missing > 0 {
            return Err(AppError::config(format!(
                "Predictor `{name}` has {missing} missing value(s); clean the data first."
            )));
        }
    }

    if data.n_rows() == 0 {
        return Err(AppError::data("The dataset has no rows."));
    }
    let missing = column.missing_count();
    if missing > 0 {
        return Err(AppError::config(format!(
            "Response `{response}` has {missing} missing value(s); clean the data first."
        )));
    }

    match config.family {
        Family::Logistic => {
            if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
                return Err(AppError::config(format!(
                    "Logistic response `{response}` must be 0/1, found {bad}."
                )));
            }
            let ones = y.iter().filter(|&&v| v == 1.0).count();
            if ones == 0 || ones == y.len() {
                return Err(AppError::data(format!(
                    "Logistic response `{response}` has a single class."
                )));
            }
        }
        Family::Linear => {
            let first = y[0];
            if y.iter().all(|&v| v == first) {
                return Err(AppError::data(format!("Response `{response}` has zero variance.")));
            }
        }
    }

    Ok(y.to_vec())
}
