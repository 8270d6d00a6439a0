//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the selection/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{Family, ModelFit, Selection, SelectionConfig};
use crate::io::export::SelectionFile;
use crate::io::ingest::IngestedData;

const NAME_WIDTH: usize = 24;

/// Format the full run summary (dataset + configuration + trace + final model).
pub fn format_run_summary(
    ingest: &IngestedData,
    response: &str,
    selection: &Selection,
    config: &SelectionConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== stepwise - Stepwise Regression Selection ===\n");
    out.push_str(&format!(
        "Rows: used={} read={} skipped={}\n",
        ingest.rows_used,
        ingest.rows_read,
        ingest.row_errors.len()
    ));
    for err in ingest.row_errors.iter().take(5) {
        out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", ingest.row_errors.len() - 5));
    }
    out.push_str(&format_selection(response, selection, config));
    out
}

/// Format a run read back from a selection JSON export.
pub fn format_saved_run(file: &SelectionFile) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== {} - saved selection ({}) ===\n",
        file.tool,
        file.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Candidates: {}\n", fmt_names(&file.candidates)));
    out.push_str(&format_selection(&file.response, &file.selection(), &file.config));
    out
}

fn format_selection(response: &str, selection: &Selection, config: &SelectionConfig) -> String {
    let mut out = format!("Response: {response}\n");
    out.push_str(&format_config(config));
    out.push('\n');

    out.push_str(&format_trace(selection, config));
    out.push('\n');

    if !selection.excluded.is_empty() {
        out.push_str(&format_excluded(selection));
        out.push('\n');
    }

    out.push_str(&format!("Final variables: {}\n", fmt_names(&selection.predictors)));
    match &selection.final_model {
        Some(fit) => {
            out.push('\n');
            out.push_str(&format_model(fit));
        }
        None => out.push_str("Final model: unavailable (fit failed)\n"),
    }
    out
}

fn format_config(config: &SelectionConfig) -> String {
    let mut out = format!(
        "Model: {} | direction={:?} | criterion={} | categorical={:?}\n",
        config.family.display_name(),
        config.direction,
        config.criterion,
        config.categorical
    );
    if let Some(p) = config.entry_threshold {
        out.push_str(&format!("Entry threshold: p <= {p}\n"));
    }
    if let Some(p) = config.exit_threshold {
        out.push_str(&format!("Exit threshold: p > {p}\n"));
    }
    out
}

/// Committed steps, one line each.
pub fn format_trace(selection: &Selection, config: &SelectionConfig) -> String {
    let label = config.criterion.label();
    let mut out = String::new();

    match selection.initial_score {
        Some(score) => out.push_str(&format!("Initial {label}: {score:.4}\n")),
        None => out.push_str(&format!("Initial {label}: n/a (starting model could not be fitted)\n")),
    }
    if selection.trace.is_empty() {
        out.push_str("No steps taken.\n");
        return out;
    }

    out.push_str(&format!("{:>4}  {:<10} {:<NAME_WIDTH$} {:>12}\n", "step", "action", "variable", label));
    out.push_str(&format!("{:->4}  {:-<10} {:-<NAME_WIDTH$} {:->12}\n", "", "", "", ""));
    for record in &selection.trace {
        out.push_str(&format!(
            "{:>4}  {:<10} {:<NAME_WIDTH$} {:>12.4}\n",
            record.step,
            record.action.verb(),
            truncate(&record.variable, NAME_WIDTH),
            record.score
        ));
    }
    out
}

fn format_excluded(selection: &Selection) -> String {
    let mut out = format!("Excluded trials ({}):\n", selection.excluded.len());
    for trial in &selection.excluded {
        out.push_str(&format!("  step {} `{}`: {}\n", trial.step, trial.variable, trial.reason));
    }
    out
}

/// Coefficient table plus goodness-of-fit lines for a fitted model.
pub fn format_model(fit: &ModelFit) -> String {
    let (stat, p_label) = match fit.family {
        Family::Linear => ("t", "P>|t|"),
        Family::Logistic => ("z", "P>|z|"),
    };

    let mut out = format!(
        "{} results (n={}, k={})\n",
        fit.family.display_name(),
        fit.n_obs,
        fit.n_params()
    );
    out.push_str(
        format!(
            "{:<NAME_WIDTH$} {:>12} {:>12} {:>9} {:>9}\n",
            "term", "coef", "std err", stat, p_label
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<NAME_WIDTH$} {:-<12} {:-<12} {:-<9} {:-<9}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for (idx, term) in fit.terms.iter().enumerate() {
        let coef = fit.coefficients[idx];
        let se = fit.std_errors[idx];
        out.push_str(&format!(
            "{:<NAME_WIDTH$} {:>12.4} {:>12.4} {:>9.3} {:>9.3}\n",
            truncate(term, NAME_WIDTH),
            coef,
            se,
            coef / se,
            fit.p_values[idx]
        ));
    }

    out.push_str(&format!(
        "\nLog-likelihood: {:.4} | AIC: {:.4} | BIC: {:.4}\n",
        fit.log_likelihood, fit.aic, fit.bic
    ));
    if let (Some(r2), Some(adj)) = (fit.r_squared, fit.adj_r_squared) {
        out.push_str(&format!("R-squared: {r2:.4} | Adj. R-squared: {adj:.4}\n"));
    }
    if let Some(iterations) = fit.iterations {
        out.push_str(&format!("Newton iterations: {iterations}\n"));
    }
    out
}

fn fmt_names(names: &[String]) -> String {
    if names.is_empty() {
        return "(none, intercept only)".to_string();
    }
    format!("[{}]", names.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
