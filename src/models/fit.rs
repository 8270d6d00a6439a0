//! Family dispatch: turn a design matrix into a scored `ModelFit`.
//!
//! This is the only model-fitting surface the selector uses. Everything it
//! compares (AIC, BIC, R², adjusted R²) and the p-values used for entry/exit
//! thresholds come out of here.

use nalgebra::{DMatrix, DVector};

use crate::domain::{Family, ModelFit};
use crate::error::FitError;
use crate::math::{
    LogitOptions, logit, ols, pvalue_t, pvalue_z, standard_errors, test_statistics,
};

/// Information criteria for `k` parameters and log-likelihood `llf`.
fn information_criteria(llf: f64, k: usize, n: usize) -> (f64, f64) {
    let k = k as f64;
    let aic = -2.0 * llf + 2.0 * k;
    let bic = -2.0 * llf + k * (n as f64).ln();
    (aic, bic)
}

/// OLS fit with Student-t p-values and R² / adjusted R².
pub fn fit_linear(x: &DMatrix<f64>, y: &DVector<f64>, terms: Vec<String>) -> Result<ModelFit, FitError> {
    let est = ols(x, y)?;
    let cov = &est.xtx_inv * est.sigma2();
    let coefficients: Vec<f64> = est.beta.iter().copied().collect();
    let std_errors = standard_errors(&cov);
    let df = (est.n - est.p) as f64;
    let p_values = test_statistics(&coefficients, &std_errors)
        .into_iter()
        .map(|t| pvalue_t(t, df))
        .collect();

    let llf = est.log_likelihood();
    if !llf.is_finite() {
        return Err(FitError::NonFinite("log-likelihood"));
    }
    let (aic, bic) = information_criteria(llf, est.p, est.n);

    Ok(ModelFit {
        family: Family::Linear,
        terms,
        coefficients,
        std_errors,
        p_values,
        n_obs: est.n,
        log_likelihood: llf,
        aic,
        bic,
        r_squared: Some(est.r_squared()),
        adj_r_squared: Some(est.adj_r_squared()),
        iterations: None,
    })
}

/// Logit fit with normal-theory p-values. R² fields are `None`.
pub fn fit_logistic(x: &DMatrix<f64>, y: &DVector<f64>, terms: Vec<String>) -> Result<ModelFit, FitError> {
    let est = logit(x, y, &LogitOptions::default())?;
    let coefficients: Vec<f64> = est.beta.iter().copied().collect();
    let std_errors = standard_errors(&est.covariance);
    let p_values = test_statistics(&coefficients, &std_errors)
        .into_iter()
        .map(pvalue_z)
        .collect();

    if !est.log_likelihood.is_finite() {
        return Err(FitError::NonFinite("log-likelihood"));
    }
    let (aic, bic) = information_criteria(est.log_likelihood, est.p, est.n);

    Ok(ModelFit {
        family: Family::Logistic,
        terms,
        coefficients,
        std_errors,
        p_values,
        n_obs: est.n,
        log_likelihood: est.log_likelihood,
        aic,
        bic,
        r_squared: None,
        adj_r_squared: None,
        iterations: Some(est.iterations),
    })
}

/// Fit `family` on `x` (intercept included) against `y`.
pub fn fit_model(
    family: Family,
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    terms: Vec<String>,
) -> Result<ModelFit, FitError> {
    match family {
        Family::Linear => fit_linear(x, y, terms),
        Family::Logistic => fit_logistic(x, y, terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_data() -> (DMatrix<f64>, DVector<f64>) {
        let x = DMatrix::from_row_slice(
            5,
            2,
            &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0, 5.0],
        );
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 5.0, 4.0]);
        (x, y)
    }

    #[test]
    fn linear_criteria_match_closed_form() {
        let (x, y) = line_data();
        let fit = fit_linear(&x, &y, vec!["intercept".into(), "x".into()]).unwrap();

        let llf = -2.5 * ((2.0 * std::f64::consts::PI).ln() + (3.6_f64 / 5.0).ln() + 1.0);
        assert!((fit.aic - (-2.0 * llf + 4.0)).abs() < 1e-10);
        assert!((fit.bic - (-2.0 * llf + 2.0 * 5.0_f64.ln())).abs() < 1e-10);
        assert!((fit.r_squared.unwrap() - 0.64).abs() < 1e-10);

        // se(slope) = sqrt(σ² / Sxx) = sqrt((3.6 / 3) / 10)
        let se = (1.2_f64 / 10.0).sqrt();
        assert!((fit.std_errors[1] - se).abs() < 1e-10);
        let p = pvalue_t(0.8 / se, 3.0);
        assert!((fit.p_value("x").unwrap() - p).abs() < 1e-10);
        assert_eq!(fit.n_params(), 2);
    }

    #[test]
    fn logistic_has_no_r_squared() {
        let x = DMatrix::from_row_slice(
            6,
            2,
            &[1.0, -1.0, 1.0, 0.5, 1.0, -0.2, 1.0, 1.5, 1.0, 0.1, 1.0, -1.2],
        );
        let y = DVector::from_row_slice(&[0.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
        let fit = fit_model(Family::Logistic, &x, &y, vec!["intercept".into(), "x".into()]).unwrap();
        assert!(fit.r_squared.is_none());
        assert!(fit.adj_r_squared.is_none());
        assert!((fit.aic - (-2.0 * fit.log_likelihood + 4.0)).abs() < 1e-12);
        assert!(fit.iterations.is_some());
    }
}
