//! Binary logistic regression by Newton-Raphson (equivalently IRLS).
//!
//! Each iteration solves `(XᵀWX) δ = Xᵀ(y - μ)` with `W = diag(μ(1-μ))` and
//! updates `β ← β + δ`, starting from `β = 0`. We stop when `max |δ|` falls
//! below the tolerance.
//!
//! Failure modes are reported, not papered over:
//! - rank-deficient design -> `Singular`
//! - fitted probabilities reproduce `y` exactly -> `PerfectSeparation`
//! - iteration limit reached, or a Hessian that is no longer positive
//!   definite (quasi-separation drives weights to zero) -> `NotConverged`

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;
use crate::math::ols::numerical_rank;

/// Newton iteration controls.
#[derive(Debug, Clone, Copy)]
pub struct LogitOptions {
    pub max_iterations: usize,
    /// Convergence threshold on the largest coefficient update.
    pub tolerance: f64,
}

impl Default for LogitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 35,
            tolerance: 1e-8,
        }
    }
}

/// Raw logit output; criteria are derived from it in `models::fit`.
#[derive(Debug, Clone)]
pub struct LogitEstimate {
    pub beta: DVector<f64>,
    /// Inverse of the observed information `(XᵀWX)⁻¹` at the MLE.
    pub covariance: DMatrix<f64>,
    pub log_likelihood: f64,
    pub iterations: usize,
    pub n: usize,
    pub p: usize,
}

/// Largest `|y - μ|` below which the fit is treated as perfect prediction.
const SEPARATION_EPS: f64 = 1e-8;

fn sigmoid(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^x)` without overflow.
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Bernoulli log-likelihood for linear predictor `eta`.
fn log_likelihood(eta: &DVector<f64>, y: &DVector<f64>) -> f64 {
    eta.iter()
        .zip(y.iter())
        .map(|(&e, &yi)| yi * e - softplus(e))
        .sum()
}

/// `XᵀWX` for diagonal weights `w`.
fn information(x: &DMatrix<f64>, w: &[f64]) -> DMatrix<f64> {
    let mut xw = x.clone();
    for (i, &wi) in w.iter().enumerate() {
        for j in 0..xw.ncols() {
            xw[(i, j)] *= wi;
        }
    }
    x.transpose() * xw
}

fn is_separated(mu: &[f64], y: &DVector<f64>) -> bool {
    mu.iter()
        .zip(y.iter())
        .all(|(&m, &yi)| (yi - m).abs() < SEPARATION_EPS)
}

/// Fit `P(y = 1) = σ(xβ)`. `x` must already contain the intercept column and
/// `y` must be 0/1.
pub fn logit(x: &DMatrix<f64>, y: &DVector<f64>, opts: &LogitOptions) -> Result<LogitEstimate, FitError> {
    let (n, p) = x.shape();
    if y.len() != n {
        return Err(FitError::Underdetermined { rows: y.len(), cols: p });
    }
    if n <= p {
        return Err(FitError::Underdetermined { rows: n, cols: p });
    }
    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("design"));
    }
    let rank = numerical_rank(x);
    if rank < p {
        return Err(FitError::Singular { rank, cols: p });
    }

    let mut beta = DVector::zeros(p);
    let mut converged_at = None;

    for iteration in 1..=opts.max_iterations {
        let eta = x * &beta;
        let mu: Vec<f64> = eta.iter().map(|&e| sigmoid(e)).collect();
        if iteration > 1 && is_separated(&mu, y) {
            return Err(FitError::PerfectSeparation);
        }

        let w: Vec<f64> = mu.iter().map(|&m| m * (1.0 - m)).collect();
        let residual = DVector::from_iterator(n, y.iter().zip(mu.iter()).map(|(&yi, &m)| yi - m));
        let gradient = x.transpose() * residual;

        let Some(chol) = information(x, &w).cholesky() else {
            return Err(FitError::NotConverged { iterations: iteration });
        };
        let delta = chol.solve(&gradient);
        beta += &delta;

        if beta.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("coefficients"));
        }
        if delta.amax() < opts.tolerance {
            converged_at = Some(iteration);
            break;
        }
    }

    let Some(iterations) = converged_at else {
        return Err(FitError::NotConverged {
            iterations: opts.max_iterations,
        });
    };

    let eta = x * &beta;
    let mu: Vec<f64> = eta.iter().map(|&e| sigmoid(e)).collect();
    if is_separated(&mu, y) {
        return Err(FitError::PerfectSeparation);
    }
    let w: Vec<f64> = mu.iter().map(|&m| m * (1.0 - m)).collect();
    let chol = information(x, &w)
        .cholesky()
        .ok_or(FitError::NotConverged { iterations })?;

    Ok(LogitEstimate {
        covariance: chol.inverse(),
        log_likelihood: log_likelihood(&eta, y),
        beta,
        iterations,
        n,
        p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intercept_only_recovers_log_odds() {
        // 3 of 10 are ones -> β0 = ln(0.3 / 0.7).
        let x = DMatrix::from_element(10, 1, 1.0);
        let y = DVector::from_row_slice(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let est = logit(&x, &y, &LogitOptions::default()).unwrap();

        assert!((est.beta[0] - (0.3_f64 / 0.7).ln()).abs() < 1e-8);
        let expected_llf = 3.0 * 0.3_f64.ln() + 7.0 * 0.7_f64.ln();
        assert!((est.log_likelihood - expected_llf).abs() < 1e-8);
        // Var(β0) = 1 / (n p (1-p))
        assert!((est.covariance[(0, 0)] - 1.0 / (10.0 * 0.21)).abs() < 1e-8);
    }

    #[test]
    fn slope_sign_is_recovered_on_overlapping_classes() {
        let xs = [-3.0, -2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0, 3.0, 0.2];
        let ys = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        let mut x = DMatrix::from_element(xs.len(), 2, 1.0);
        for (i, &v) in xs.iter().enumerate() {
            x[(i, 1)] = v;
        }
        let y = DVector::from_row_slice(&ys);
        let est = logit(&x, &y, &LogitOptions::default()).unwrap();
        assert!(est.beta[1] > 0.0);
        assert!(est.iterations < 35);
        assert!(est.log_likelihood < 0.0);
    }

    #[test]
    fn separable_data_fails() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, -2.0, 1.0, -1.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[0.0, 0.0, 1.0, 1.0]);
        let err = logit(&x, &y, &LogitOptions::default()).unwrap_err();
        assert!(
            matches!(err, FitError::PerfectSeparation | FitError::NotConverged { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn collinear_design_is_singular() {
        let x = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0],
        );
        let y = DVector::from_row_slice(&[0.0, 1.0, 1.0, 0.0]);
        assert!(matches!(
            logit(&x, &y, &LogitOptions::default()),
            Err(FitError::Singular { .. })
        ));
    }

    #[test]
    fn softplus_is_stable_at_extremes() {
        assert!((softplus(800.0) - 800.0).abs() < 1e-9);
        assert!(softplus(-800.0) >= 0.0);
        assert!((softplus(0.0) - 2.0_f64.ln()).abs() < 1e-12);
    }
}
