//! Ordinary least squares.
//!
//! We solve `minimize Σ (y_i - x_i^T β)^2` through an SVD of the design matrix:
//!
//! - the singular values give the numerical rank, so perfectly collinear
//!   designs are reported as `FitError::Singular` instead of being silently
//!   pseudo-inverted
//! - the same decomposition yields `(XᵀX)⁻¹ = V Σ⁻² Vᵀ` for standard errors

use nalgebra::{DMatrix, DVector, Dyn, SVD};

use crate::error::FitError;

/// Raw OLS output; criteria are derived from it in `models::fit`.
#[derive(Debug, Clone)]
pub struct OlsEstimate {
    pub beta: DVector<f64>,
    /// Unscaled covariance `(XᵀX)⁻¹`.
    pub xtx_inv: DMatrix<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    /// Total sum of squares around the mean of `y`.
    pub centered_tss: f64,
    pub n: usize,
    pub p: usize,
}

impl OlsEstimate {
    /// Residual variance estimate `ssr / (n - p)`.
    pub fn sigma2(&self) -> f64 {
        self.ssr / (self.n - self.p) as f64
    }

    /// Gaussian log-likelihood at the MLE of the variance.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.n as f64;
        let ssr_per = (self.ssr / n).max(f64::MIN_POSITIVE);
        -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + ssr_per.ln() + 1.0)
    }

    pub fn r_squared(&self) -> f64 {
        if self.centered_tss > 0.0 {
            1.0 - self.ssr / self.centered_tss
        } else {
            f64::NAN
        }
    }

    pub fn adj_r_squared(&self) -> f64 {
        let n = self.n as f64;
        let p = self.p as f64;
        1.0 - (n - 1.0) / (n - p) * (1.0 - self.r_squared())
    }
}

/// Singular values below `RANK_RTOL · σ_max` count as zero.
const RANK_RTOL: f64 = 1e-10;

fn rank_tolerance(svd: &SVD<f64, Dyn, Dyn>) -> f64 {
    let max_sv = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    max_sv * RANK_RTOL
}

/// Numerical column rank of `x`.
pub fn numerical_rank(x: &DMatrix<f64>) -> usize {
    let svd = x.clone().svd(false, false);
    let tol = rank_tolerance(&svd);
    svd.singular_values.iter().filter(|&&s| s > tol).count()
}

/// Fit `y ~ x` by least squares. `x` must already contain the intercept column.
pub fn ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsEstimate, FitError> {
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

    let svd = x.clone().svd(true, true);
    let tol = rank_tolerance(&svd);
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    if rank < p {
        return Err(FitError::Singular { rank, cols: p });
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|_| FitError::NonFinite("least squares solve"))?;
    if beta.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("coefficients"));
    }

    let v_t = svd
        .v_t
        .as_ref()
        .ok_or(FitError::NonFinite("right singular vectors"))?;
    let mut scaled = v_t.clone();
    for (i, s) in svd.singular_values.iter().enumerate() {
        let inv = 1.0 / (s * s);
        for j in 0..scaled.ncols() {
            scaled[(i, j)] *= inv;
        }
    }
    let xtx_inv = v_t.transpose() * scaled;

    let residuals = y - x * &beta;
    let ssr = residuals.norm_squared();
    let mean = y.mean();
    let centered_tss = y.iter().map(|v| (v - mean).powi(2)).sum();

    Ok(OlsEstimate {
        beta,
        xtx_inv,
        ssr,
        centered_tss,
        n,
        p,
    })
}
