//! Coefficient inference: standard errors and two-sided p-values.

use nalgebra::DMatrix;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Square roots of the covariance diagonal (`NaN` for negative entries).
pub fn standard_errors(covariance: &DMatrix<f64>) -> Vec<f64> {
    covariance
        .diagonal()
        .iter()
        .map(|&v| if v >= 0.0 { v.sqrt() } else { f64::NAN })
        .collect()
}

/// Two-sided p-value of a z-statistic under the standard normal.
pub fn pvalue_z(z: f64) -> f64 {
    if !z.is_finite() {
        return f64::NAN;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => 2.0 * normal.sf(z.abs()),
        Err(_) => f64::NAN,
    }
}

/// Two-sided p-value of a t-statistic with `df` degrees of freedom.
pub fn pvalue_t(t: f64, df: f64) -> f64 {
    if !t.is_finite() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * dist.sf(t.abs()),
        Err(_) => f64::NAN,
    }
}

/// Element-wise `coef / se`.
pub fn test_statistics(coefficients: &[f64], std_errors: &[f64]) -> Vec<f64> {
    coefficients
        .iter()
        .zip(std_errors)
        .map(|(&b, &se)| if se > 0.0 { b / se } else { f64::NAN })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_pvalues_match_known_quantiles() {
        assert!((pvalue_z(1.959_963_984_540_054) - 0.05).abs() < 1e-9);
        assert!((pvalue_z(0.0) - 1.0).abs() < 1e-12);
        assert!(pvalue_z(f64::NAN).is_nan());
    }

    #[test]
    fn t_pvalues_are_wider_than_normal() {
        // t_{0.975, 10} = 2.228138851986
        assert!((pvalue_t(2.228_138_851_986, 10.0) - 0.05).abs() < 1e-6);
        assert!(pvalue_t(2.0, 5.0) > pvalue_z(2.0));
        assert!(pvalue_t(1.0, 0.0).is_nan());
    }

    #[test]
    fn standard_errors_take_the_diagonal() {
        let cov = DMatrix::from_row_slice(2, 2, &[4.0, 0.5, 0.5, 9.0]);
        assert_eq!(standard_errors(&cov), vec![2.0, 3.0]);
        assert_eq!(test_statistics(&[4.0, 3.0], &[2.0, 0.0])[0], 2.0);
        assert!(test_statistics(&[4.0, 3.0], &[2.0, 0.0])[1].is_nan());
    }
}
