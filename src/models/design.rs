//! Design matrix construction.
//!
//! Every fitted model has the constant term first, followed by the selected
//! encoded predictors in the order given.

use nalgebra::DMatrix;

use crate::data::EncodedPredictors;

/// Name of the constant term in fitted models.
pub const INTERCEPT: &str = "intercept";

/// Build `[1, x_{s0}, x_{s1}, ...]` for the selected predictor indices.
///
/// # Panics
/// Panics if an index in `selected` is out of range for `encoded`.
pub fn design_matrix(encoded: &EncodedPredictors, selected: &[usize], n_rows: usize) -> DMatrix<f64> {
    let p = selected.len() + 1;
    DMatrix::from_fn(n_rows, p, |i, j| {
        if j == 0 {
            1.0
        } else {
            encoded.columns[selected[j - 1]][i]
        }
    })
}

/// Term names matching `design_matrix` columns.
pub fn term_names(encoded: &EncodedPredictors, selected: &[usize]) -> Vec<String> {
    std::iter::once(INTERCEPT.to_string())
        .chain(selected.iter().map(|&idx| encoded.names[idx].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intercept_comes_first() {
        let encoded = EncodedPredictors {
            names: vec!["a".into(), "b".into()],
            columns: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        };
        let x = design_matrix(&encoded, &[1], 3);
        assert_eq!(x.shape(), (3, 2));
        assert_eq!(x[(0, 0)], 1.0);
        assert_eq!(x[(2, 1)], 6.0);
        assert_eq!(term_names(&encoded, &[1]), vec!["intercept", "b"]);
        assert_eq!(design_matrix(&encoded, &[], 3).shape(), (3, 1));
    }
}
