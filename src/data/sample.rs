//! Synthetic dataset generation.
//!
//! The generated table has a known structure, which makes it useful both for
//! demos (`stepwise sample`) and for tests:
//!
//! - `a`: informative numeric predictor
//! - `b`, `c`: pure noise
//! - `region`: categorical with levels `north` / `south` / `west`
//!   (`north` is the baseline; `south` and `west` shift the response)
//! - `y`: the response, continuous for `Linear` and 0/1 for `Logistic`

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Normal};

use crate::data::frame::{Column, Dataset};
use crate::domain::Family;
use crate::error::AppError;

const REGIONS: [&str; 3] = ["north", "south", "west"];
const REGION_EFFECTS: [f64; 3] = [0.0, 1.5, -1.0];

/// Knobs for `generate_sample`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    pub family: Family,
    /// Slope of `y` on `a` (log-odds slope for `Logistic`).
    pub signal: f64,
    /// Standard deviation of the additive noise (`Linear` only).
    pub noise_sd: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            seed: 42,
            family: Family::Linear,
            signal: 2.0,
            noise_sd: 1.0,
        }
    }
}

/// Generate a reproducible dataset for `config`.
pub fn generate_sample(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.rows < 10 {
        return Err(AppError::config("Sample row count must be >= 10."));
    }
    if !(config.noise_sd.is_finite() && config.noise_sd > 0.0) {
        return Err(AppError::config("Sample noise standard deviation must be > 0."));
    }
    if !config.signal.is_finite() {
        return Err(AppError::config("Sample signal must be finite."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))?;
    let noise = Normal::new(0.0, config.noise_sd)
        .map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))?;

    let n = config.rows;
    let mut y = Vec::with_capacity(n);
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    let mut c = Vec::with_capacity(n);
    let mut region = Vec::with_capacity(n);

    for _ in 0..n {
        let xa: f64 = standard.sample(&mut rng);
        let xb: f64 = standard.sample(&mut rng);
        let xc: f64 = standard.sample(&mut rng);
        let r = rng.gen_range(0..REGIONS.len());

        let value = match config.family {
            Family::Linear => 1.0 + config.signal * xa + REGION_EFFECTS[r] + noise.sample(&mut rng),
            Family::Logistic => {
                let eta = -0.25 + config.signal * xa + 0.8 * REGION_EFFECTS[r];
                let p = 1.0 / (1.0 + (-eta).exp());
                let draw = Bernoulli::new(p)
                    .map_err(|e| AppError::numeric(format!("Outcome distribution error: {e}")))?;
                if draw.sample(&mut rng) { 1.0 } else { 0.0 }
            }
        };

        y.push(value);
        a.push(xa);
        b.push(xb);
        c.push(xc);
        region.push(REGIONS[r].to_string());
    }

    Dataset::new()
        .with_column("y", Column::Numeric(y))?
        .with_column("a", Column::Numeric(a))?
        .with_column("b", Column::Numeric(b))?
        .with_column("c", Column::Numeric(c))?
        .with_column("region", Column::Categorical(region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_CONFIG;

    #[test]
    fn sample_is_reproducible_for_a_seed() {
        let config = SampleConfig::default();
        let first = generate_sample(&config).unwrap();
        let second = generate_sample(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.n_rows(), 200);
        assert_eq!(first.names(), ["y", "a", "b", "c", "region"]);
    }

    #[test]
    fn logistic_sample_is_binary_with_both_outcomes() {
        let config = SampleConfig {
            family: Family::Logistic,
            signal: 1.5,
            ..SampleConfig::default()
        };
        let data = generate_sample(&config).unwrap();
        let y = data.column("y").unwrap().as_numeric().unwrap();
        assert!(y.iter().all(|&v| v == 0.0 || v == 1.0));
        let ones = y.iter().filter(|&&v| v == 1.0).count();
        assert!(ones > 20 && ones < 180, "ones={ones}");
    }

    #[test]
    fn rejects_tiny_samples() {
        let config = SampleConfig {
            rows: 3,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&config).is_err());
    }

    #[test]
    fn bad_settings_exit_with_the_config_code() {
        let configs = [
            SampleConfig { rows: 3, ..SampleConfig::default() },
            SampleConfig { noise_sd: 0.0, ..SampleConfig::default() },
            SampleConfig { signal: f64::NAN, ..SampleConfig::default() },
        ];
        for config in configs {
            let err = generate_sample(&config).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_CONFIG, "{config:?}");
        }
    }
}
