//! Beta, Gamma, and Normal variate generation.
//!
//! Conventions used throughout the sampler: Gamma is rate-parameterized
//! (scale = 1/rate), Normal is precision-parameterized
//! (sd = sqrt(1/precision)), and Beta(a, b) is built exactly as
//! X/(X+Y) with X ~ Gamma(a, 1), Y ~ Gamma(b, 1).
//!
//! Non-positive shape/rate/precision arguments are domain errors, never
//! silently coerced.

use crate::error::SppmError;
use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal};

/// Draw from Gamma(shape, rate).
pub fn rgamma<R: Rng>(shape: f64, rate: f64, rng: &mut R) -> anyhow::Result<f64> {
    if !(shape > 0.0) || !(rate > 0.0) {
        return Err(SppmError::Domain(format!(
            "Gamma(shape={}, rate={}) requires strictly positive parameters",
            shape, rate
        ))
        .into());
    }
    let gamma = Gamma::new(shape, 1.0 / rate)?;
    Ok(gamma.sample(rng))
}

/// Draw from Beta(a, b) via the two-Gamma construction.
pub fn rbeta<R: Rng>(a: f64, b: f64, rng: &mut R) -> anyhow::Result<f64> {
    let x = rgamma(a, 1.0, rng)?;
    let y = rgamma(b, 1.0, rng)?;
    Ok(x / (x + y))
}

/// Draw from Normal(mean, precision).
pub fn rnormal<R: Rng>(mean: f64, precision: f64, rng: &mut R) -> anyhow::Result<f64> {
    if !(precision > 0.0) {
        return Err(SppmError::Domain(format!(
            "Normal(mean={}, precision={}) requires strictly positive precision",
            mean, precision
        ))
        .into());
    }
    let normal = Normal::new(mean, (1.0 / precision).sqrt())?;
    Ok(normal.sample(rng))
}
