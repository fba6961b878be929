//! Weight and on-rate distributions for instance generation.
//!
//! Samplers are plain `rand_distr::Distribution<f64>` values injected into
//! the builder per call. Anything in `rand_distr` works (`Uniform`,
//! `Normal`, ...); the two types here cover the distributions the original
//! experiments actually drew from.

use rand::Rng;
use rand_distr::Distribution;

use crate::{Error, Result};

/// Uniform draw over the 16 non-zero machine-range weights
/// `±0.125, ±0.25, ..., ±1.0` — the value grid the annealer hardware
/// accepts for couplers and biases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinGlassWeights;

impl SpinGlassWeights {
    const VALUES: [f64; 16] = [
        -1.0, -0.875, -0.75, -0.625, -0.5, -0.375, -0.25, -0.125,
        0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0,
    ];
}

impl Distribution<f64> for SpinGlassWeights {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        Self::VALUES[rng.gen_range(0..Self::VALUES.len())]
    }
}

/// Power-law distribution on `(0, 1]` with density `a·x^(a-1)`, drawn by
/// inverse transform `U^(1/a)`.
///
/// With a large exponent the mass piles up near 1, which is how on-rates
/// are drawn to skew generated instances toward dense coupling.
#[derive(Debug, Clone, Copy)]
pub struct PowerLaw {
    inv_exponent: f64,
}

impl PowerLaw {
    pub fn new(exponent: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(Error::Config(format!(
                "power-law exponent must be positive, got {exponent}"
            )));
        }
        Ok(Self {
            inv_exponent: exponent.recip(),
        })
    }
}

impl Distribution<f64> for PowerLaw {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(0.0..1.0_f64).powf(self.inv_exponent)
    }
}
