//! Seeded synthetic training samples.
//!
//! Stands in for a historical archive: physically plausible, correlated
//! readings drawn from a seeded generator, so the same seed and size always
//! produce the same training set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EngineResult;
use crate::models::{EnvironmentalSample, SamplePolicy};

// ---

const MEAN_RAINFALL_MM: f64 = 15.0;
const MEAN_TEMPERATURE_C: f64 = 26.0;
const SD_TEMPERATURE_C: f64 = 7.0;

/// Generate `count` samples from `seed`.
pub fn generate(count: usize, seed: u64) -> EngineResult<Vec<EnvironmentalSample>> {
    // ---
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(count);

    for _ in 0..count {
        // Exponential rainfall with a long wet tail
        let u: f64 = rng.random();
        let rainfall = -MEAN_RAINFALL_MM * (1.0 - u).ln();

        let soil = rng.random_range(5.0..95.0) * 0.7 + rainfall * 0.6;

        // Box-Muller
        let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = rng.random();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        let temperature = MEAN_TEMPERATURE_C + SD_TEMPERATURE_C * z;

        let vegetation = soil / 120.0 + rng.random_range(-0.15..0.15);

        // Clamp keeps every draw inside the physical ranges
        samples.push(EnvironmentalSample::new(
            rainfall,
            soil,
            temperature,
            vegetation,
            SamplePolicy::Clamp,
        )?);
    }

    tracing::debug!("Generated {} synthetic samples (seed {})", samples.len(), seed);
    Ok(samples)
}
