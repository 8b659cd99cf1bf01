//! Configuration loader for the `codemetal-hazardrisk` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Values are read through a lookup function so the
//! same parsing runs against the process environment or a test map.
//!
use std::env;
use std::net::SocketAddr;

use anyhow::{anyhow, Result};

use crate::classifier::DEFAULT_MIN_SAMPLES;
use crate::compositor::RiskWeights;
use crate::engine::EngineSettings;
use crate::models::{Hazard, SamplePolicy};
use crate::thresholds::RiskThresholds;

/// Parse an optional environment variable with `FromStr` and a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

// ---

/// Where the engine's training samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingSource {
    /// Seeded synthetic generator.
    Synthetic,
    /// No training; every score comes from the fallback rules.
    None,
}

impl std::str::FromStr for TrainingSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(TrainingSource::Synthetic),
            "none" => Ok(TrainingSource::None),
            other => Err(format!("unknown training source '{other}'")),
        }
    }
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// HTTP listen address.
    pub bind_addr: SocketAddr,

    /// Active hazards with their composite weights.
    pub weights: RiskWeights,

    /// Clamp or reject out-of-range readings.
    pub sample_policy: SamplePolicy,

    /// Minimum training-set size before a classifier is fit.
    pub min_training_samples: usize,

    /// Training sample source.
    pub training_source: TrainingSource,

    /// Number of synthetic training samples.
    pub training_samples: usize,

    /// Seed for the synthetic training source.
    pub training_seed: u64,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `BIND_ADDR` – listen address (default: 0.0.0.0:8080)
/// - `RISK_HAZARDS` – active hazards (default: flood,drought)
/// - `RISK_WEIGHTS` – weights aligned with `RISK_HAZARDS` (default: per hazard set)
/// - `RISK_SAMPLE_POLICY` – clamp | reject (default: clamp)
/// - `RISK_MIN_TRAINING_SAMPLES` – (default: 30)
/// - `RISK_TRAINING_SOURCE` – synthetic | none (default: synthetic)
/// - `RISK_TRAINING_SAMPLES` – (default: 1000)
/// - `RISK_TRAINING_SEED` – (default: 42)
///
/// Returns an error if any variable is invalid or the weights do not form a
/// valid configuration.
pub fn load_from_env() -> Result<Config> {
    load_with(|key| env::var(key).ok())
}

/// Same as [`load_from_env`] with an explicit key lookup.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let bind_addr = parse_env!(
        lookup,
        "BIND_ADDR",
        SocketAddr,
        SocketAddr::from(([0, 0, 0, 0], 8080))
    );
    let sample_policy = parse_env!(lookup, "RISK_SAMPLE_POLICY", SamplePolicy, SamplePolicy::Clamp);
    let min_training_samples =
        parse_env!(lookup, "RISK_MIN_TRAINING_SAMPLES", usize, DEFAULT_MIN_SAMPLES);
    let training_source = parse_env!(
        lookup,
        "RISK_TRAINING_SOURCE",
        TrainingSource,
        TrainingSource::Synthetic
    );
    let training_samples = parse_env!(lookup, "RISK_TRAINING_SAMPLES", usize, 1000);
    let training_seed = parse_env!(lookup, "RISK_TRAINING_SEED", u64, 42);

    let weights = parse_weights(lookup("RISK_HAZARDS"), lookup("RISK_WEIGHTS"))?;

    Ok(Config {
        bind_addr,
        weights,
        sample_policy,
        min_training_samples,
        training_source,
        training_samples,
        training_seed,
    })
}

fn parse_weights(hazards: Option<String>, weights: Option<String>) -> Result<RiskWeights> {
    // ---
    let hazards: Vec<Hazard> = match hazards {
        Some(list) => list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Hazard>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| anyhow!("Invalid RISK_HAZARDS: {}", e))?,
        None => vec![Hazard::Flood, Hazard::Drought],
    };

    match weights {
        Some(list) => {
            let values: Vec<f64> = list
                .split(',')
                .map(|s| s.trim().parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| anyhow!("Invalid RISK_WEIGHTS: {}", e))?;
            if values.len() != hazards.len() {
                return Err(anyhow!(
                    "RISK_WEIGHTS has {} values but RISK_HAZARDS names {} hazards",
                    values.len(),
                    hazards.len()
                ));
            }
            Ok(RiskWeights::new(hazards.into_iter().zip(values).collect())?)
        }
        None => RiskWeights::defaults_for(&hazards).ok_or_else(|| {
            if hazards.is_empty() {
                anyhow!("RISK_HAZARDS must name at least one hazard")
            } else {
                anyhow!("RISK_WEIGHTS must be set for hazard set {:?}", hazards)
            }
        }),
    }
}

impl Config {
    /// Engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            weights: self.weights.clone(),
            sample_policy: self.sample_policy,
            min_training_samples: self.min_training_samples,
            thresholds: RiskThresholds::default(),
        }
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        let weights: Vec<String> = self
            .weights
            .entries()
            .iter()
            .map(|(h, w)| format!("{h}={w}"))
            .collect();

        tracing::info!("Configuration loaded:");
        tracing::info!("  BIND_ADDR                 : {}", self.bind_addr);
        tracing::info!("  RISK_WEIGHTS              : {}", weights.join(", "));
        tracing::info!("  RISK_SAMPLE_POLICY        : {:?}", self.sample_policy);
        tracing::info!("  RISK_MIN_TRAINING_SAMPLES : {}", self.min_training_samples);
        tracing::info!("  RISK_TRAINING_SOURCE      : {:?}", self.training_source);
        tracing::info!("  RISK_TRAINING_SAMPLES     : {}", self.training_samples);
        tracing::info!("  RISK_TRAINING_SEED        : {}", self.training_seed);
    }
}
