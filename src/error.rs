//! Error taxonomy for the hazard risk engine.
//!
//! Only `InvalidSample`, `NonFiniteReading` and `Configuration` ever reach a
//! caller. `ModelTraining` is raised and absorbed inside
//! [`HazardClassifier::fit`](crate::classifier::HazardClassifier::fit).

use thiserror::Error;

use crate::models::Hazard;

// ---

/// Errors produced by the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A reading fell outside its physical range under the reject policy.
    #[error("{field} = {value} is outside the valid range [{min}, {max}]")]
    InvalidSample {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A reading was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFiniteReading { field: &'static str },

    /// Deployment bug: bad weights, empty hazard set, mismatched settings.
    #[error("Invalid engine configuration: {0}")]
    Configuration(String),

    /// The statistical model could not be fit.
    #[error("Training the {hazard} model failed: {reason}")]
    ModelTraining { hazard: Hazard, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
