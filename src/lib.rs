//! Multi-hazard risk assessment engine.
//!
//! Turns rainfall, soil moisture, temperature and vegetation readings into
//! per-hazard risk scores (flood, drought, optionally heat), a weighted
//! composite score, a severity category and an advisory string.
//!
//! Request-time flow:
//! `EnvironmentalSample` → per-hazard classifier or fallback rules →
//! `RiskCompositor` → `AdvisoryGenerator` → `RiskAssessment`.
//!
//! This crate follows the Explicit Module Boundary Pattern (EMBP): engine
//! modules are leaves, [`engine`] is the single orchestration point, and the
//! HTTP surface in [`routes`] only talks to [`engine::AssessmentEngine`].

pub mod advisory;
pub mod classifier;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod labels;
pub mod models;
pub mod routes;
pub mod synthetic;
pub mod thresholds;

pub use config::Config;
pub use engine::{AssessmentEngine, EngineSettings};
pub use error::{EngineError, EngineResult};
pub use models::{
    EnvironmentalSample, Hazard, HazardScore, RawSample, RegionType, RiskAssessment,
    RiskCategory, SamplePolicy,
};
