//! Data models for the hazard risk engine.
//!
//! Raw readings arrive as [`RawSample`] (query string or JSON) and become an
//! [`EnvironmentalSample`] only after range validation under the configured
//! [`SamplePolicy`]. The engine's output is a [`RiskAssessment`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::thresholds::{
    RAINFALL_MAX_MM, RAINFALL_MIN_MM, SOIL_MOISTURE_MAX_PCT, SOIL_MOISTURE_MIN_PCT,
    TEMPERATURE_MAX_C, TEMPERATURE_MIN_C, VEGETATION_INDEX_MAX, VEGETATION_INDEX_MIN,
};

// ---

/// How out-of-range readings are handled. Applied uniformly to every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePolicy {
    /// Pull the value to the nearest valid bound (live dashboards).
    #[default]
    Clamp,
    /// Fail with [`EngineError::InvalidSample`] (programmatic clients).
    Reject,
}

impl FromStr for SamplePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(SamplePolicy::Clamp),
            "reject" => Ok(SamplePolicy::Reject),
            other => Err(format!("unknown sample policy '{other}'")),
        }
    }
}

/// Raw readings as received from a caller, before validation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawSample {
    // ---
    pub rainfall_mm: f64,
    pub soil_moisture_pct: f64,
    pub temperature_c: f64,
    pub vegetation_index: f64,
}

impl RawSample {
    // ---
    pub fn to_sample(&self, policy: SamplePolicy) -> EngineResult<EnvironmentalSample> {
        EnvironmentalSample::new(
            self.rainfall_mm,
            self.soil_moisture_pct,
            self.temperature_c,
            self.vegetation_index,
            policy,
        )
    }
}

/// One validated observation. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentalSample {
    // ---
    rainfall_mm: f64,
    soil_moisture_pct: f64,
    temperature_c: f64,
    vegetation_index: f64,
}

impl EnvironmentalSample {
    // ---
    pub fn new(
        rainfall_mm: f64,
        soil_moisture_pct: f64,
        temperature_c: f64,
        vegetation_index: f64,
        policy: SamplePolicy,
    ) -> EngineResult<Self> {
        // ---
        Ok(EnvironmentalSample {
            rainfall_mm: check_range(
                "rainfall_mm",
                rainfall_mm,
                RAINFALL_MIN_MM,
                RAINFALL_MAX_MM,
                policy,
            )?,
            soil_moisture_pct: check_range(
                "soil_moisture_pct",
                soil_moisture_pct,
                SOIL_MOISTURE_MIN_PCT,
                SOIL_MOISTURE_MAX_PCT,
                policy,
            )?,
            temperature_c: check_range(
                "temperature_c",
                temperature_c,
                TEMPERATURE_MIN_C,
                TEMPERATURE_MAX_C,
                policy,
            )?,
            vegetation_index: check_range(
                "vegetation_index",
                vegetation_index,
                VEGETATION_INDEX_MIN,
                VEGETATION_INDEX_MAX,
                policy,
            )?,
        })
    }

    pub fn rainfall_mm(&self) -> f64 {
        self.rainfall_mm
    }

    pub fn soil_moisture_pct(&self) -> f64 {
        self.soil_moisture_pct
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn vegetation_index(&self) -> f64 {
        self.vegetation_index
    }

    /// Readings in classifier feature order.
    pub fn features(&self) -> [f64; 4] {
        [
            self.rainfall_mm,
            self.soil_moisture_pct,
            self.temperature_c,
            self.vegetation_index,
        ]
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    policy: SamplePolicy,
) -> EngineResult<f64> {
    // ---
    if !value.is_finite() {
        return Err(EngineError::NonFiniteReading { field });
    }
    if (min..=max).contains(&value) {
        return Ok(value);
    }
    match policy {
        SamplePolicy::Clamp => {
            tracing::debug!("Clamping {} = {} into [{}, {}]", field, value, min, max);
            Ok(value.clamp(min, max))
        }
        SamplePolicy::Reject => Err(EngineError::InvalidSample {
            field,
            value,
            min,
            max,
        }),
    }
}

/// A monitored climate risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    Flood,
    Drought,
    Heat,
}

impl Hazard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Flood => "flood",
            Hazard::Drought => "drought",
            Hazard::Heat => "heat",
        }
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hazard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flood" => Ok(Hazard::Flood),
            "drought" => Ok(Hazard::Drought),
            "heat" => Ok(Hazard::Heat),
            other => Err(format!("unknown hazard '{other}'")),
        }
    }
}

/// Region type, which changes the advisory wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    Urban,
    Rural,
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionType::Urban => f.write_str("urban"),
            RegionType::Rural => f.write_str("rural"),
        }
    }
}

impl FromStr for RegionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urban" => Ok(RegionType::Urban),
            "rural" => Ok(RegionType::Rural),
            other => Err(format!("unknown region type '{other}'")),
        }
    }
}

/// Ordered severity of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskCategory::Low => f.write_str("LOW"),
            RiskCategory::Medium => f.write_str("MEDIUM"),
            RiskCategory::High => f.write_str("HIGH"),
        }
    }
}

/// Score for one hazard, 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardScore {
    // ---
    pub hazard: Hazard,
    pub score: f64,
    /// True when the trained classifier produced the score.
    pub model_backed: bool,
}

/// Result of one assessment. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    // ---
    region_type: RegionType,
    hazards: Vec<HazardScore>,
    flood_score: Option<f64>,
    drought_score: Option<f64>,
    heat_score: Option<f64>,
    composite_score: f64,
    category: RiskCategory,
    advisory: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    fallback_notice: Option<String>,
}

impl RiskAssessment {
    // ---
    pub fn new(
        region_type: RegionType,
        hazards: Vec<HazardScore>,
        composite_score: f64,
        category: RiskCategory,
        advisory: String,
    ) -> Self {
        // ---
        let score_of = |h: Hazard| hazards.iter().find(|s| s.hazard == h).map(|s| s.score);

        let fallback: Vec<&str> = hazards
            .iter()
            .filter(|s| !s.model_backed)
            .map(|s| s.hazard.as_str())
            .collect();
        let fallback_notice = (!fallback.is_empty()).then(|| {
            format!(
                "Scores for {} are rule-based estimates, not calibrated model probabilities.",
                fallback.join(", ")
            )
        });

        RiskAssessment {
            region_type,
            flood_score: score_of(Hazard::Flood),
            drought_score: score_of(Hazard::Drought),
            heat_score: score_of(Hazard::Heat),
            hazards,
            composite_score,
            category,
            advisory,
            fallback_notice,
        }
    }

    pub fn region_type(&self) -> RegionType {
        self.region_type
    }

    pub fn hazards(&self) -> &[HazardScore] {
        &self.hazards
    }

    pub fn hazard(&self, hazard: Hazard) -> Option<&HazardScore> {
        self.hazards.iter().find(|s| s.hazard == hazard)
    }

    pub fn flood_score(&self) -> Option<f64> {
        self.flood_score
    }

    pub fn drought_score(&self) -> Option<f64> {
        self.drought_score
    }

    pub fn heat_score(&self) -> Option<f64> {
        self.heat_score
    }

    pub fn composite_score(&self) -> f64 {
        self.composite_score
    }

    pub fn category(&self) -> RiskCategory {
        self.category
    }

    pub fn advisory(&self) -> &str {
        &self.advisory
    }

    /// Disclaimer text when any score came from the fallback rules.
    pub fn fallback_notice(&self) -> Option<&str> {
        self.fallback_notice.as_deref()
    }

    /// True only when every hazard score came from a trained classifier.
    pub fn fully_model_backed(&self) -> bool {
        self.hazards.iter().all(|s| s.model_backed)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_in_range_sample_is_unchanged() {
        // ---
        let sample = EnvironmentalSample::new(12.5, 55.0, 24.0, 0.6, SamplePolicy::Reject).unwrap();

        assert_eq!(sample.rainfall_mm(), 12.5);
        assert_eq!(sample.soil_moisture_pct(), 55.0);
        assert_eq!(sample.temperature_c(), 24.0);
        assert_eq!(sample.vegetation_index(), 0.6);
    }

    #[test]
    fn test_clamp_policy_pulls_to_bounds() {
        // ---
        let sample =
            EnvironmentalSample::new(-3.0, 140.0, 70.0, -2.5, SamplePolicy::Clamp).unwrap();

        assert_eq!(sample.rainfall_mm(), RAINFALL_MIN_MM);
        assert_eq!(sample.soil_moisture_pct(), SOIL_MOISTURE_MAX_PCT);
        assert_eq!(sample.temperature_c(), TEMPERATURE_MAX_C);
        assert_eq!(sample.vegetation_index(), VEGETATION_INDEX_MIN);
    }

    #[test]
    fn test_reject_policy_names_the_field() {
        // ---
        let err = EnvironmentalSample::new(10.0, 101.0, 20.0, 0.5, SamplePolicy::Reject)
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::InvalidSample {
                field: "soil_moisture_pct",
                value: 101.0,
                min: SOIL_MOISTURE_MIN_PCT,
                max: SOIL_MOISTURE_MAX_PCT,
            }
        );
    }

    #[test]
    fn test_non_finite_rejected_under_both_policies() {
        // ---
        for policy in [SamplePolicy::Clamp, SamplePolicy::Reject] {
            let err = EnvironmentalSample::new(f64::NAN, 50.0, 20.0, 0.5, policy).unwrap_err();
            assert_eq!(err, EngineError::NonFiniteReading { field: "rainfall_mm" });

            let err =
                EnvironmentalSample::new(5.0, 50.0, f64::INFINITY, 0.5, policy).unwrap_err();
            assert_eq!(err, EngineError::NonFiniteReading { field: "temperature_c" });
        }
    }

    #[test]
    fn test_category_ordering() {
        // ---
        assert!(RiskCategory::Low < RiskCategory::Medium);
        assert!(RiskCategory::Medium < RiskCategory::High);
    }

    #[test]
    fn test_parse_names() {
        // ---
        assert_eq!("Flood".parse::<Hazard>(), Ok(Hazard::Flood));
        assert_eq!(" heat ".parse::<Hazard>(), Ok(Hazard::Heat));
        assert!("storm".parse::<Hazard>().is_err());
        assert_eq!("URBAN".parse::<RegionType>(), Ok(RegionType::Urban));
        assert_eq!("reject".parse::<SamplePolicy>(), Ok(SamplePolicy::Reject));
    }

    #[test]
    fn test_assessment_exposes_per_hazard_fields() {
        // ---
        let assessment = RiskAssessment::new(
            RegionType::Rural,
            vec![
                HazardScore { hazard: Hazard::Flood, score: 80.0, model_backed: true },
                HazardScore { hazard: Hazard::Drought, score: 10.0, model_backed: false },
            ],
            45.0,
            RiskCategory::Medium,
            "ok".to_string(),
        );

        assert_eq!(assessment.flood_score(), Some(80.0));
        assert_eq!(assessment.drought_score(), Some(10.0));
        assert_eq!(assessment.heat_score(), None);
        assert!(!assessment.fully_model_backed());
        assert!(assessment.fallback_notice().unwrap().contains("drought"));
        assert!(!assessment.fallback_notice().unwrap().contains("flood"));
    }

    #[test]
    fn test_assessment_json_shape() {
        // ---
        let assessment = RiskAssessment::new(
            RegionType::Urban,
            vec![HazardScore { hazard: Hazard::Flood, score: 98.0, model_backed: true }],
            98.0,
            RiskCategory::High,
            "drain".to_string(),
        );
        let json = serde_json::to_value(&assessment).unwrap();

        assert_eq!(json["category"], "HIGH");
        assert_eq!(json["region_type"], "urban");
        assert_eq!(json["hazards"][0]["hazard"], "flood");
        assert_eq!(json["flood_score"], 98.0);
        assert!(json["heat_score"].is_null());
        assert!(json.get("fallback_notice").is_none());
    }
}
