//! Weighted composition of per-hazard scores.
//!
//! Weights are validated once, at construction. Category mapping uses
//! half-open bands with inclusive lower bounds, so a composite of exactly
//! 40.0 is `MEDIUM` and exactly 70.0 is `HIGH`.

use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::models::{Hazard, HazardScore, RiskCategory};
use crate::thresholds::CategoryCuts;

// ---

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Fixed hazard weights for one composite. Sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskWeights {
    // ---
    entries: Vec<(Hazard, f64)>,
}

impl RiskWeights {
    // ---
    pub fn new(entries: Vec<(Hazard, f64)>) -> EngineResult<Self> {
        // ---
        if entries.is_empty() {
            return Err(EngineError::Configuration(
                "hazard set must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (hazard, weight) in &entries {
            if !seen.insert(*hazard) {
                return Err(EngineError::Configuration(format!(
                    "hazard '{hazard}' is listed more than once"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(EngineError::Configuration(format!(
                    "weight for '{hazard}' must be a non-negative number, got {weight}"
                )));
            }
        }

        let sum: f64 = entries.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::Configuration(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(RiskWeights { entries })
    }

    /// Flood/drought at 0.5/0.5.
    pub fn two_hazard() -> Self {
        RiskWeights {
            entries: vec![(Hazard::Flood, 0.5), (Hazard::Drought, 0.5)],
        }
    }

    /// Flood/drought/heat at 0.4/0.3/0.3.
    pub fn three_hazard() -> Self {
        RiskWeights {
            entries: vec![
                (Hazard::Flood, 0.4),
                (Hazard::Drought, 0.3),
                (Hazard::Heat, 0.3),
            ],
        }
    }

    /// Default weights for a known hazard set, if there is one.
    pub fn defaults_for(hazards: &[Hazard]) -> Option<Self> {
        // ---
        let mut sorted = hazards.to_vec();
        sorted.sort();
        match sorted.as_slice() {
            [Hazard::Flood, Hazard::Drought] => Some(Self::two_hazard()),
            [Hazard::Flood, Hazard::Drought, Hazard::Heat] => Some(Self::three_hazard()),
            [single] => RiskWeights::new(vec![(*single, 1.0)]).ok(),
            _ => None,
        }
    }

    pub fn hazards(&self) -> impl Iterator<Item = Hazard> + '_ {
        self.entries.iter().map(|(h, _)| *h)
    }

    pub fn weight(&self, hazard: Hazard) -> Option<f64> {
        self.entries
            .iter()
            .find(|(h, _)| *h == hazard)
            .map(|(_, w)| *w)
    }

    pub fn entries(&self) -> &[(Hazard, f64)] {
        &self.entries
    }
}

/// Combines hazard scores into a composite index and severity category.
#[derive(Debug, Clone)]
pub struct RiskCompositor {
    // ---
    weights: RiskWeights,
    cuts: CategoryCuts,
}

impl RiskCompositor {
    // ---
    pub fn new(weights: RiskWeights, cuts: CategoryCuts) -> EngineResult<Self> {
        // ---
        if !(cuts.medium_from.is_finite()
            && cuts.high_from.is_finite()
            && cuts.medium_from < cuts.high_from)
        {
            return Err(EngineError::Configuration(format!(
                "category cuts must be increasing, got {} and {}",
                cuts.medium_from, cuts.high_from
            )));
        }
        Ok(RiskCompositor { weights, cuts })
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Weighted sum over the active hazards, clamped to [0, 100].
    ///
    /// A hazard with no matching score contributes zero.
    pub fn composite(&self, scores: &[HazardScore]) -> f64 {
        // ---
        let total: f64 = self
            .weights
            .entries()
            .iter()
            .map(|(hazard, weight)| {
                scores
                    .iter()
                    .find(|s| s.hazard == *hazard)
                    .map_or(0.0, |s| weight * s.score.clamp(0.0, 100.0))
            })
            .sum();
        total.clamp(0.0, 100.0)
    }

    pub fn categorize(&self, composite: f64) -> RiskCategory {
        // ---
        if composite >= self.cuts.high_from {
            RiskCategory::High
        } else if composite >= self.cuts.medium_from {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }
}

/// Round to one decimal for presentation.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
