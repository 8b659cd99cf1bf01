//! Rule-based fallback scoring.
//!
//! Deterministic additive point rules over the raw readings, usable whenever
//! no trained classifier is available. Totals are capped below 100 so a
//! heuristic never reads as certainty.

use crate::models::{EnvironmentalSample, Hazard};
use crate::thresholds::{points_above, points_below, DroughtRules, FloodRules, HeatRules};

// ---

/// Stateless scorer driven by the configured band tables.
#[derive(Debug, Clone, Default)]
pub struct FallbackScorer {
    // ---
    flood: FloodRules,
    drought: DroughtRules,
    heat: HeatRules,
}

impl FallbackScorer {
    // ---
    pub fn new(flood: FloodRules, drought: DroughtRules, heat: HeatRules) -> Self {
        FallbackScorer {
            flood,
            drought,
            heat,
        }
    }

    /// Score 0–100 for `hazard`.
    pub fn score(&self, hazard: Hazard, sample: &EnvironmentalSample) -> f64 {
        match hazard {
            Hazard::Flood => self.flood_score(sample),
            Hazard::Drought => self.drought_score(sample),
            Hazard::Heat => self.heat_score(sample),
        }
    }

    pub fn flood_score(&self, sample: &EnvironmentalSample) -> f64 {
        // ---
        let r = &self.flood;
        let points = points_above(sample.rainfall_mm(), &r.rainfall)
            + points_above(sample.soil_moisture_pct(), &r.soil_moisture)
            + points_below(sample.vegetation_index(), &r.vegetation);
        cap(points, r.cap)
    }

    pub fn drought_score(&self, sample: &EnvironmentalSample) -> f64 {
        // ---
        let r = &self.drought;
        let points = points_below(sample.rainfall_mm(), &r.rainfall)
            + points_below(sample.soil_moisture_pct(), &r.soil_moisture)
            + points_above(sample.temperature_c(), &r.temperature)
            + points_below(sample.vegetation_index(), &r.vegetation);
        cap(points, r.cap)
    }

    pub fn heat_score(&self, sample: &EnvironmentalSample) -> f64 {
        // ---
        let r = &self.heat;
        let points = points_above(sample.temperature_c(), &r.temperature)
            + points_below(sample.soil_moisture_pct(), &r.soil_moisture)
            + points_below(sample.vegetation_index(), &r.vegetation);
        cap(points, r.cap)
    }
}

fn cap(points: f64, cap: f64) -> f64 {
    points.min(cap).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::SamplePolicy;

    fn sample(rain: f64, soil: f64, temp: f64, ndvi: f64) -> EnvironmentalSample {
        EnvironmentalSample::new(rain, soil, temp, ndvi, SamplePolicy::Reject).unwrap()
    }

    #[test]
    fn test_flood_all_bands_hit_cap() {
        // ---
        let scorer = FallbackScorer::default();

        // min(98, 60 + 30 + 10)
        assert_eq!(scorer.flood_score(&sample(50.0, 80.0, 20.0, 0.2)), 98.0);
    }

    #[test]
    fn test_flood_band_points() {
        // ---
        let scorer = FallbackScorer::default();

        assert_eq!(scorer.flood_score(&sample(0.0, 10.0, 20.0, 0.5)), 0.0);
        assert_eq!(scorer.flood_score(&sample(30.0, 10.0, 20.0, 0.5)), 30.0);
        assert_eq!(scorer.flood_score(&sample(30.0, 60.0, 20.0, 0.5)), 45.0);
        assert_eq!(scorer.flood_score(&sample(41.0, 71.0, 20.0, 0.5)), 90.0);
        // Strict bands
        assert_eq!(scorer.flood_score(&sample(40.0, 70.0, 20.0, 0.3)), 45.0);
    }

    #[test]
    fn test_flood_never_reaches_100() {
        // ---
        let scorer = FallbackScorer::default();
        let worst = sample(500.0, 100.0, 20.0, -1.0);

        assert!(scorer.flood_score(&worst) < 100.0);
    }

    #[test]
    fn test_flood_monotonic_in_rainfall() {
        // ---
        let scorer = FallbackScorer::default();

        for (soil, ndvi) in [(10.0, 0.8), (55.0, 0.5), (90.0, 0.1)] {
            let mut previous = 0.0;
            for step in 0..=120 {
                let score = scorer.flood_score(&sample(step as f64 * 0.5, soil, 20.0, ndvi));
                assert!(score >= previous, "flood score dropped at rain={}", step as f64 * 0.5);
                previous = score;
            }
        }
    }

    #[test]
    fn test_drought_monotonic_in_dryness_and_heat() {
        // ---
        let scorer = FallbackScorer::default();

        let mut previous = 0.0;
        for rain in (0..=30).rev() {
            let score = scorer.drought_score(&sample(rain as f64, 30.0, 28.0, 0.5));
            assert!(score >= previous, "drought score dropped at rain={}", rain);
            previous = score;
        }

        let mut previous = 0.0;
        for temp in -10..=55 {
            let score = scorer.drought_score(&sample(3.0, 30.0, temp as f64, 0.5));
            assert!(score >= previous, "drought score dropped at temp={}", temp);
            previous = score;
        }
    }

    #[test]
    fn test_drought_cap() {
        // ---
        let scorer = FallbackScorer::default();

        // 40 + 30 + 20 + 8 capped
        assert_eq!(scorer.drought_score(&sample(0.0, 5.0, 45.0, 0.0)), 95.0);
        assert_eq!(scorer.drought_score(&sample(20.0, 60.0, 20.0, 0.6)), 0.0);
    }

    #[test]
    fn test_heat_bands_and_cap() {
        // ---
        let scorer = FallbackScorer::default();

        assert_eq!(scorer.heat_score(&sample(0.0, 50.0, 25.0, 0.6)), 0.0);
        assert_eq!(scorer.heat_score(&sample(0.0, 50.0, 36.0, 0.6)), 35.0);
        assert_eq!(scorer.heat_score(&sample(0.0, 10.0, 45.0, 0.1)), 85.0);

        let hot = FallbackScorer::new(
            FloodRules::default(),
            DroughtRules::default(),
            HeatRules {
                cap: 80.0,
                ..HeatRules::default()
            },
        );
        assert_eq!(hot.heat_score(&sample(0.0, 10.0, 45.0, 0.1)), 80.0);
    }

    #[test]
    fn test_score_dispatches_by_hazard() {
        // ---
        let scorer = FallbackScorer::default();
        let s = sample(50.0, 80.0, 38.0, 0.2);

        assert_eq!(scorer.score(Hazard::Flood, &s), scorer.flood_score(&s));
        assert_eq!(scorer.score(Hazard::Drought, &s), scorer.drought_score(&s));
        assert_eq!(scorer.score(Hazard::Heat, &s), scorer.heat_score(&s));
    }
}
