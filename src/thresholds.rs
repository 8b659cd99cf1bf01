//! Threshold policy for the hazard risk engine.
//!
//! Every band the engine applies lives here: training-label predicates,
//! fallback point bands, composite category cuts and advisory cuts. They are
//! policy, not learned values. Each engine instance holds one
//! [`RiskThresholds`] so a diverging deployment is a configuration choice
//! rather than a copy of the scoring code.
//!
//! Comparison rules:
//! - label predicates and fallback bands use strict inequalities
//!   (`rainfall_mm == 40` is not a flood event);
//! - category cuts are inclusive lower bounds (`40.0` is `MEDIUM`).

// --- Physical ranges accepted by `EnvironmentalSample`

pub const RAINFALL_MIN_MM: f64 = 0.0;
pub const RAINFALL_MAX_MM: f64 = 500.0;
pub const SOIL_MOISTURE_MIN_PCT: f64 = 0.0;
pub const SOIL_MOISTURE_MAX_PCT: f64 = 100.0;
pub const TEMPERATURE_MIN_C: f64 = -10.0;
pub const TEMPERATURE_MAX_C: f64 = 55.0;
pub const VEGETATION_INDEX_MIN: f64 = -1.0;
pub const VEGETATION_INDEX_MAX: f64 = 1.0;

// --- Training label predicates

pub const FLOOD_LABEL_HEAVY_RAIN_MM: f64 = 40.0;
pub const FLOOD_LABEL_MODERATE_RAIN_MM: f64 = 25.0;
pub const FLOOD_LABEL_SATURATED_SOIL_PCT: f64 = 60.0;

pub const DROUGHT_LABEL_MAX_RAIN_MM: f64 = 5.0;
pub const DROUGHT_LABEL_MAX_SOIL_PCT: f64 = 25.0;
pub const DROUGHT_LABEL_MIN_TEMP_C: f64 = 30.0;

pub const HEAT_LABEL_EXTREME_TEMP_C: f64 = 35.0;
pub const HEAT_LABEL_HOT_TEMP_C: f64 = 32.0;
pub const HEAT_LABEL_SPARSE_VEGETATION: f64 = 0.2;

// --- Composite category cuts (inclusive lower bounds)

pub const CATEGORY_MEDIUM_FROM: f64 = 40.0;
pub const CATEGORY_HIGH_FROM: f64 = 70.0;

// --- Advisory cuts

pub const ADVISORY_CRITICAL_SOIL_PCT: f64 = 20.0;
pub const ADVISORY_LOW_SOIL_PCT: f64 = 40.0;
pub const ADVISORY_SATURATED_SOIL_PCT: f64 = 80.0;
pub const ADVISORY_HEAVY_RAIN_MM: f64 = 30.0;

// ---

/// One additive scoring band: when the comparison holds, `points` are added.
///
/// Bands for the same reading are checked in order and only the first match
/// scores, so list the most extreme band first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub threshold: f64,
    pub points: f64,
}

impl Band {
    pub const fn new(threshold: f64, points: f64) -> Self {
        Band { threshold, points }
    }
}

/// Points for the first band whose threshold `value` strictly exceeds.
pub fn points_above(value: f64, bands: &[Band]) -> f64 {
    // ---
    bands
        .iter()
        .find(|b| value > b.threshold)
        .map_or(0.0, |b| b.points)
}

/// Points for the first band whose threshold `value` is strictly below.
pub fn points_below(value: f64, bands: &[Band]) -> f64 {
    // ---
    bands
        .iter()
        .find(|b| value < b.threshold)
        .map_or(0.0, |b| b.points)
}

/// Label predicates used to derive ground truth from historical readings.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelThresholds {
    pub flood_heavy_rain_mm: f64,
    pub flood_moderate_rain_mm: f64,
    pub flood_saturated_soil_pct: f64,
    pub drought_max_rain_mm: f64,
    pub drought_max_soil_pct: f64,
    pub drought_min_temp_c: f64,
    pub heat_extreme_temp_c: f64,
    pub heat_hot_temp_c: f64,
    pub heat_sparse_vegetation: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        LabelThresholds {
            flood_heavy_rain_mm: FLOOD_LABEL_HEAVY_RAIN_MM,
            flood_moderate_rain_mm: FLOOD_LABEL_MODERATE_RAIN_MM,
            flood_saturated_soil_pct: FLOOD_LABEL_SATURATED_SOIL_PCT,
            drought_max_rain_mm: DROUGHT_LABEL_MAX_RAIN_MM,
            drought_max_soil_pct: DROUGHT_LABEL_MAX_SOIL_PCT,
            drought_min_temp_c: DROUGHT_LABEL_MIN_TEMP_C,
            heat_extreme_temp_c: HEAT_LABEL_EXTREME_TEMP_C,
            heat_hot_temp_c: HEAT_LABEL_HOT_TEMP_C,
            heat_sparse_vegetation: HEAT_LABEL_SPARSE_VEGETATION,
        }
    }
}

/// Flood fallback bands.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodRules {
    /// Rainfall above threshold, most extreme first.
    pub rainfall: Vec<Band>,
    /// Soil moisture above threshold, most extreme first.
    pub soil_moisture: Vec<Band>,
    /// Vegetation index below threshold.
    pub vegetation: Vec<Band>,
    pub cap: f64,
}

impl Default for FloodRules {
    fn default() -> Self {
        FloodRules {
            rainfall: vec![Band::new(40.0, 60.0), Band::new(25.0, 30.0)],
            soil_moisture: vec![Band::new(70.0, 30.0), Band::new(50.0, 15.0)],
            vegetation: vec![Band::new(0.3, 10.0)],
            cap: 98.0,
        }
    }
}

/// Drought fallback bands.
#[derive(Debug, Clone, PartialEq)]
pub struct DroughtRules {
    /// Rainfall below threshold, driest first.
    pub rainfall: Vec<Band>,
    /// Soil moisture below threshold, driest first.
    pub soil_moisture: Vec<Band>,
    /// Temperature above threshold, hottest first.
    pub temperature: Vec<Band>,
    /// Vegetation index below threshold.
    pub vegetation: Vec<Band>,
    pub cap: f64,
}

impl Default for DroughtRules {
    fn default() -> Self {
        DroughtRules {
            rainfall: vec![Band::new(5.0, 40.0), Band::new(15.0, 20.0)],
            soil_moisture: vec![Band::new(25.0, 30.0), Band::new(40.0, 15.0)],
            temperature: vec![Band::new(30.0, 20.0), Band::new(25.0, 10.0)],
            vegetation: vec![Band::new(0.2, 8.0)],
            cap: 95.0,
        }
    }
}

/// Heat fallback bands.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatRules {
    /// Temperature above threshold, hottest first.
    pub temperature: Vec<Band>,
    /// Soil moisture below threshold.
    pub soil_moisture: Vec<Band>,
    /// Vegetation index below threshold.
    pub vegetation: Vec<Band>,
    pub cap: f64,
}

impl Default for HeatRules {
    fn default() -> Self {
        HeatRules {
            temperature: vec![
                Band::new(40.0, 60.0),
                Band::new(35.0, 35.0),
                Band::new(30.0, 15.0),
            ],
            soil_moisture: vec![Band::new(20.0, 15.0)],
            vegetation: vec![Band::new(0.2, 10.0)],
            cap: 95.0,
        }
    }
}

/// Inclusive lower bounds of the `MEDIUM` and `HIGH` categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCuts {
    pub medium_from: f64,
    pub high_from: f64,
}

impl Default for CategoryCuts {
    fn default() -> Self {
        CategoryCuts {
            medium_from: CATEGORY_MEDIUM_FROM,
            high_from: CATEGORY_HIGH_FROM,
        }
    }
}

/// Soil/rain cuts for the advisory text. Independent of the hazard bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisoryCuts {
    pub critical_soil_pct: f64,
    pub low_soil_pct: f64,
    pub saturated_soil_pct: f64,
    pub heavy_rain_mm: f64,
}

impl Default for AdvisoryCuts {
    fn default() -> Self {
        AdvisoryCuts {
            critical_soil_pct: ADVISORY_CRITICAL_SOIL_PCT,
            low_soil_pct: ADVISORY_LOW_SOIL_PCT,
            saturated_soil_pct: ADVISORY_SATURATED_SOIL_PCT,
            heavy_rain_mm: ADVISORY_HEAVY_RAIN_MM,
        }
    }
}

/// All threshold policy for one engine instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskThresholds {
    pub labels: LabelThresholds,
    pub flood: FloodRules,
    pub drought: DroughtRules,
    pub heat: HeatRules,
    pub categories: CategoryCuts,
    pub advisory: AdvisoryCuts,
}
