//! Training-time label derivation.
//!
//! Hazard labels are not measured. They come from fixed predicates over the
//! readings, configured in [`LabelThresholds`]. All comparisons are strict.

use crate::models::{EnvironmentalSample, Hazard};
use crate::thresholds::LabelThresholds;

// ---

/// Converts samples into per-hazard boolean labels.
#[derive(Debug, Clone)]
pub struct LabelDeriver {
    // ---
    thresholds: LabelThresholds,
}

impl LabelDeriver {
    // ---
    pub fn new(thresholds: LabelThresholds) -> Self {
        LabelDeriver { thresholds }
    }

    /// Label for a single sample.
    pub fn label(&self, hazard: Hazard, sample: &EnvironmentalSample) -> bool {
        // ---
        let t = &self.thresholds;
        let rain = sample.rainfall_mm();
        let soil = sample.soil_moisture_pct();
        let temp = sample.temperature_c();
        let ndvi = sample.vegetation_index();

        match hazard {
            Hazard::Flood => {
                rain > t.flood_heavy_rain_mm
                    || (rain > t.flood_moderate_rain_mm && soil > t.flood_saturated_soil_pct)
            }
            Hazard::Drought => {
                rain < t.drought_max_rain_mm
                    && soil < t.drought_max_soil_pct
                    && temp > t.drought_min_temp_c
            }
            Hazard::Heat => {
                temp > t.heat_extreme_temp_c
                    || (temp > t.heat_hot_temp_c && ndvi < t.heat_sparse_vegetation)
            }
        }
    }

    /// Labels for a batch, in sample order.
    pub fn derive(&self, hazard: Hazard, samples: &[EnvironmentalSample]) -> Vec<bool> {
        samples.iter().map(|s| self.label(hazard, s)).collect()
    }
}

impl Default for LabelDeriver {
    fn default() -> Self {
        LabelDeriver::new(LabelThresholds::default())
    }
}
