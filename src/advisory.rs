//! Advisory text for the caller.
//!
//! Driven by soil moisture, rainfall and region type only. These cuts are
//! separate from the hazard bands and do not feed the composite score.

use crate::models::RegionType;
use crate::thresholds::AdvisoryCuts;

// ---

/// Maps readings and region type to a short recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryGenerator {
    // ---
    cuts: AdvisoryCuts,
}

impl AdvisoryGenerator {
    // ---
    pub fn new(cuts: AdvisoryCuts) -> Self {
        AdvisoryGenerator { cuts }
    }

    pub fn advise(&self, soil_moisture_pct: f64, rainfall_mm: f64, region: RegionType) -> String {
        // ---
        let c = &self.cuts;

        let text = if soil_moisture_pct < c.critical_soil_pct {
            match region {
                RegionType::Urban => {
                    "URGENT: Critically low soil moisture. Introduce water rationing \
                     and promote rainwater harvesting in households and public buildings."
                }
                RegionType::Rural => {
                    "URGENT: Critically low soil moisture. Prioritise irrigation for \
                     staple crops and secure drinking water for livestock."
                }
            }
        } else if soil_moisture_pct < c.low_soil_pct {
            match region {
                RegionType::Urban => {
                    "Soil moisture is below normal. Monitor reservoir levels and plan \
                     water conservation measures."
                }
                RegionType::Rural => {
                    "Soil moisture is below normal. Monitor crop stress and plan \
                     supplementary irrigation."
                }
            }
        } else if soil_moisture_pct > c.saturated_soil_pct && rainfall_mm > c.heavy_rain_mm {
            match region {
                RegionType::Urban => {
                    "WARNING: Saturated soil and heavy rainfall. Clear storm drains and \
                     prepare for urban flooding."
                }
                RegionType::Rural => {
                    "WARNING: Saturated soil and heavy rainfall. Check field drainage and \
                     move livestock away from flood-prone land."
                }
            }
        } else {
            "Soil moisture levels are adequate. Continue routine monitoring."
        };

        text.to_string()
    }
}
