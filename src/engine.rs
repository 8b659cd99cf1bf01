//! Assessment façade.
//!
//! Orchestration only. For each active hazard the engine takes a snapshot of
//! the published model and uses it when ready, otherwise the fallback rules;
//! then composes, categorizes and attaches the advisory. Policy lives in the
//! component modules and in [`RiskThresholds`].

use crate::advisory::AdvisoryGenerator;
use crate::classifier::{HazardClassifier, HazardModel, ModelStatus, DEFAULT_MIN_SAMPLES};
use crate::compositor::{round_one_decimal, RiskCompositor, RiskWeights};
use crate::error::{EngineError, EngineResult};
use crate::fallback::FallbackScorer;
use crate::labels::LabelDeriver;
use crate::models::{
    EnvironmentalSample, Hazard, HazardScore, RawSample, RegionType, RiskAssessment, SamplePolicy,
};
use crate::thresholds::RiskThresholds;

// ---

/// Deployment-level engine configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    // ---
    /// Active hazards and their composite weights.
    pub weights: RiskWeights,
    pub sample_policy: SamplePolicy,
    /// Below this many training samples a classifier stays untrained.
    pub min_training_samples: usize,
    pub thresholds: RiskThresholds,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            weights: RiskWeights::two_hazard(),
            sample_policy: SamplePolicy::Clamp,
            min_training_samples: DEFAULT_MIN_SAMPLES,
            thresholds: RiskThresholds::default(),
        }
    }
}

/// The engine. Safe to share across threads behind an `Arc`.
#[derive(Debug)]
pub struct AssessmentEngine {
    // ---
    sample_policy: SamplePolicy,
    labels: LabelDeriver,
    classifiers: Vec<HazardClassifier>,
    fallback: FallbackScorer,
    compositor: RiskCompositor,
    advisory: AdvisoryGenerator,
}

impl AssessmentEngine {
    // ---
    /// Build an engine with every classifier untrained.
    ///
    /// Fails with [`EngineError::Configuration`] on invalid weights or cuts.
    pub fn new(settings: EngineSettings) -> EngineResult<Self> {
        // ---
        let weights = RiskWeights::new(settings.weights.entries().to_vec())?;
        let t = settings.thresholds;

        let classifiers = weights
            .hazards()
            .map(|h| HazardClassifier::new(h, settings.min_training_samples))
            .collect();

        Ok(AssessmentEngine {
            sample_policy: settings.sample_policy,
            labels: LabelDeriver::new(t.labels),
            classifiers,
            fallback: FallbackScorer::new(t.flood, t.drought, t.heat),
            compositor: RiskCompositor::new(weights, t.categories)?,
            advisory: AdvisoryGenerator::new(t.advisory),
        })
    }

    pub fn hazards(&self) -> Vec<Hazard> {
        self.classifiers.iter().map(|c| c.hazard()).collect()
    }

    pub fn sample_policy(&self) -> SamplePolicy {
        self.sample_policy
    }

    pub fn weights(&self) -> &RiskWeights {
        self.compositor.weights()
    }

    /// Validate raw readings under the engine's sample policy.
    pub fn sample(&self, raw: &RawSample) -> EngineResult<EnvironmentalSample> {
        raw.to_sample(self.sample_policy)
    }

    /// Derive labels from `samples` and retrain every classifier.
    ///
    /// All new models are built before any is published, and each hazard's
    /// model is replaced by a single reference swap.
    pub fn retrain(&self, samples: &[EnvironmentalSample]) -> Vec<ModelStatus> {
        // ---
        let models: Vec<HazardModel> = self
            .classifiers
            .iter()
            .map(|c| {
                let labels = self.labels.derive(c.hazard(), samples);
                c.build_model(samples, &labels)
            })
            .collect();

        let statuses: Vec<ModelStatus> = models.iter().map(HazardModel::status).collect();
        for (classifier, model) in self.classifiers.iter().zip(models) {
            classifier.publish(model);
        }

        let ready = statuses.iter().filter(|s| s.ready).count();
        tracing::info!(
            "Retrained on {} samples: {}/{} models ready",
            samples.len(),
            ready,
            statuses.len()
        );
        statuses
    }

    /// Install a prebuilt model for one of the active hazards.
    pub fn publish_model(&self, model: HazardModel) -> EngineResult<()> {
        // ---
        let hazard = model.hazard();
        let classifier = self
            .classifiers
            .iter()
            .find(|c| c.hazard() == hazard)
            .ok_or_else(|| {
                EngineError::Configuration(format!("hazard '{hazard}' is not active"))
            })?;
        classifier.publish(model);
        Ok(())
    }

    pub fn model_statuses(&self) -> Vec<ModelStatus> {
        self.classifiers.iter().map(|c| c.current().status()).collect()
    }

    /// Assess one validated sample.
    pub fn assess(&self, sample: &EnvironmentalSample, region: RegionType) -> RiskAssessment {
        // ---
        let scores: Vec<HazardScore> = self
            .classifiers
            .iter()
            .map(|c| self.score_hazard(c, sample))
            .collect();

        let composite = round_one_decimal(self.compositor.composite(&scores));
        let category = self.compositor.categorize(composite);
        let advisory = self
            .advisory
            .advise(sample.soil_moisture_pct(), sample.rainfall_mm(), region);

        tracing::debug!(
            "Assessed {:?} ({}): composite {} {}",
            sample,
            region,
            composite,
            category
        );

        RiskAssessment::new(region, scores, composite, category, advisory)
    }

    /// Validate then assess.
    pub fn assess_raw(&self, raw: &RawSample, region: RegionType) -> EngineResult<RiskAssessment> {
        let sample = self.sample(raw)?;
        Ok(self.assess(&sample, region))
    }

    fn score_hazard(&self, classifier: &HazardClassifier, sample: &EnvironmentalSample) -> HazardScore {
        // ---
        let hazard = classifier.hazard();
        let model = classifier.current();

        let (score, model_backed) = match model.probability(sample) {
            Some(p) => (p * 100.0, true),
            None => (self.fallback.score(hazard, sample), false),
        };

        HazardScore {
            hazard,
            score: round_one_decimal(score.clamp(0.0, 100.0)),
            model_backed,
        }
    }
}
