//! Per-hazard logistic classifier.
//!
//! A [`HazardClassifier`] owns the current [`HazardModel`] behind a shared
//! reference. Fitting builds a complete new model and publishes it with a
//! single reference swap, so concurrent scorers see either the old model or
//! the new one, never a partially updated one.
//!
//! Fitting is full-batch gradient descent on L2-regularized log-loss over
//! standardized features, starting from zero. There is no randomness, so the
//! same training set always yields the same coefficients.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{EnvironmentalSample, Hazard};

// ---

pub const DEFAULT_MIN_SAMPLES: usize = 30;

pub const N_FEATURES: usize = 4;
const LEARNING_RATE: f64 = 0.5;
const ITERATIONS: usize = 1_000;
const L2_PENALTY: f64 = 1e-3;

/// Fitted parameters of one logistic model.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedParams {
    // ---
    pub coefficients: [f64; N_FEATURES],
    pub intercept: f64,
    /// Per-feature training mean used for standardization.
    pub means: [f64; N_FEATURES],
    /// Per-feature training standard deviation (1.0 when constant).
    pub scales: [f64; N_FEATURES],
}

impl FittedParams {
    fn logit(&self, sample: &EnvironmentalSample) -> f64 {
        // ---
        let x = sample.features();
        (0..N_FEATURES).fold(self.intercept, |acc, j| {
            acc + self.coefficients[j] * (x[j] - self.means[j]) / self.scales[j]
        })
    }
}

/// Trained state for one hazard. Immutable once built.
#[derive(Debug, Clone)]
pub struct HazardModel {
    // ---
    hazard: Hazard,
    params: Option<FittedParams>,
    training_samples: usize,
    positive_labels: usize,
    trained_at: Option<DateTime<Utc>>,
}

impl HazardModel {
    // ---
    /// Sentinel for a hazard with no usable model.
    pub fn untrained(hazard: Hazard) -> Self {
        HazardModel {
            hazard,
            params: None,
            training_samples: 0,
            positive_labels: 0,
            trained_at: None,
        }
    }

    pub fn hazard(&self) -> Hazard {
        self.hazard
    }

    pub fn is_ready(&self) -> bool {
        self.params.is_some()
    }

    pub fn params(&self) -> Option<&FittedParams> {
        self.params.as_ref()
    }

    /// Hazard probability in [0, 1], or `None` when the model is not ready.
    pub fn probability(&self, sample: &EnvironmentalSample) -> Option<f64> {
        // ---
        let params = self.params.as_ref()?;
        let p = sigmoid(params.logit(sample));
        // NaN in the fitted state propagates through the logit
        if p.is_finite() {
            Some(p.clamp(0.0, 1.0))
        } else {
            None
        }
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            hazard: self.hazard,
            ready: self.is_ready(),
            training_samples: self.training_samples,
            positive_labels: self.positive_labels,
            trained_at: self.trained_at,
        }
    }
}

/// Read-only summary of a model, for the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub hazard: Hazard,
    pub ready: bool,
    pub training_samples: usize,
    pub positive_labels: usize,
    pub trained_at: Option<DateTime<Utc>>,
}

/// Trains and holds the model for one hazard.
#[derive(Debug)]
pub struct HazardClassifier {
    // ---
    hazard: Hazard,
    min_samples: usize,
    model: RwLock<Arc<HazardModel>>,
}

impl HazardClassifier {
    // ---
    pub fn new(hazard: Hazard, min_samples: usize) -> Self {
        HazardClassifier {
            hazard,
            min_samples,
            model: RwLock::new(Arc::new(HazardModel::untrained(hazard))),
        }
    }

    pub fn hazard(&self) -> Hazard {
        self.hazard
    }

    /// Snapshot of the currently published model.
    pub fn current(&self) -> Arc<HazardModel> {
        let guard = self.model.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the published model in one step.
    pub fn publish(&self, model: HazardModel) {
        let mut guard = self.model.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(model);
    }

    /// Fit on `samples`/`labels` and publish the result.
    ///
    /// Never fails: a degenerate training set or a numerical failure is
    /// logged and publishes the untrained sentinel, which sends callers down
    /// the fallback path. Returns whether the new model is ready.
    pub fn fit(&self, samples: &[EnvironmentalSample], labels: &[bool]) -> bool {
        // ---
        let model = self.build_model(samples, labels);
        let ready = model.is_ready();
        self.publish(model);
        ready
    }

    /// Fit without publishing. Same failure absorption as [`fit`](Self::fit).
    pub fn build_model(&self, samples: &[EnvironmentalSample], labels: &[bool]) -> HazardModel {
        // ---
        match fit_logistic(self.hazard, samples, labels, self.min_samples) {
            Ok(params) => {
                let positives = labels.iter().filter(|l| **l).count();
                tracing::info!(
                    "Trained {} model on {} samples ({} positive)",
                    self.hazard,
                    samples.len(),
                    positives
                );
                HazardModel {
                    hazard: self.hazard,
                    params: Some(params),
                    training_samples: samples.len(),
                    positive_labels: positives,
                    trained_at: Some(Utc::now()),
                }
            }
            Err(e) => {
                tracing::warn!("{}; using rule-based fallback", e);
                HazardModel::untrained(self.hazard)
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    // ---
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn training_failure(hazard: Hazard, reason: impl Into<String>) -> EngineError {
    EngineError::ModelTraining {
        hazard,
        reason: reason.into(),
    }
}

fn fit_logistic(
    hazard: Hazard,
    samples: &[EnvironmentalSample],
    labels: &[bool],
    min_samples: usize,
) -> EngineResult<FittedParams> {
    // ---
    if samples.len() != labels.len() {
        return Err(training_failure(
            hazard,
            format!("{} samples but {} labels", samples.len(), labels.len()),
        ));
    }
    if samples.len() < min_samples.max(2) {
        return Err(training_failure(
            hazard,
            format!("{} samples, need at least {}", samples.len(), min_samples),
        ));
    }
    let positives = labels.iter().filter(|l| **l).count();
    if positives == 0 || positives == labels.len() {
        return Err(training_failure(hazard, "labels are all one class"));
    }

    let n = samples.len() as f64;
    let rows: Vec<[f64; N_FEATURES]> = samples.iter().map(|s| s.features()).collect();
    let targets: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();

    // Standardize
    let mut means = [0.0; N_FEATURES];
    let mut scales = [0.0; N_FEATURES];
    for j in 0..N_FEATURES {
        means[j] = rows.iter().map(|r| r[j]).sum::<f64>() / n;
        let var = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
        let sd = var.sqrt();
        scales[j] = if sd > f64::EPSILON { sd } else { 1.0 };
    }
    let xs: Vec<[f64; N_FEATURES]> = rows
        .iter()
        .map(|r| {
            let mut z = [0.0; N_FEATURES];
            for j in 0..N_FEATURES {
                z[j] = (r[j] - means[j]) / scales[j];
            }
            z
        })
        .collect();

    let mut w = [0.0; N_FEATURES];
    let mut b = 0.0;

    for _ in 0..ITERATIONS {
        let mut grad_w = [0.0; N_FEATURES];
        let mut grad_b = 0.0;

        for (x, y) in xs.iter().zip(&targets) {
            let z = (0..N_FEATURES).fold(b, |acc, j| acc + w[j] * x[j]);
            let err = sigmoid(z) - y;
            for j in 0..N_FEATURES {
                grad_w[j] += err * x[j];
            }
            grad_b += err;
        }

        for j in 0..N_FEATURES {
            w[j] -= LEARNING_RATE * (grad_w[j] / n + L2_PENALTY * w[j]);
        }
        b -= LEARNING_RATE * grad_b / n;
    }

    if !(w.iter().all(|c| c.is_finite()) && b.is_finite()) {
        return Err(training_failure(hazard, "fit produced non-finite coefficients"));
    }

    Ok(FittedParams {
        coefficients: w,
        intercept: b,
        means,
        scales,
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::labels::LabelDeriver;
    use crate::models::SamplePolicy;

    fn sample(rain: f64, soil: f64, temp: f64, ndvi: f64) -> EnvironmentalSample {
        EnvironmentalSample::new(rain, soil, temp, ndvi, SamplePolicy::Reject).unwrap()
    }

    fn grid() -> Vec<EnvironmentalSample> {
        // ---
        let mut out = Vec::new();
        for rain in [0.0, 3.0, 10.0, 20.0, 30.0, 45.0, 60.0, 80.0] {
            for soil in [10.0, 20.0, 35.0, 50.0, 65.0, 80.0, 95.0] {
                for temp in [5.0, 15.0, 25.0, 32.0, 38.0] {
                    out.push(sample(rain, soil, temp, 0.5));
                }
            }
        }
        out
    }

    #[test]
    fn test_untrained_model_has_no_probability() {
        // ---
        let model = HazardModel::untrained(Hazard::Flood);

        assert!(!model.is_ready());
        assert_eq!(model.probability(&sample(50.0, 80.0, 20.0, 0.2)), None);
        assert!(!model.status().ready);
    }

    #[test]
    fn test_fit_flood_orders_wet_above_dry() {
        // ---
        let samples = grid();
        let labels = LabelDeriver::default().derive(Hazard::Flood, &samples);
        let classifier = HazardClassifier::new(Hazard::Flood, DEFAULT_MIN_SAMPLES);

        assert!(classifier.fit(&samples, &labels));

        let model = classifier.current();
        let wet = model.probability(&sample(75.0, 90.0, 20.0, 0.5)).unwrap();
        let dry = model.probability(&sample(1.0, 10.0, 20.0, 0.5)).unwrap();

        assert!(wet > 0.5, "wet probability {wet}");
        assert!(dry < 0.5, "dry probability {dry}");
        assert!((0.0..=1.0).contains(&wet) && (0.0..=1.0).contains(&dry));
    }

    #[test]
    fn test_fit_is_deterministic() {
        // ---
        let samples = grid();
        let labels = LabelDeriver::default().derive(Hazard::Drought, &samples);

        let a = HazardClassifier::new(Hazard::Drought, DEFAULT_MIN_SAMPLES);
        let b = HazardClassifier::new(Hazard::Drought, DEFAULT_MIN_SAMPLES);
        a.fit(&samples, &labels);
        b.fit(&samples, &labels);

        assert_eq!(a.current().params(), b.current().params());
        assert!(a.current().is_ready());
    }

    #[test]
    fn test_single_class_labels_leave_model_untrained() {
        // ---
        let samples = grid();
        let labels = vec![false; samples.len()];
        let classifier = HazardClassifier::new(Hazard::Flood, DEFAULT_MIN_SAMPLES);

        assert!(!classifier.fit(&samples, &labels));
        assert!(!classifier.current().is_ready());
    }

    #[test]
    fn test_too_few_samples_leave_model_untrained() {
        // ---
        let samples = vec![sample(50.0, 80.0, 20.0, 0.2), sample(0.0, 10.0, 20.0, 0.8)];
        let labels = vec![true, false];
        let classifier = HazardClassifier::new(Hazard::Flood, DEFAULT_MIN_SAMPLES);

        assert!(!classifier.fit(&samples, &labels));
    }

    #[test]
    fn test_mismatched_lengths_leave_model_untrained() {
        // ---
        let samples = grid();
        let labels = vec![true, false];
        let classifier = HazardClassifier::new(Hazard::Flood, 2);

        assert!(!classifier.fit(&samples, &labels));
    }

    #[test]
    fn test_failed_refit_replaces_ready_model() {
        // ---
        let samples = grid();
        let labels = LabelDeriver::default().derive(Hazard::Flood, &samples);
        let classifier = HazardClassifier::new(Hazard::Flood, DEFAULT_MIN_SAMPLES);
        assert!(classifier.fit(&samples, &labels));

        let before = classifier.current();
        classifier.fit(&samples, &vec![true; samples.len()]);

        // Held snapshots are unaffected by the swap
        assert!(before.is_ready());
        assert!(!classifier.current().is_ready());
    }

    #[test]
    fn test_constant_feature_does_not_break_fit() {
        // ---
        // Vegetation index is constant across the grid
        let samples = grid();
        let labels = LabelDeriver::default().derive(Hazard::Flood, &samples);
        let model = HazardClassifier::new(Hazard::Flood, DEFAULT_MIN_SAMPLES)
            .build_model(&samples, &labels);

        let params = model.params().unwrap();
        assert_eq!(params.scales[3], 1.0);
        assert_eq!(model.status().training_samples, samples.len());
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        // ---
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(1_000.0) <= 1.0);
        assert!(sigmoid(-1_000.0) >= 0.0);
        assert!(sigmoid(-1_000.0).is_finite());
    }
}
