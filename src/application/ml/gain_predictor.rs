//! Listing-gain prediction.
//!
//! With a trained model the gain comes from the model and carries a fixed 70%
//! confidence. Without one, a linear blend of subscription ratios and the
//! grey-market premium is used at 60% confidence. Issue size, issue price and
//! market sentiment only ever reach the trained model.

use super::predictor::TrainedModel;
use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::features_from_payload;
use crate::domain::ml::feature_vector::FeatureVector;
use crate::domain::ml::prediction::{FALLBACK_CONFIDENCE, MODEL_CONFIDENCE, PredictionResult};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

const QIB_WEIGHT: f64 = 0.3;
const HNI_WEIGHT: f64 = 0.2;
const RETAIL_WEIGHT: f64 = 0.1;
const GMP_WEIGHT: f64 = 0.4;
const FALLBACK_SCALE: f64 = 2.5;

/// Which branch produced (or failed to produce) a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionPath {
    Model,
    Fallback,
    Failed,
}

impl PredictionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionPath::Model => "model",
            PredictionPath::Fallback => "fallback",
            PredictionPath::Failed => "failed",
        }
    }
}

/// Unrounded fallback gain.
pub fn fallback_gain(features: &FeatureVector) -> f64 {
    let raw = features.qib_subscription * QIB_WEIGHT
        + features.hni_subscription * HNI_WEIGHT
        + features.retail_subscription * RETAIL_WEIGHT
        + features.grey_market_premium * GMP_WEIGHT;
    raw * FALLBACK_SCALE
}

fn check_finite(features: &FeatureVector) -> Result<(), PredictionError> {
    let fields = [
        ("qib_subscription", features.qib_subscription),
        ("hni_subscription", features.hni_subscription),
        ("retail_subscription", features.retail_subscription),
        ("issue_size", features.issue_size),
        ("issue_price", features.issue_price),
        ("grey_market_premium", features.grey_market_premium),
        ("market_sentiment", features.market_sentiment),
    ];

    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some((field, value)) => Err(PredictionError::NonFiniteFeature {
            field: *field,
            value: *value,
        }),
        None => Ok(()),
    }
}

/// Label carried by errors raised on the fallback branch.
pub const FALLBACK_NAME: &str = "fallback formula";

/// Typed prediction against an optional model.
///
/// Both branches must produce a finite gain after rounding; huge but finite
/// inputs can still overflow the fallback blend.
pub fn try_predict(
    features: &FeatureVector,
    model: Option<&dyn TrainedModel>,
) -> Result<PredictionResult, PredictionError> {
    check_finite(features)?;

    let (result, source) = match model {
        None => (
            PredictionResult::new(fallback_gain(features), FALLBACK_CONFIDENCE),
            FALLBACK_NAME,
        ),
        Some(model) => {
            let gain = model
                .predict(features)
                .map_err(|reason| PredictionError::ModelFailure {
                    model: model.name().to_string(),
                    reason,
                })?;
            (PredictionResult::new(gain, MODEL_CONFIDENCE), model.name())
        }
    };

    if !result.predicted_gain.is_finite() {
        return Err(PredictionError::NonFiniteOutput {
            model: source.to_string(),
        });
    }

    Ok(result)
}

/// Best-effort prediction: every failure resolves to `PredictionResult::zero()`.
pub fn predict(features: &FeatureVector, model: Option<&dyn TrainedModel>) -> PredictionResult {
    match try_predict(features, model) {
        Ok(result) => result,
        Err(e) => {
            warn!("Prediction failed, returning zero result: {}", e);
            PredictionResult::zero()
        }
    }
}

/// Predictor holding the process-wide, read-only model handle.
#[derive(Clone, Default)]
pub struct GainPredictor {
    model: Option<Arc<dyn TrainedModel>>,
}

impl fmt::Debug for GainPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GainPredictor")
            .field("model", &self.model_name())
            .finish()
    }
}

impl GainPredictor {
    pub fn new(model: Option<Arc<dyn TrainedModel>>) -> Self {
        Self { model }
    }

    /// Predictor that always uses the fallback formula.
    pub fn fallback_only() -> Self {
        Self { model: None }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    pub fn try_predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictionError> {
        try_predict(features, self.model.as_deref())
    }

    pub fn predict(&self, features: &FeatureVector) -> PredictionResult {
        self.predict_with_path(features).0
    }

    /// Prediction plus the branch that produced it.
    pub fn predict_with_path(&self, features: &FeatureVector) -> (PredictionResult, PredictionPath) {
        match self.try_predict(features) {
            Ok(result) => {
                let path = if self.has_model() {
                    PredictionPath::Model
                } else {
                    PredictionPath::Fallback
                };
                debug!(
                    "Predicted gain {:.2}% ({}, confidence {})",
                    result.predicted_gain,
                    path.as_str(),
                    result.confidence
                );
                (result, path)
            }
            Err(e) => {
                warn!("Prediction failed, returning zero result: {}", e);
                (PredictionResult::zero(), PredictionPath::Failed)
            }
        }
    }

    /// Parse an untyped request payload and predict. Coercion failures yield zero.
    pub fn predict_payload(&self, payload: &Map<String, Value>) -> PredictionResult {
        self.predict_payload_with_path(payload).0
    }

    pub fn predict_payload_with_path(
        &self,
        payload: &Map<String, Value>,
    ) -> (PredictionResult, PredictionPath) {
        match features_from_payload(payload) {
            Ok(features) => self.predict_with_path(&features),
            Err(e) => {
                warn!("Rejected prediction payload: {}", e);
                (PredictionResult::zero(), PredictionPath::Failed)
            }
        }
    }

    /// Predict many feature vectors in parallel; output order matches input.
    pub fn predict_batch(&self, batch: &[FeatureVector]) -> Vec<PredictionResult> {
        batch.par_iter().map(|fv| self.predict(fv)).collect()
    }
}
