use super::predictor::TrainedModel;
use crate::domain::ml::feature_registry::features_to_f64_vector;
use crate::domain::ml::feature_vector::FeatureVector;
use anyhow::{Context, Result};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor trained offline and serialised with serde_json.
pub struct SmartCoreGainModel {
    model: Forest,
    model_path: PathBuf,
}

impl SmartCoreGainModel {
    pub fn from_forest(model: Forest, model_path: PathBuf) -> Self {
        Self { model, model_path }
    }

    pub fn load(model_path: &Path) -> Result<Self> {
        let file = File::open(model_path)
            .with_context(|| format!("Failed to open model file {:?}", model_path))?;
        let model: Forest = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize model {:?}", model_path))?;

        Ok(Self::from_forest(model, model_path.to_path_buf()))
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl TrainedModel for SmartCoreGainModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, String> {
        let input_vec = features_to_f64_vector(features);
        let input_matrix = match DenseMatrix::from_2d_vec(&vec![input_vec]) {
            Ok(m) => m,
            Err(e) => return Err(format!("Matrix creation failed: {}", e)),
        };

        match self.model.predict(&input_matrix) {
            Ok(predictions) => predictions
                .first()
                .copied()
                .ok_or_else(|| "No prediction returned".to_string()),
            Err(e) => Err(format!("Prediction failed: {}", e)),
        }
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

/// Load the model artifact once at startup.
///
/// A missing or unreadable artifact is not an error for the caller: it is
/// logged and `None` is returned so the predictor runs its fallback formula.
pub fn load_trained_model(model_path: &Path) -> Option<Arc<dyn TrainedModel>> {
    if !model_path.exists() {
        warn!(
            "Gain model file not found at {:?}. Predictor will use the fallback formula.",
            model_path
        );
        return None;
    }

    match SmartCoreGainModel::load(model_path) {
        Ok(model) => {
            info!("Successfully loaded gain model from {:?}", model.model_path());
            Some(Arc::new(model))
        }
        Err(e) => {
            error!("Failed to load gain model: {:#}", e);
            None
        }
    }
}
