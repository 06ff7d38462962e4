use crate::domain::ml::feature_vector::FeatureVector;

/// Interface for trained listing-gain regressors
pub trait TrainedModel: Send + Sync {
    /// Predicted listing gain in percent
    fn predict(&self, features: &FeatureVector) -> Result<f64, String>;

    /// Get model name/type
    fn name(&self) -> &str;
}
