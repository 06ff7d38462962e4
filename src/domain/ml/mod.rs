pub mod feature_registry;
pub mod feature_vector;
pub mod prediction;

pub use feature_vector::FeatureVector;
pub use prediction::PredictionResult;
