pub mod evaluation;
pub mod gain_predictor;
pub mod predictor;
pub mod smartcore_predictor;

pub use gain_predictor::{GainPredictor, PredictionPath};
pub use predictor::TrainedModel;
