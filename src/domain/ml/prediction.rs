use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Confidence reported when a trained model produced the gain.
pub const MODEL_CONFIDENCE: f64 = 70.0;
/// Confidence reported for the linear fallback.
pub const FALLBACK_CONFIDENCE: f64 = 60.0;

/// Predicted listing gain (percent, 2 dp) and confidence in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_gain: f64,
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(predicted_gain: f64, confidence: f64) -> Self {
        Self {
            predicted_gain: round2(predicted_gain),
            confidence: confidence.clamp(0.0, 100.0),
        }
    }

    /// Result returned whenever a prediction could not be computed.
    pub fn zero() -> Self {
        Self {
            predicted_gain: 0.0,
            confidence: 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.predicted_gain == 0.0 && self.confidence == 0.0
    }
}

/// Round to two decimal places, half to even, on the exact binary value.
///
/// `12.345` is stored slightly above the midpoint and rounds up; `0.125` is an
/// exact midpoint and rounds to `0.12`. Values outside the `Decimal` range have
/// no fractional digits left and are returned unchanged, as are NaN and
/// infinities.
pub fn round2(value: f64) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
            // scale is at most 2 here, so this is a single correctly rounded division
            rounded.mantissa() as f64 / 10f64.powi(rounded.scale() as i32)
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(58.0), 58.0);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(-7.456), -7.46);
    }

    #[test]
    fn test_round2_midpoints_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(1.125), 1.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn test_round2_uses_stored_value() {
        // 12.345 is stored just above the midpoint, 2.675 just below
        assert_eq!(round2(12.345), 12.35);
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_round2_passes_through_out_of_range() {
        assert_eq!(round2(1e300), 1e300);
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_new_rounds_and_clamps() {
        let result = PredictionResult::new(10.126, 140.0);
        assert_eq!(result.predicted_gain, 10.13);
        assert_eq!(result.confidence, 100.0);
    }

    #[test]
    fn test_zero() {
        assert!(PredictionResult::zero().is_zero());
        assert!(!PredictionResult::new(0.0, FALLBACK_CONFIDENCE).is_zero());
    }
}
