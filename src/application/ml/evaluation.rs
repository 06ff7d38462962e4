use super::gain_predictor::{GainPredictor, PredictionPath};
use crate::domain::ipo::HistoricalIpo;
use rayon::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use statrs::statistics::{Data, Distribution};

/// Error statistics of predicted versus realised listing gains (percent points).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionEvaluation {
    pub count: usize,
    pub failed: usize,
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
    /// Positive when the predictor overestimates on average
    pub mean_error: f64,
    pub error_std_dev: Option<f64>,
}

/// Score the predictor against listed issues.
///
/// Failed predictions are counted but excluded from the error statistics.
/// Returns `None` when no listing could be scored.
pub fn evaluate(predictor: &GainPredictor, listings: &[HistoricalIpo]) -> Option<PredictionEvaluation> {
    let outcomes: Vec<Option<f64>> = listings
        .par_iter()
        .map(|listing| {
            let (result, path) = predictor.predict_with_path(&listing.features());
            if path == PredictionPath::Failed {
                return None;
            }
            let actual = listing.listing_gains_percent.to_f64()?;
            Some(result.predicted_gain - actual)
        })
        .collect();

    let errors: Vec<f64> = outcomes.iter().flatten().copied().collect();
    let failed = outcomes.len() - errors.len();
    if errors.is_empty() {
        return None;
    }

    let mean_error = Data::new(errors.clone()).mean()?;
    let mean_absolute_error = Data::new(errors.iter().map(|e| e.abs()).collect::<Vec<_>>()).mean()?;
    let mean_squared = Data::new(errors.iter().map(|e| e * e).collect::<Vec<_>>()).mean()?;
    let error_std_dev = Data::new(errors.clone()).std_dev();

    Some(PredictionEvaluation {
        count: errors.len(),
        failed,
        mean_absolute_error,
        root_mean_squared_error: mean_squared.sqrt(),
        mean_error,
        error_std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(qib: rust_decimal::Decimal, actual: rust_decimal::Decimal) -> HistoricalIpo {
        HistoricalIpo {
            company_name: format!("Issuer {}", qib),
            issue_price: dec!(100),
            qib_subscription: qib,
            listing_gains_percent: actual,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_listings() {
        assert!(evaluate(&GainPredictor::fallback_only(), &[]).is_none());
    }

    #[test]
    fn test_error_statistics() {
        // fallback gain = qib * 0.3 * 2.5 = 0.75 * qib
        let listings = vec![listing(dec!(20), dec!(10)), listing(dec!(40), dec!(40))];
        let eval = evaluate(&GainPredictor::fallback_only(), &listings).unwrap();

        // errors: 15 - 10 = 5, 30 - 40 = -10
        assert_eq!(eval.count, 2);
        assert_eq!(eval.failed, 0);
        assert!((eval.mean_error - (-2.5)).abs() < 1e-9);
        assert!((eval.mean_absolute_error - 7.5).abs() < 1e-9);
        assert!((eval.root_mean_squared_error - 62.5f64.sqrt()).abs() < 1e-9);
        assert!(eval.error_std_dev.is_some());
    }
}
