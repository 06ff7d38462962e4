use ipotrack::application::ml::evaluation::evaluate;
use ipotrack::application::ml::{GainPredictor, PredictionPath, TrainedModel};
use ipotrack::domain::ipo::HistoricalIpo;
use ipotrack::domain::ml::{FeatureVector, PredictionResult};
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;

/// Model that echoes the QIB subscription back as the gain.
struct EchoQibModel;

impl TrainedModel for EchoQibModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, String> {
        Ok(features.qib_subscription)
    }

    fn name(&self) -> &str {
        "echo-qib"
    }
}

fn reference_features() -> FeatureVector {
    FeatureVector {
        qib_subscription: 10.0,
        hni_subscription: 5.0,
        retail_subscription: 2.0,
        grey_market_premium: 50.0,
        ..Default::default()
    }
}

#[test]
fn test_fallback_prediction() {
    let predictor = GainPredictor::fallback_only();
    let result = predictor.predict(&reference_features());
    assert_eq!(result.predicted_gain, 60.5);
    assert_eq!(result.confidence, 60.0);
}

#[test]
fn test_model_prediction_uses_model_confidence() {
    let predictor = GainPredictor::new(Some(Arc::new(EchoQibModel)));
    let mut features = reference_features();
    features.qib_subscription = 33.333;

    let (result, path) = predictor.predict_with_path(&features);
    assert_eq!(path, PredictionPath::Model);
    assert_eq!(result.predicted_gain, 33.33);
    assert_eq!(result.confidence, 70.0);
}

#[test]
fn test_payload_with_aliases_and_nulls() {
    let predictor = GainPredictor::fallback_only();
    let payload = json!({
        "qib_subscription": "10",
        "nii_subscription": 5,
        "retail_subscription": 2.0,
        "gmp": " 50 ",
        "issue_size": null,
        "market_sentiment": 21000
    });

    let result = predictor.predict_payload(payload.as_object().unwrap());
    assert_eq!(result.predicted_gain, 60.5);
    assert_eq!(result.confidence, 60.0);
}

#[test]
fn test_malformed_payload_returns_zero() {
    let predictor = GainPredictor::fallback_only();
    for bad in [json!("lots"), json!(true), json!([1, 2]), json!({"x": 1})] {
        let payload = json!({ "qib_subscription": bad, "gmp": 10 });
        let (result, path) = predictor.predict_payload_with_path(payload.as_object().unwrap());
        assert_eq!(path, PredictionPath::Failed);
        assert_eq!(result, PredictionResult::zero());
    }
}

#[test]
fn test_batch_prediction_keeps_order() {
    let predictor = GainPredictor::new(Some(Arc::new(EchoQibModel)));
    let batch: Vec<FeatureVector> = (0..50)
        .map(|i| FeatureVector {
            qib_subscription: i as f64,
            ..Default::default()
        })
        .collect();

    let results = predictor.predict_batch(&batch);
    assert_eq!(results.len(), 50);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.predicted_gain, i as f64);
    }
}

#[test]
fn test_evaluate_against_listings() {
    let predictor = GainPredictor::new(Some(Arc::new(EchoQibModel)));
    let listings = vec![
        HistoricalIpo {
            company_name: "Over Ltd".to_string(),
            qib_subscription: dec!(30),
            listing_gains_percent: dec!(20),
            ..Default::default()
        },
        HistoricalIpo {
            company_name: "Under Ltd".to_string(),
            qib_subscription: dec!(10),
            listing_gains_percent: dec!(20),
            ..Default::default()
        },
    ];

    let evaluation = evaluate(&predictor, &listings).unwrap();
    assert_eq!(evaluation.count, 2);
    assert_eq!(evaluation.failed, 0);
    assert!((evaluation.mean_absolute_error - 10.0).abs() < 1e-9);
    assert!((evaluation.root_mean_squared_error - 10.0).abs() < 1e-9);
    assert!(evaluation.mean_error.abs() < 1e-9);
}

#[test]
fn test_evaluate_empty() {
    assert!(evaluate(&GainPredictor::fallback_only(), &[]).is_none());
}
