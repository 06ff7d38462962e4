use super::feature_vector::{DEFAULT_MARKET_SENTIMENT, FeatureVector};
use crate::domain::errors::PredictionError;
use serde_json::{Map, Value};

/// Ordered list of feature names.
/// This order MUST match the column order the regression model was trained on.
/// Any change here is a breaking change for saved models.
pub const FEATURE_NAMES: &[&str] = &[
    "qib_subscription",
    "hni_subscription",
    "retail_subscription",
    "issue_size",
    "issue_price",
    "grey_market_premium",
    "market_sentiment",
];

/// Alternate payload keys accepted for a feature, checked after the canonical name.
fn aliases(name: &str) -> &'static [&'static str] {
    match name {
        "hni_subscription" => &["nii_subscription"],
        "grey_market_premium" => &["gmp"],
        _ => &[],
    }
}

fn default_for(name: &str) -> f64 {
    if name == "market_sentiment" {
        DEFAULT_MARKET_SENTIMENT
    } else {
        0.0
    }
}

/// Converts features into the model's f64 input row, in `FEATURE_NAMES` order.
pub fn features_to_f64_vector(fv: &FeatureVector) -> Vec<f64> {
    vec![
        fv.qib_subscription,
        fv.hni_subscription,
        fv.retail_subscription,
        fv.issue_size,
        fv.issue_price,
        fv.grey_market_premium,
        fv.market_sentiment,
    ]
}

/// Coerce one untyped payload value into a feature.
///
/// `null` means "not supplied" and takes the default. Numbers pass through,
/// strings are parsed after trimming. Anything else is non-numeric.
pub fn coerce_feature(field: &str, value: &Value) -> Result<f64, PredictionError> {
    let non_numeric = || PredictionError::NonNumericFeature {
        field: field.to_string(),
        value: value.to_string(),
    };

    let parsed = match value {
        Value::Null => return Ok(default_for(field)),
        Value::Number(n) => n.as_f64().ok_or_else(non_numeric)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| non_numeric())?,
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => return Err(non_numeric()),
    };

    if !parsed.is_finite() {
        return Err(non_numeric());
    }
    Ok(parsed)
}

/// Map an untyped request payload into a `FeatureVector`.
///
/// Missing keys default to 0 (19500 for `market_sentiment`); values that cannot
/// be coerced surface as `PredictionError::NonNumericFeature`.
pub fn features_from_payload(payload: &Map<String, Value>) -> Result<FeatureVector, PredictionError> {
    let mut values = [0.0; 7];

    for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
        let raw = std::iter::once(*name)
            .chain(aliases(name).iter().copied())
            .find_map(|key| payload.get(key));

        *slot = match raw {
            Some(value) => coerce_feature(name, value)?,
            None => default_for(name),
        };
    }

    let [
        qib_subscription,
        hni_subscription,
        retail_subscription,
        issue_size,
        issue_price,
        grey_market_premium,
        market_sentiment,
    ] = values;

    Ok(FeatureVector {
        qib_subscription,
        hni_subscription,
        retail_subscription,
        issue_size,
        issue_price,
        grey_market_premium,
        market_sentiment,
    })
}
