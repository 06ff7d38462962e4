use serde::{Deserialize, Serialize};

/// Market sentiment index assumed when a request does not carry one.
pub const DEFAULT_MARKET_SENTIMENT: f64 = 19500.0;

/// Inputs to the listing-gain predictor.
///
/// Subscription figures are oversubscription ratios (times), issue size is in
/// crores, issue price and grey-market premium are in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub qib_subscription: f64,
    pub hni_subscription: f64,
    pub retail_subscription: f64,
    pub issue_size: f64,
    pub issue_price: f64,
    pub grey_market_premium: f64,
    pub market_sentiment: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            qib_subscription: 0.0,
            hni_subscription: 0.0,
            retail_subscription: 0.0,
            issue_size: 0.0,
            issue_price: 0.0,
            grey_market_premium: 0.0,
            market_sentiment: DEFAULT_MARKET_SENTIMENT,
        }
    }
}
