//! IPO listings as tracked by the system.
//!
//! `IpoRecord` covers upcoming, open, closed and listed issues. `HistoricalIpo`
//! is a listed issue whose listing price (and therefore listing gain) is known.

use super::ml::feature_vector::{DEFAULT_MARKET_SENTIMENT, FeatureVector};
use super::ml::prediction::PredictionResult;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpoStatus {
    #[default]
    Upcoming,
    Open,
    Closed,
    Listed,
}

impl fmt::Display for IpoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpoStatus::Upcoming => write!(f, "upcoming"),
            IpoStatus::Open => write!(f, "open"),
            IpoStatus::Closed => write!(f, "closed"),
            IpoStatus::Listed => write!(f, "listed"),
        }
    }
}

impl FromStr for IpoStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(IpoStatus::Upcoming),
            "open" => Ok(IpoStatus::Open),
            "closed" => Ok(IpoStatus::Closed),
            "listed" => Ok(IpoStatus::Listed),
            _ => anyhow::bail!(
                "Invalid IPO status: {}. Must be 'upcoming', 'open', 'closed' or 'listed'",
                s
            ),
        }
    }
}

/// Listing gain of an issue, in rupees per share and in percent of issue price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingGain {
    pub rs: Decimal,
    pub percent: Decimal,
}

impl ListingGain {
    /// `None` when the issue price is zero or the gain does not fit a `Decimal`.
    pub fn compute(issue_price: Decimal, listing_price: Decimal) -> Option<Self> {
        if issue_price.is_zero() {
            return None;
        }
        let rs = listing_price.checked_sub(issue_price)?;
        let percent = rs
            .checked_div(issue_price)?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp(2);
        Some(Self { rs, percent })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IpoRecord {
    pub company_id: String,
    pub company_name: String,
    pub company_logo_url: String,
    pub issue_type: String,
    pub company_url_name: String,

    pub open_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub listing_date: Option<NaiveDate>,

    pub issue_price: Option<Decimal>,
    /// In crores
    pub issue_size: Option<Decimal>,
    pub listing_price: Option<Decimal>,
    pub lot_size: Option<u32>,

    pub qib_subscription: Decimal,
    pub nii_subscription: Decimal,
    pub retail_subscription: Decimal,
    pub total_subscription: Decimal,
    pub grey_market_premium: Option<Decimal>,

    pub listing_gains_rs: Option<Decimal>,
    pub listing_gains_percent: Option<Decimal>,
    pub sector: Option<String>,
    pub lead_manager: String,
    pub registrar: String,

    /// In crores
    pub revenue: Option<Decimal>,
    /// In crores
    pub profit: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,

    pub predicted_gain: Option<Decimal>,
    pub prediction_confidence: Option<Decimal>,

    pub status: IpoStatus,
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

impl IpoRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Days from `today` until the issue opens; negative once it has opened.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.open_date.map(|open| (open - today).num_days())
    }

    /// Predictor inputs for this record. NII stands in for HNI; missing size,
    /// price and premium count as zero.
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            qib_subscription: decimal_to_f64(self.qib_subscription),
            hni_subscription: decimal_to_f64(self.nii_subscription),
            retail_subscription: decimal_to_f64(self.retail_subscription),
            issue_size: self.issue_size.map(decimal_to_f64).unwrap_or(0.0),
            issue_price: self.issue_price.map(decimal_to_f64).unwrap_or(0.0),
            grey_market_premium: self.grey_market_premium.map(decimal_to_f64).unwrap_or(0.0),
            market_sentiment: DEFAULT_MARKET_SENTIMENT,
        }
    }

    pub fn apply_prediction(&mut self, prediction: &PredictionResult) {
        self.predicted_gain = Decimal::from_f64(prediction.predicted_gain).map(|d| d.round_dp(2));
        self.prediction_confidence =
            Decimal::from_f64(prediction.confidence).map(|d| d.round_dp(2));
    }

    /// Closed-IPO view of a listed issue. Profit and P/E stay unset.
    pub fn from_historical(hist: &HistoricalIpo) -> Self {
        Self {
            company_id: hist.company_id.clone(),
            company_name: hist.company_name.clone(),
            company_logo_url: hist.company_logo_url.clone(),
            issue_type: hist.issue_type.clone(),
            company_url_name: hist.company_url_name.clone(),
            open_date: hist.open_date,
            listing_date: hist.listing_date,
            issue_price: Some(hist.issue_price),
            issue_size: Some(hist.issue_size),
            listing_price: Some(hist.listing_price),
            qib_subscription: hist.qib_subscription,
            nii_subscription: hist.nii_subscription,
            retail_subscription: hist.retail_subscription,
            total_subscription: hist.total_subscription,
            listing_gains_rs: Some(hist.listing_gains_rs),
            listing_gains_percent: Some(hist.listing_gains_percent),
            profit: None,
            pe_ratio: None,
            status: IpoStatus::Closed,
            ..Default::default()
        }
    }
}

impl fmt::Display for IpoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.company_name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalIpo {
    pub company_id: String,
    pub company_name: String,
    pub company_logo_url: String,
    pub issue_type: String,
    pub company_url_name: String,

    pub open_date: Option<NaiveDate>,
    pub listing_date: Option<NaiveDate>,

    /// In crores
    pub issue_size: Decimal,
    pub issue_price: Decimal,
    pub listing_price: Decimal,

    pub qib_subscription: Decimal,
    pub nii_subscription: Decimal,
    pub retail_subscription: Decimal,
    pub total_subscription: Decimal,

    pub listing_gains_rs: Decimal,
    pub listing_gains_percent: Decimal,
}

impl HistoricalIpo {
    pub fn listing_year(&self) -> Option<i32> {
        self.listing_date.map(|d| d.year())
    }

    pub fn features(&self) -> FeatureVector {
        IpoRecord::from_historical(self).features()
    }
}

impl fmt::Display for HistoricalIpo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}%", self.company_name, self.listing_gains_percent)
    }
}
