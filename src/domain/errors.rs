use thiserror::Error;

/// Errors raised while turning inputs into a listing-gain prediction.
///
/// None of these reach the caller of `GainPredictor::predict`, which maps every
/// variant to the zero result. They stay visible through `try_predict`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Feature {field} is not numeric: {value}")]
    NonNumericFeature { field: String, value: String },

    #[error("Feature {field} is not finite: {value}")]
    NonFiniteFeature { field: &'static str, value: f64 },

    #[error("Model {model} failed: {reason}")]
    ModelFailure { model: String, reason: String },

    /// `model` names the trained model, or the fallback formula.
    #[error("Prediction from {model} is not finite")]
    NonFiniteOutput { model: String },
}

/// Errors related to third-party report rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Missing field '{field}' for {company}")]
    MissingField { company: String, field: String },

    #[error("Invalid date '{value}' in '{field}' for {company}")]
    InvalidDate {
        company: String,
        field: String,
        value: String,
    },

    #[error("Invalid number '{value}' in '{field}' for {company}")]
    InvalidNumber {
        company: String,
        field: String,
        value: String,
    },

    #[error("Zero issue price for {company}")]
    ZeroIssuePrice { company: String },

    #[error("Listing gain for {company} is out of range (issue {issue_price}, listing {listing_price})")]
    ListingGainOutOfRange {
        company: String,
        issue_price: String,
        listing_price: String,
    },
}

/// Errors related to sector taxonomy construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("Taxonomy has no sectors")]
    Empty,

    #[error("Sector '{sector}' has no keywords")]
    NoKeywords { sector: String },

    #[error("Sector '{sector}' is declared twice")]
    DuplicateSector { sector: String },

    #[error("Failed to parse taxonomy: {reason}")]
    Parse { reason: String },
}
