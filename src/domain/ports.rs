use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One row of a third-party IPO report, keyed by column header.
pub type ReportRow = Map<String, Value>;

/// Source of IPO report tables.
#[async_trait]
pub trait IpoReportSource: Send + Sync {
    /// Current-year mainboard report (upcoming and recently opened issues)
    async fn fetch_upcoming_rows(&self, year: i32) -> Result<Vec<ReportRow>>;

    /// Listed issues for one financial year starting in `year`
    async fn fetch_historical_rows(&self, year: i32) -> Result<Vec<ReportRow>>;
}
