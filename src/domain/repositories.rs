//! Repository Pattern Abstractions
//!
//! Storage traits for IPO listings, keeping the listing and ingest services
//! independent of where records live.
//!
//! - `IpoRepository`: upcoming, open, closed and listed issues
//! - `HistoricalIpoRepository`: listed issues with known listing gains
//!
//! Both upsert by company name, which is the identity the report feeds share.
//!
//! # Example
//!
//! ```rust,no_run
//! use ipotrack::domain::repositories::IpoRepository;
//! use ipotrack::infrastructure::InMemoryIpoRepository;
//!
//! # async {
//! let repo = InMemoryIpoRepository::new();
//! // let outcome = repo.upsert(record).await?;
//! // let all = repo.get_all().await?;
//! # };
//! ```

use crate::domain::ipo::{HistoricalIpo, IpoRecord, IpoStatus};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Whether an upsert inserted a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Counts from a bulk upsert run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl SyncSummary {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} skipped",
            self.created, self.updated, self.skipped
        )
    }
}

#[async_trait]
pub trait IpoRepository: Send + Sync {
    /// Insert or replace the record with the same company name
    async fn upsert(&self, record: IpoRecord) -> Result<UpsertOutcome>;

    async fn find_by_company_id(&self, company_id: &str) -> Result<Option<IpoRecord>>;

    async fn find_by_company_name(&self, company_name: &str) -> Result<Option<IpoRecord>>;

    /// All records, ordered by open date (undated last)
    async fn get_all(&self) -> Result<Vec<IpoRecord>>;

    async fn find_by_status(&self, status: IpoStatus) -> Result<Vec<IpoRecord>>;

    async fn count(&self) -> Result<usize>;
}

#[async_trait]
pub trait HistoricalIpoRepository: Send + Sync {
    /// Insert or replace the listing with the same company name
    async fn upsert(&self, listing: HistoricalIpo) -> Result<UpsertOutcome>;

    /// All listings, most recent listing date first
    async fn get_all(&self) -> Result<Vec<HistoricalIpo>>;

    /// Listings whose listing year lies in `from..=to`
    async fn find_by_listing_years(&self, from: i32, to: i32) -> Result<Vec<HistoricalIpo>>;

    /// Distinct listing years, newest first
    async fn listing_years(&self) -> Result<Vec<i32>>;
}
