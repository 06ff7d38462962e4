//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the repository traits defined in
//! `domain::repositories`, backed by `Arc<RwLock>`.
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - No persistence across multiple instances

use crate::domain::ipo::{HistoricalIpo, IpoRecord, IpoStatus};
use crate::domain::repositories::{HistoricalIpoRepository, IpoRepository, UpsertOutcome};
use anyhow::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ascending by open date, undated records last
fn by_open_date(a: &IpoRecord, b: &IpoRecord) -> Ordering {
    match (a.open_date, b.open_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// In-memory implementation of IpoRepository
#[derive(Clone, Default)]
pub struct InMemoryIpoRepository {
    records: Arc<RwLock<Vec<IpoRecord>>>,
}

impl InMemoryIpoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IpoRepository for InMemoryIpoRepository {
    async fn upsert(&self, record: IpoRecord) -> Result<UpsertOutcome> {
        let mut records = self.records.write().await;
        match records
            .iter()
            .position(|r| r.company_name == record.company_name)
        {
            Some(idx) => {
                records[idx] = record;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                records.push(record);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn find_by_company_id(&self, company_id: &str) -> Result<Option<IpoRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.company_id == company_id).cloned())
    }

    async fn find_by_company_name(&self, company_name: &str) -> Result<Option<IpoRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.company_name == company_name)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<IpoRecord>> {
        let mut all = self.records.read().await.clone();
        all.sort_by(by_open_date);
        Ok(all)
    }

    async fn find_by_status(&self, status: IpoStatus) -> Result<Vec<IpoRecord>> {
        let mut matching: Vec<IpoRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by(by_open_date);
        Ok(matching)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

/// In-memory implementation of HistoricalIpoRepository
#[derive(Clone, Default)]
pub struct InMemoryHistoricalIpoRepository {
    listings: Arc<RwLock<Vec<HistoricalIpo>>>,
}

impl InMemoryHistoricalIpoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoricalIpoRepository for InMemoryHistoricalIpoRepository {
    async fn upsert(&self, listing: HistoricalIpo) -> Result<UpsertOutcome> {
        let mut listings = self.listings.write().await;
        match listings
            .iter()
            .position(|l| l.company_name == listing.company_name)
        {
            Some(idx) => {
                listings[idx] = listing;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                listings.push(listing);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<HistoricalIpo>> {
        let mut all = self.listings.read().await.clone();
        // newest listing first, undated last
        all.sort_by(|a, b| b.listing_date.cmp(&a.listing_date));
        Ok(all)
    }

    async fn find_by_listing_years(&self, from: i32, to: i32) -> Result<Vec<HistoricalIpo>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|l| l.listing_year().is_some_and(|y| (from..=to).contains(&y)))
            .collect())
    }

    async fn listing_years(&self) -> Result<Vec<i32>> {
        let mut years: Vec<i32> = self
            .listings
            .read()
            .await
            .iter()
            .filter_map(|l| l.listing_year())
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }
}
