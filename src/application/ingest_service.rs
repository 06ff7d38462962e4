use crate::domain::ipo::IpoRecord;
use crate::domain::ports::IpoReportSource;
use crate::domain::repositories::{
    HistoricalIpoRepository, IpoRepository, SyncSummary, UpsertOutcome,
};
use crate::infrastructure::chittorgarh::report::{
    parse_historical_row, parse_upcoming_row, row_company,
};
use crate::infrastructure::observability::Metrics;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{error, info, warn};

const UPCOMING_REPORT: &str = "upcoming";
const HISTORICAL_REPORT: &str = "historical";

/// Pulls report rows from an `IpoReportSource` into the repositories.
///
/// A row that fails to map is logged and skipped; it never aborts the run.
pub struct IngestService {
    source: Arc<dyn IpoReportSource>,
    ipos: Arc<dyn IpoRepository>,
    historical: Arc<dyn HistoricalIpoRepository>,
    metrics: Metrics,
}

/// Refresh the report-owned fields of a stored record, keeping everything the
/// report does not carry (sector, subscriptions, prediction).
fn merge_report_fields(mut existing: IpoRecord, fresh: IpoRecord) -> IpoRecord {
    existing.company_id = fresh.company_id;
    existing.company_logo_url = fresh.company_logo_url;
    existing.issue_type = fresh.issue_type;
    existing.company_url_name = fresh.company_url_name;
    existing.open_date = fresh.open_date;
    existing.close_date = fresh.close_date;
    existing.status = fresh.status;
    existing
}

fn outcome_label(outcome: UpsertOutcome) -> &'static str {
    match outcome {
        UpsertOutcome::Created => "created",
        UpsertOutcome::Updated => "updated",
    }
}

impl IngestService {
    pub fn new(
        source: Arc<dyn IpoReportSource>,
        ipos: Arc<dyn IpoRepository>,
        historical: Arc<dyn HistoricalIpoRepository>,
        metrics: Metrics,
    ) -> Self {
        Self {
            source,
            ipos,
            historical,
            metrics,
        }
    }

    /// Store issues from the current year's upcoming report that open on or
    /// after `today`.
    pub async fn sync_upcoming(&self, today: NaiveDate) -> Result<SyncSummary> {
        let rows = self
            .source
            .fetch_upcoming_rows(today.year())
            .await
            .context("Failed to fetch upcoming IPO report")?;

        let mut summary = SyncSummary::default();
        for row in &rows {
            let record = match parse_upcoming_row(row, today) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    self.metrics.inc_ingest_rows(UPCOMING_REPORT, "filtered");
                    continue;
                }
                Err(e) => {
                    warn!("Skipping upcoming row for {}: {}", row_company(row), e);
                    self.metrics.inc_ingest_rows(UPCOMING_REPORT, "skipped");
                    summary.skip();
                    continue;
                }
            };

            let record = match self.ipos.find_by_company_name(&record.company_name).await? {
                Some(existing) => merge_report_fields(existing, record),
                None => record,
            };

            let outcome = self.ipos.upsert(record).await?;
            summary.record(outcome);
            self.metrics
                .inc_ingest_rows(UPCOMING_REPORT, outcome_label(outcome));
        }

        info!("Upcoming IPO sync finished: {}", summary);
        Ok(summary)
    }

    /// Store listed issues from the historical reports for `from..=to`.
    ///
    /// A year whose report cannot be fetched is logged and the run moves on to
    /// the next year.
    pub async fn sync_historical(&self, from: i32, to: i32) -> Result<SyncSummary> {
        if from > to {
            anyhow::bail!("Invalid year range: {} is after {}", from, to);
        }

        let mut summary = SyncSummary::default();
        for year in from..=to {
            let rows = match self.source.fetch_historical_rows(year).await {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Failed to fetch historical IPO report for {}: {:#}", year, e);
                    continue;
                }
            };

            for row in &rows {
                match parse_historical_row(row) {
                    Ok(listing) => {
                        let outcome = self.historical.upsert(listing).await?;
                        summary.record(outcome);
                        self.metrics
                            .inc_ingest_rows(HISTORICAL_REPORT, outcome_label(outcome));
                    }
                    Err(e) => {
                        warn!("Skipping historical row for {}: {}", row_company(row), e);
                        self.metrics.inc_ingest_rows(HISTORICAL_REPORT, "skipped");
                        summary.skip();
                    }
                }
            }
        }

        info!("Historical IPO sync {}-{} finished: {}", from, to, summary);
        Ok(summary)
    }
}
