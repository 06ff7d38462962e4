use crate::domain::ports::{IpoReportSource, ReportRow};
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const UPCOMING_REPORT_ID: u32 = 118;
const HISTORICAL_REPORT_ID: u32 = 98;

#[derive(Debug, Deserialize)]
struct ReportResponse {
    #[serde(rename = "reportTableData", default)]
    report_table_data: Vec<ReportRow>,
}

/// Report API client for chittorgarh.com
pub struct ChittorgarhReportClient {
    client: ClientWithMiddleware,
    base_url: Url,
    api_version: String,
}

impl ChittorgarhReportClient {
    pub fn new(
        base_url: &str,
        api_version: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid report base URL: {}", base_url))?;
        Ok(Self {
            client: HttpClientFactory::create_client(timeout, max_retries)?,
            base_url,
            api_version: api_version.into(),
        })
    }

    fn report_url(&self, report_id: u32, year: i32, financial_years: &str) -> Result<Url> {
        let path = format!(
            "cloud/report/data-read/{}/1/10/{}/{}/0/all/0",
            report_id, year, financial_years
        );
        let mut url = self
            .base_url
            .join(&path)
            .with_context(|| format!("Failed to build report URL for {}", path))?;
        url.query_pairs_mut()
            .append_pair("search", "")
            .append_pair("v", &self.api_version);
        Ok(url)
    }

    pub fn upcoming_report_url(&self, year: i32) -> Result<Url> {
        let next = year + 1;
        self.report_url(UPCOMING_REPORT_ID, year, &format!("{}-{}", next, next))
    }

    pub fn historical_report_url(&self, year: i32) -> Result<Url> {
        self.report_url(HISTORICAL_REPORT_ID, year, &format!("{}-{}", year, year + 1))
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<ReportRow>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Failed to send report request to {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Report API returned status: {} for {}", response.status(), url);
        }

        let body: ReportResponse = response
            .json()
            .await
            .context("Failed to parse report response")?;

        Ok(body.report_table_data)
    }
}

#[async_trait]
impl IpoReportSource for ChittorgarhReportClient {
    async fn fetch_upcoming_rows(&self, year: i32) -> Result<Vec<ReportRow>> {
        info!("Fetching upcoming IPO report for {}...", year);
        let rows = self.fetch_rows(self.upcoming_report_url(year)?).await?;
        info!("Upcoming report returned {} rows", rows.len());
        Ok(rows)
    }

    async fn fetch_historical_rows(&self, year: i32) -> Result<Vec<ReportRow>> {
        info!("Fetching historical IPO report for {}...", year);
        let rows = self.fetch_rows(self.historical_report_url(year)?).await?;
        info!("Historical report for {} returned {} rows", year, rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ChittorgarhReportClient {
        ChittorgarhReportClient::new(
            "https://webnodejs.chittorgarh.com",
            "02-39",
            Duration::from_secs(5),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_upcoming_report_url() {
        let url = client().upcoming_report_url(2025).unwrap();
        assert_eq!(
            url.as_str(),
            "https://webnodejs.chittorgarh.com/cloud/report/data-read/118/1/10/2025/2026-2026/0/all/0?search=&v=02-39"
        );
    }

    #[test]
    fn test_historical_report_url() {
        let url = client().historical_report_url(2024).unwrap();
        assert_eq!(
            url.as_str(),
            "https://webnodejs.chittorgarh.com/cloud/report/data-read/98/1/10/2024/2024-2025/0/all/0?search=&v=02-39"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(
            ChittorgarhReportClient::new("not a url", "1", Duration::from_secs(1), 0).is_err()
        );
    }

    #[test]
    fn test_response_shape() {
        let body = r#"{"reportTableData":[{"Company":"Acme"}],"title":"x"}"#;
        let parsed: ReportResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.report_table_data.len(), 1);

        let empty: ReportResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.report_table_data.is_empty());
    }
}
