//! Report API configuration parsing from environment variables.
//!
//! Covers the Chittorgarh endpoint, the historical year window and the HTTP
//! client's timeout and retry budget.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_REPORT_BASE_URL: &str = "https://webnodejs.chittorgarh.com";
pub const DEFAULT_REPORT_API_VERSION: &str = "02-39";

#[derive(Debug, Clone)]
pub struct ReportEnvConfig {
    pub base_url: String,
    pub api_version: String,
    pub history_from: i32,
    pub history_to: i32,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
}

/// Parse an inclusive `YYYY-YYYY` range, or a single `YYYY`.
pub fn parse_year_range(text: &str) -> Result<(i32, i32)> {
    let text = text.trim();
    let (from, to) = match text.split_once('-') {
        Some((from, to)) => (from.trim(), to.trim()),
        None => (text, text),
    };
    let from = from
        .parse::<i32>()
        .with_context(|| format!("Invalid start year in range: {}", text))?;
    let to = to
        .parse::<i32>()
        .with_context(|| format!("Invalid end year in range: {}", text))?;
    if from > to {
        anyhow::bail!("Invalid year range {}: start is after end", text);
    }
    Ok((from, to))
}

impl ReportEnvConfig {
    pub fn from_env() -> Result<Self> {
        let years = env::var("HISTORY_YEARS").unwrap_or_else(|_| "2024-2025".to_string());
        let (history_from, history_to) =
            parse_year_range(&years).context("Failed to parse HISTORY_YEARS")?;

        Ok(Self {
            base_url: env::var("REPORT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REPORT_BASE_URL.to_string()),
            api_version: env::var("REPORT_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_REPORT_API_VERSION.to_string()),
            history_from,
            history_to,
            http_timeout_secs: Self::parse_u64("HTTP_TIMEOUT_SECS", 30)?,
            http_max_retries: Self::parse_u32("HTTP_MAX_RETRIES", 3)?,
        })
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_u32(key: &str, default: u32) -> Result<u32> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u32>()
            .context(format!("Failed to parse {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_range() {
        assert_eq!(parse_year_range("2024-2025").unwrap(), (2024, 2025));
        assert_eq!(parse_year_range(" 2023 - 2023 ").unwrap(), (2023, 2023));
        assert_eq!(parse_year_range("2022").unwrap(), (2022, 2022));
    }

    #[test]
    fn test_parse_year_range_rejects_garbage() {
        assert!(parse_year_range("2025-2024").is_err());
        assert!(parse_year_range("last-year").is_err());
        assert!(parse_year_range("").is_err());
    }
}
