use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

/// Report hosts reject requests without a browser user agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware
    ///
    /// Fails rather than falling back to a bare client, which would drop the
    /// user agent the report hosts require.
    pub fn create_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
        // Exponential backoff on transient failures (5xx, timeouts, connection resets)
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(HttpClientFactory::create_client(Duration::from_secs(5), 3).is_ok());
    }

    #[test]
    fn test_user_agent_is_a_valid_header() {
        assert!(HeaderValue::from_str(BROWSER_USER_AGENT).is_ok());
    }
}
