//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests that follow redirects, bounded by a per-fetch timeout
//! - Classifying transport failures and non-2xx responses as errors

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for one fetch
pub const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects; links are resolved against it
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Decoded body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use harvest::config::{CrawlerConfig, UserAgentConfig};
/// use harvest::crawler::build_http_client;
///
/// let crawler = CrawlerConfig {
///     workers: 4,
///     limit: 1000,
///     politeness_delay_ms: 100,
///     fetch_timeout_secs: 30,
/// };
/// let client = build_http_client(&UserAgentConfig::default(), &crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format!("{}/{}", user_agent.name, user_agent.version))
        .timeout(Duration::from_secs(crawler.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, following redirects
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | other status | `HarvestError::Status` |
/// | timeout | `HarvestError::Timeout` |
/// | connect, TLS, redirect limit, body decode | `HarvestError::Http` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HarvestError::from_fetch(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response
        .text()
        .await
        .map_err(|e| HarvestError::from_fetch(url, e))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}
