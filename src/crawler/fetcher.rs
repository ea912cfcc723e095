//! HTTP fetcher implementation
//!
//! This module handles single-shot page fetches, including:
//! - The [`PageFetcher`] seam the crawl engine fetches through
//! - Building HTTP clients with the configured user agent
//! - Reporting the status code of every response, successful or not
//!
//! Retrying lives one layer up, in [`RetryingFetcher`](super::RetryingFetcher).

use crate::config::FetcherConfig;
use crate::CrawlError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Response to a single fetch attempt
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

impl FetchResponse {
    /// Only a plain `200 OK` counts as a successful fetch
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// A single-shot page fetcher
///
/// Implementations return `Ok` for every response that arrives, whatever
/// its status, and `Err` only for transport-level failures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CrawlError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Example
///
/// ```no_run
/// use crawlcraft::config::FetcherConfig;
/// use crawlcraft::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(config.timeout.min(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &FetcherConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, CrawlError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status_code = response.status().as_u16();

        let body = response.text().await.map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchResponse { status_code, body })
    }
}
