//! Bounded retry around a single-shot fetcher
//!
//! Every non-200 response and every transport error costs one attempt.
//! Failures are not classified: a 404 is retried exactly like a timeout.

use crate::config::FetcherConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::CrawlError;
use std::time::Duration;

/// How many times to try a URL and how long to pause between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per URL, including the first
    pub max_attempts: u32,

    /// Pause after a failed attempt before the next one
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_attempts: config.retry_count,
            retry_delay: config.retry_delay(),
        }
    }
}

/// Wraps a [`PageFetcher`] with bounded, fixed-delay retry
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: PageFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Fetches `url`, retrying until a `200` arrives or attempts run out
    ///
    /// There is no pause after the final attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body of the first successful response
    /// * `Err(CrawlError::FetchFailed)` - Every attempt failed
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.inner.fetch(url).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => tracing::debug!(
                    "Attempt {}/{} for {} returned HTTP {}",
                    attempt,
                    attempts,
                    url,
                    response.status_code
                ),
                Err(e) => tracing::debug!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, e),
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        Err(CrawlError::FetchFailed {
            url: url.to_string(),
            attempts,
        })
    }
}
