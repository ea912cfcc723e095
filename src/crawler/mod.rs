//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and link extraction
//! - The URL frontier and request rate limiting
//! - The crawl engine that drives the whole loop

mod engine;
mod fetcher;
mod frontier;
mod parser;
mod rate_limiter;
mod retry;

pub use engine::{CrawlEngine, CrawlStats, EngineState};
pub use fetcher::{build_http_client, FetchResponse, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_html, ExtractedPage};
pub use rate_limiter::RateLimiter;
pub use retry::{RetryPolicy, RetryingFetcher};

use crate::config::{validate, Config};
use crate::storage::open_sink;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and open the configured record sink
/// 2. Build the HTTP client and wrap it with the retry policy
/// 3. Seed the frontier and run the crawl engine to completion
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, recorded by run-tracking sinks
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed successfully
/// * `Err(CrawlError::Config)` - The configuration is invalid; nothing was fetched
/// * `Err(CrawlError)` - Crawl could not start, or a record could not be stored
///
/// # Example
///
/// ```no_run
/// use crawlcraft::config::load_config_with_hash;
/// use crawlcraft::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("crawl.toml"))?;
/// let stats = crawl(&config, &hash).await?;
/// println!("{} pages stored", stats.pages_stored);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, config_hash: &str) -> Result<CrawlStats, CrawlError> {
    validate(config)?;

    let sink = open_sink(&config.output, &config.crawler.seed_url, config_hash)?;
    let fetcher = RetryingFetcher::new(
        HttpFetcher::new(&config.fetcher)?,
        RetryPolicy::from_config(&config.fetcher),
    );
    let rate_limiter = RateLimiter::new(config.crawler.min_interval());

    let mut engine = CrawlEngine::new(
        &config.crawler.seed_url,
        config.crawler.max_depth,
        fetcher,
        rate_limiter,
        sink,
    );

    engine.run().await
}
