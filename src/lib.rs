//! CrawlCraft: a polite breadth-first web crawler
//!
//! This crate crawls outward from a single seed URL, extracting structured
//! data from every page it visits and following discovered links up to a
//! depth bound, while spacing requests and retrying failed fetches.

pub mod config;
pub mod crawler;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for CrawlCraft operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to fetch URL after {attempts} attempts: {url}")]
    FetchFailed { url: String, attempts: u32 },

    #[error("Frontier is empty")]
    FrontierEmpty,

    #[error("Sink write failed: {0}")]
    SinkWrite(#[from] storage::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Malformed base URL: {0}")]
    MalformedBaseUrl(String),
}

/// Result type alias for CrawlCraft operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlStats, Frontier, RateLimiter, RetryingFetcher};
pub use storage::{CrawlRecord, RecordSink};
pub use url::resolve_link;
