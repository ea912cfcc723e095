use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for CrawlCraft
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from (depth 0)
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Minimum time between successive fetches (seconds)
    #[serde(rename = "rate-limit", default = "default_seconds")]
    pub rate_limit: f64,
}

/// HTTP fetching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Number of attempts per URL before giving up
    #[serde(rename = "retry-count", default = "default_retry_count")]
    pub retry_count: u32,

    /// Delay between failed attempts (seconds)
    #[serde(rename = "retry-delay", default = "default_seconds")]
    pub retry_delay: f64,

    /// Per-attempt request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the record store (JSON Lines file or SQLite database)
    #[serde(rename = "storage-path")]
    pub storage_path: String,

    /// Which record store to write
    #[serde(default)]
    pub format: StorageFormat,

    /// Optional file that diagnostic logs are appended to
    #[serde(rename = "log-path", default)]
    pub log_path: Option<String>,
}

/// Record store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// One JSON object per line, appended
    #[default]
    Jsonl,
    /// One row per page in a SQLite database
    Sqlite,
}

impl CrawlerConfig {
    /// Spacing between page fetches; `rate_limit` must have passed validation
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f64(self.rate_limit)
    }
}

impl FetcherConfig {
    /// Pause between fetch attempts; `retry_delay` must have passed validation
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            retry_count: default_retry_count(),
            retry_delay: default_seconds(),
            timeout: default_timeout(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_seconds() -> f64 {
    1.0
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_retry_count() -> u32 {
    3
}

fn default_timeout() -> u64 {
    30
}
