use crate::config::types::{Config, CrawlerConfig, FetcherConfig, OutputConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Upper bound on `max-depth`; anything deeper is almost certainly a typo
const MAX_DEPTH_LIMIT: u32 = 100;

/// Validates the entire configuration
///
/// This is run by [`load_config`](crate::config::load_config). Callers that
/// apply overrides load with [`parse_config`](crate::config::parse_config)
/// and validate once afterwards.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    validate_seconds("rate_limit", config.rate_limit)?;

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.retry_count < 1 {
        return Err(ConfigError::Validation(format!(
            "retry_count must be >= 1, got {}",
            config.retry_count
        )));
    }

    validate_seconds("retry_delay", config.retry_delay)?;

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1 second, got {}",
            config.timeout
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.storage_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage_path cannot be empty".to_string(),
        ));
    }

    if let Some(log_path) = &config.log_path {
        if log_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the seed URL: non-empty, http(s), with a host
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    if seed.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

/// Validates a duration given in (possibly fractional) seconds
///
/// The value must also fit in a [`Duration`], since the config accessors
/// convert it with `Duration::from_secs_f64`.
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }

    if Duration::try_from_secs_f64(value).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} is too large, got {} seconds",
            name, value
        )));
    }

    Ok(())
}
