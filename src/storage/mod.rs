//! Storage module for persisting crawl records
//!
//! This module handles writing one record per fetched page, including:
//! - The [`CrawlRecord`] shape shared by every backend
//! - An append-only JSON Lines file sink
//! - A SQLite sink that also tracks crawl runs

mod jsonl;
mod schema;
mod sqlite;
mod traits;

pub use jsonl::{read_records, JsonLinesSink};
pub use sqlite::{RunRecord, SqliteSink};
pub use traits::{RecordSink, SinkError, SinkResult};

use crate::config::{OutputConfig, StorageFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structured data extracted from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRecord {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub headings: Vec<String>,
    pub images: Vec<String>,
    pub paragraphs: Vec<String>,
}

/// Opens the sink selected by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `seed_url` - Seed URL, recorded on the run by sinks that track runs
/// * `config_hash` - Configuration hash, recorded alongside the seed
///
/// # Returns
///
/// * `Ok(Box<dyn RecordSink>)` - The opened sink
/// * `Err(SinkError)` - Failed to open or initialize the store
pub fn open_sink(
    config: &OutputConfig,
    seed_url: &str,
    config_hash: &str,
) -> SinkResult<Box<dyn RecordSink>> {
    let path = Path::new(&config.storage_path);
    match config.format {
        StorageFormat::Jsonl => Ok(Box::new(JsonLinesSink::open(path)?)),
        StorageFormat::Sqlite => Ok(Box::new(SqliteSink::open(path, seed_url, config_hash)?)),
    }
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
