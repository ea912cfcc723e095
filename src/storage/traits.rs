//! Storage traits and error types
//!
//! This module defines the trait interface for record sinks and
//! associated error types.

use crate::storage::CrawlRecord;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for record sink implementations
///
/// A sink durably stores one [`CrawlRecord`] per successfully fetched page.
/// The crawl engine treats every sink error as fatal.
pub trait RecordSink {
    /// Persists a single page record
    fn save(&mut self, record: &CrawlRecord) -> SinkResult<()>;

    /// Called once after the crawl finishes
    ///
    /// The default implementation does nothing.
    fn close(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn save(&mut self, record: &CrawlRecord) -> SinkResult<()> {
        (**self).save(record)
    }

    fn close(&mut self) -> SinkResult<()> {
        (**self).close()
    }
}
