//! SQLite storage implementation
//!
//! This module provides a SQLite-backed [`RecordSink`]. Opening the sink
//! starts a new run row; closing it marks that run completed.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordSink, SinkError, SinkResult};
use crate::storage::{CrawlRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// A crawl run as stored in the `runs` table
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub seed_url: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// SQLite record sink
pub struct SqliteSink {
    conn: Connection,
    run_id: i64,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path` and starts a new run
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `seed_url` - Seed URL of the crawl
    /// * `config_hash` - Hash of the configuration that started the crawl
    pub fn open(path: &Path, seed_url: &str, config_hash: &str) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        Self::start(conn, seed_url, config_hash)
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory(seed_url: &str) -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::start(conn, seed_url, "test_hash")
    }

    fn start(conn: Connection, seed_url: &str, config_hash: &str) -> SinkResult<Self> {
        initialize_schema(&conn)?;

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO runs (seed_url, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                seed_url,
                now,
                config_hash,
                RunStatus::Running.to_db_string()
            ],
        )?;
        let run_id = conn.last_insert_rowid();
        tracing::debug!("Started run {} for seed {}", run_id, seed_url);

        Ok(Self { conn, run_id })
    }

    /// ID of the run this sink writes into
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Gets a run by ID
    pub fn get_run(&self, run_id: i64) -> SinkResult<RunRecord> {
        let mut stmt = self.conn.prepare(
            "SELECT id, seed_url, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
        )?;

        let run = stmt.query_row(params![run_id], |row| {
            Ok(RunRecord {
                id: row.get(0)?,
                seed_url: row.get(1)?,
                started_at: row.get(2)?,
                finished_at: row.get(3)?,
                config_hash: row.get(4)?,
                status: RunStatus::from_db_string(&row.get::<_, String>(5)?)
                    .unwrap_or(RunStatus::Running),
            })
        });

        match run {
            Ok(run) => Ok(run),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(SinkError::RunNotFound(run_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Counts the records stored for a run
    pub fn count_records(&self, run_id: i64) -> SinkResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Loads every record stored for a run, in insertion order
    pub fn load_records(&self, run_id: i64) -> SinkResult<Vec<CrawlRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, title, meta_description, headings, images, paragraphs
             FROM pages WHERE run_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (url, title, meta_description, headings, images, paragraphs) = row?;
            records.push(CrawlRecord {
                url,
                title,
                meta_description,
                headings: serde_json::from_str(&headings)?,
                images: serde_json::from_str(&images)?,
                paragraphs: serde_json::from_str(&paragraphs)?,
            });
        }
        Ok(records)
    }
}

impl RecordSink for SqliteSink {
    fn save(&mut self, record: &CrawlRecord) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO pages (run_id, url, title, meta_description, headings, images, paragraphs, crawled_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.run_id,
                record.url,
                record.title,
                record.meta_description,
                serde_json::to_string(&record.headings)?,
                serde_json::to_string(&record.images)?,
                serde_json::to_string(&record.paragraphs)?,
                now,
            ],
        )?;
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, self.run_id],
        )?;
        Ok(())
    }
}
