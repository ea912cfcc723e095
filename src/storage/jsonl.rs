//! JSON Lines sink
//!
//! Every record becomes one compact JSON object on its own line. The file
//! is opened in append mode, so earlier records (including those of
//! previous runs) are never overwritten.

use crate::storage::traits::{RecordSink, SinkResult};
use crate::storage::CrawlRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only JSON Lines record sink
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl JsonLinesSink {
    /// Opens (or creates) the file at `path` for appending
    pub fn open(path: &Path) -> SinkResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written through this sink
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl RecordSink for JsonLinesSink {
    fn save(&mut self, record: &CrawlRecord) -> SinkResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        // Flush per record so a killed crawl keeps everything stored so far
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        tracing::debug!(
            "Wrote {} records to {}",
            self.written,
            self.path.display()
        );
        Ok(())
    }
}

/// Reads every record back from a JSON Lines file
///
/// Blank lines are skipped.
pub fn read_records(path: &Path) -> SinkResult<Vec<CrawlRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(url: &str) -> CrawlRecord {
        CrawlRecord {
            url: url.to_string(),
            title: Some("Title".to_string()),
            meta_description: None,
            headings: vec!["One".to_string(), "Two".to_string()],
            images: vec!["/logo.png".to_string()],
            paragraphs: vec!["Body text".to_string()],
        }
    }

    #[test]
    fn test_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.jsonl");

        let mut sink = JsonLinesSink::open(&path).unwrap();
        sink.save(&record("http://ex.com/a")).unwrap();
        sink.save(&record("http://ex.com/b")).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(sink.written(), 2);

        let records = read_records(&path).unwrap();
        assert_eq!(records[0].url, "http://ex.com/a");
        assert_eq!(records[1], record("http://ex.com/b"));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.jsonl");

        {
            let mut sink = JsonLinesSink::open(&path).unwrap();
            sink.save(&record("http://ex.com/first")).unwrap();
        }
        {
            let mut sink = JsonLinesSink::open(&path).unwrap();
            sink.save(&record("http://ex.com/second")).unwrap();
        }

        let urls: Vec<String> = read_records(&path)
            .unwrap()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["http://ex.com/first", "http://ex.com/second"]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("pages.jsonl");

        let mut sink = JsonLinesSink::open(&path).unwrap();
        sink.save(&record("http://ex.com")).unwrap();

        assert!(path.exists());
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempdir().unwrap();
        assert!(JsonLinesSink::open(dir.path()).is_err());
    }
}
