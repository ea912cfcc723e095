//! Crawl engine - the main crawl loop
//!
//! This module contains the driver that ties every other component together.
//! Each iteration of the loop:
//! - waits for the rate limiter
//! - takes the next URL from the frontier
//! - fetches it (with retries)
//! - extracts the page and hands the record to the sink
//! - resolves discovered links and offers them one level deeper
//! - marks the URL visited
//!
//! A URL whose fetch fails is logged and released from the frontier
//! *without* being marked visited, so another page linking to it later
//! gets it re-admitted and attempted again.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_html;
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::retry::RetryingFetcher;
use crate::storage::{CrawlRecord, RecordSink};
use crate::url::resolve_link;
use crate::CrawlError;
use std::time::Instant;

/// Lifecycle of a [`CrawlEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, seed queued, not yet run
    Idle,
    /// Inside [`CrawlEngine::run`]
    Running,
    /// Frontier exhausted and sink closed
    Done,
}

/// Counters collected over a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Records handed to the sink
    pub pages_stored: u64,
    /// URLs whose every fetch attempt failed
    pub fetch_failures: u64,
    /// Raw links found across all stored pages
    pub links_found: u64,
    /// Links admitted into the frontier
    pub links_admitted: u64,
    /// Links dropped because their page URL could not serve as a base
    pub links_unresolvable: u64,
}

/// Breadth-first crawl driver
pub struct CrawlEngine<F, S> {
    frontier: Frontier,
    fetcher: RetryingFetcher<F>,
    rate_limiter: RateLimiter,
    sink: S,
    state: EngineState,
    stats: CrawlStats,
}

impl<F: PageFetcher, S: RecordSink> CrawlEngine<F, S> {
    /// Creates an engine with `seed_url` queued at depth 0
    ///
    /// # Arguments
    ///
    /// * `seed_url` - Where the crawl starts
    /// * `max_depth` - Deepest link level that is still fetched
    /// * `fetcher` - Fetcher used for every page
    /// * `rate_limiter` - Spacing between page fetches
    /// * `sink` - Destination of page records
    pub fn new(
        seed_url: &str,
        max_depth: u32,
        fetcher: RetryingFetcher<F>,
        rate_limiter: RateLimiter,
        sink: S,
    ) -> Self {
        let mut frontier = Frontier::new(max_depth);
        frontier.offer(seed_url, 0);

        Self {
            frontier,
            fetcher,
            rate_limiter,
            sink,
            state: EngineState::Idle,
            stats: CrawlStats::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the crawl until the frontier is empty
    ///
    /// Page fetch failures are logged and skipped. A sink failure stops the
    /// crawl and is returned as [`CrawlError::SinkWrite`].
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - Crawl finished; counters for the whole run
    /// * `Err(CrawlError)` - A record could not be stored
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlError> {
        if self.state == EngineState::Done {
            return Ok(self.stats.clone());
        }

        self.state = EngineState::Running;
        tracing::info!(
            "Starting crawl with {} URL(s) queued, max depth {}",
            self.frontier.queued_len(),
            self.frontier.max_depth()
        );

        let start_time = Instant::now();
        let mut pages_processed: u64 = 0;

        while self.frontier.has_pending() {
            self.crawl_next().await?;
            pages_processed += 1;

            if pages_processed % 10 == 0 {
                let rate = pages_processed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier, {:.2} pages/sec",
                    pages_processed,
                    self.frontier.queued_len(),
                    rate
                );
            }
        }

        tracing::info!("Frontier is empty, crawl complete");
        self.sink.close()?;
        self.state = EngineState::Done;

        tracing::info!(
            "Crawl completed in {:?}: {} pages stored, {} fetch failures, {} of {} links admitted",
            start_time.elapsed(),
            self.stats.pages_stored,
            self.stats.fetch_failures,
            self.stats.links_admitted,
            self.stats.links_found
        );

        Ok(self.stats.clone())
    }

    /// Processes the URL at the head of the frontier
    async fn crawl_next(&mut self) -> Result<(), CrawlError> {
        self.rate_limiter.wait_turn().await;

        let entry = self.frontier.next()?;
        tracing::debug!("Processing URL: {} (depth {})", entry.url, entry.depth);

        let body = match self.fetcher.fetch(&entry.url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch URL: {} - {}", entry.url, e);
                self.rate_limiter.record_request_done();
                self.frontier.abandon(&entry.url);
                self.stats.fetch_failures += 1;
                return Ok(());
            }
        };
        self.rate_limiter.record_request_done();

        let page = parse_html(&body);

        let record = CrawlRecord {
            url: entry.url.clone(),
            title: page.title,
            meta_description: page.meta_description,
            headings: page.headings,
            images: page.images,
            paragraphs: page.paragraphs,
        };
        self.sink.save(&record)?;
        self.stats.pages_stored += 1;

        self.enqueue_links(&entry, &page.links);
        self.frontier.mark_visited(&entry.url);

        Ok(())
    }

    /// Resolves each raw link against `from` and offers it one level deeper
    fn enqueue_links(&mut self, from: &FrontierEntry, links: &[String]) {
        let child_depth = from.depth + 1;

        for link in links {
            self.stats.links_found += 1;

            let absolute = match resolve_link(&from.url, link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Dropping link {} on {}: {}", link, from.url, e);
                    self.stats.links_unresolvable += 1;
                    continue;
                }
            };

            if self.frontier.offer(&absolute, child_depth) {
                tracing::trace!("Queued {} at depth {}", absolute, child_depth);
                self.stats.links_admitted += 1;
            }
        }
    }
}
