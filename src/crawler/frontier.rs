//! URL frontier for the breadth-first crawl
//!
//! The frontier owns three pieces of state and nothing else touches them:
//! - the FIFO queue of URLs waiting to be fetched
//! - the set of visited URLs, which only ever grows
//! - the discovery depth of every pending URL
//!
//! A URL is *pending* from the moment it is admitted until it is either
//! marked visited or abandoned. That includes the time between [`next`]
//! handing it out and the engine finishing with it, so a page that links to
//! itself cannot re-admit itself while it is being processed.
//!
//! [`next`]: Frontier::next

use crate::CrawlError;
use std::collections::{HashMap, HashSet, VecDeque};

/// A URL waiting in the frontier, with the depth it was discovered at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// Queue, visited set and depth map with admission control
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    pending_depth: HashMap<String, u32>,
    max_depth: u32,
}

impl Frontier {
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            pending_depth: HashMap::new(),
            max_depth,
        }
    }

    /// Offers a URL for crawling at the given depth
    ///
    /// The URL is appended to the queue only if it has not been visited, is
    /// not already pending, and `depth <= max_depth`. A rejected offer is
    /// silently dropped; in particular a later offer never changes the
    /// depth of a URL that is already pending.
    ///
    /// # Returns
    ///
    /// `true` if the URL was admitted
    pub fn offer(&mut self, url: &str, depth: u32) -> bool {
        if depth > self.max_depth
            || self.visited.contains(url)
            || self.pending_depth.contains_key(url)
        {
            return false;
        }

        self.pending_depth.insert(url.to_string(), depth);
        self.queue.push_back(FrontierEntry {
            url: url.to_string(),
            depth,
        });
        true
    }

    /// Removes and returns the oldest queued URL
    ///
    /// The URL stays pending until [`mark_visited`](Self::mark_visited) or
    /// [`abandon`](Self::abandon) is called for it.
    ///
    /// # Returns
    ///
    /// * `Ok(FrontierEntry)` - The head of the queue
    /// * `Err(CrawlError::FrontierEmpty)` - Nothing is queued
    pub fn next(&mut self) -> Result<FrontierEntry, CrawlError> {
        self.queue.pop_front().ok_or(CrawlError::FrontierEmpty)
    }

    /// Moves a URL into the visited set and drops its pending depth
    ///
    /// Idempotent. Intended for URLs previously returned by
    /// [`next`](Self::next).
    pub fn mark_visited(&mut self, url: &str) {
        self.pending_depth.remove(url);
        if !self.visited.contains(url) {
            self.visited.insert(url.to_string());
        }
    }

    /// Releases a URL returned by [`next`](Self::next) without visiting it
    ///
    /// The URL ends up neither pending nor visited, so it is admitted again
    /// if it is rediscovered later.
    pub fn abandon(&mut self, url: &str) {
        self.pending_depth.remove(url);
    }

    /// Returns true if at least one URL is queued
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if the URL is queued or currently being processed
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending_depth.contains_key(url)
    }

    /// Depth a pending URL was admitted at
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.pending_depth.get(url).copied()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
