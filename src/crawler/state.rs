//! Traversal state: visited set, FIFO of pending pages and the crawl domain

use crate::url::extract_domain;
use crate::UrlError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Breadth-first traversal state
///
/// Passed into and returned from [`crate::crawler::Crawler::run`], so a run
/// can be inspected afterwards or driven from a hand-built state in tests.
///
/// Invariant: `pending` never holds a URL that is in `visited`, and holds each
/// URL at most once.
#[derive(Debug, Clone)]
pub struct CrawlState {
    visited: HashSet<String>,
    pending: VecDeque<Url>,
    queued: HashSet<String>,
    domain: String,
}

impl CrawlState {
    /// Seeds the queue; the first seed fixes the crawl domain
    ///
    /// Seeds on another domain stay in the queue and are skipped when their
    /// turn comes.
    pub fn new(seeds: &[Url]) -> Result<Self, UrlError> {
        let first = seeds.first().ok_or(UrlError::MissingDomain)?;
        let domain = extract_domain(first).ok_or(UrlError::MissingDomain)?;

        let mut state = Self {
            visited: HashSet::new(),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            domain,
        };
        for seed in seeds {
            state.enqueue(seed.clone());
        }
        Ok(state)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Adds a page to the back of the queue
    ///
    /// Returns false if it was already visited or is already waiting.
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }
        self.queued.insert(key.to_string());
        self.pending.push_back(url);
        true
    }

    /// Takes the next page and marks it visited
    pub fn next_pending(&mut self) -> Option<Url> {
        let url = self.pending.pop_front()?;
        self.queued.remove(url.as_str());
        self.visited.insert(url.as_str().to_string());
        Some(url)
    }

    /// Marks a URL visited without fetching it, e.g. the target of a redirect
    pub fn mark_visited(&mut self, url: &Url) {
        let key = url.as_str();
        if self.queued.remove(key) {
            self.pending.retain(|u| u.as_str() != key);
        }
        self.visited.insert(key.to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
