// src/models/pagination.rs

//! Per-outlet pagination state.

use std::collections::HashSet;

/// Counters and coverage for one outlet's pagination run.
///
/// Created fresh for every outlet and dropped when the outlet is done.
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// Last requested page index (1-based; 0 before the first request)
    pub page: usize,

    /// Stories per page or per "load more" increment
    pub page_size: usize,

    /// Story total advertised by the endpoint on the first page
    pub expected_total: Option<u64>,

    /// Successfully extracted stories
    pub stories_scraped: usize,

    /// Feed containers already consumed (UI pagination)
    consumed: usize,

    seen: HashSet<String>,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size,
            expected_total: None,
            stories_scraped: 0,
            consumed: 0,
            seen: HashSet::new(),
        }
    }

    /// Advance to the next page and return its index.
    pub fn next_page(&mut self) -> usize {
        self.page += 1;
        self.page
    }

    /// Record a story URL; returns `false` if it was already seen.
    pub fn mark_seen(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    /// Distinct story URLs handled so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Record how many feed containers have been handled. Never decreases.
    pub fn set_consumed(&mut self, count: usize) {
        self.consumed = self.consumed.max(count);
    }

    /// "scraped/expected" for progress lines.
    pub fn progress(&self) -> String {
        match self.expected_total {
            Some(total) => format!("{}/{}", self.stories_scraped, total),
            None => self.stories_scraped.to_string(),
        }
    }
}
