//! Per-outlet and per-run results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ExtractionOutcome, Failure, Outlet, StoryRecord};

/// Which paginator produced a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    /// "Load more" clicks in the browser
    Feed,
    /// Direct `admin-ajax.php` requests
    Ajax,
}

impl fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeMode::Feed => f.write_str("feed"),
            ScrapeMode::Ajax => f.write_str("ajax"),
        }
    }
}

/// Everything gathered for one outlet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletReport {
    pub outlet: Outlet,

    /// Story total advertised by the endpoint (AJAX only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_total: Option<u64>,

    /// Page requests (AJAX) or "load more" clicks (feed)
    pub requests: usize,

    /// Extracted stories in scrape order
    pub stories: Vec<StoryRecord>,

    /// Stories that failed twice, in scrape order
    pub failures: Vec<Failure>,
}

impl OutletReport {
    pub fn new(outlet: Outlet) -> Self {
        Self {
            outlet,
            expected_total: None,
            requests: 0,
            stories: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Route an extraction result into the matching sequence.
    pub fn record(&mut self, outcome: ExtractionOutcome) {
        match outcome {
            ExtractionOutcome::Scraped(story) => self.stories.push(story),
            ExtractionOutcome::Failed(failure) => self.failures.push(failure),
        }
    }
}

/// Run-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub outlet_count: usize,
    pub story_count: usize,
    pub failure_count: usize,
}

/// Result of scraping every selected outlet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub mode: ScrapeMode,
    pub stats: RunStats,
    pub outlets: Vec<OutletReport>,
}

impl ScrapeOutcome {
    pub fn new(mode: ScrapeMode, start_time: DateTime<Utc>, outlets: Vec<OutletReport>) -> Self {
        let stats = RunStats {
            start_time,
            end_time: Utc::now(),
            outlet_count: outlets.len(),
            story_count: outlets.iter().map(|r| r.stories.len()).sum(),
            failure_count: outlets.iter().map(|r| r.failures.len()).sum(),
        };
        Self {
            mode,
            stats,
            outlets,
        }
    }
}
