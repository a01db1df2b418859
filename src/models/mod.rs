// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod outlet;
mod pagination;
mod report;
mod story;

// Re-export all public types
pub use config::{
    AjaxConfig, BrowserConfig, Config, ENV_COOKIE, ENV_NONCE, ENV_WEBDRIVER_URL, FeedConfig,
    OutputConfig, StorySelectors,
};
pub use outlet::Outlet;
pub use pagination::PaginationState;
pub use report::{OutletReport, RunStats, ScrapeMode, ScrapeOutcome};
pub use story::{ExtractionOutcome, Failure, StoryRecord};

/// Token authorizing `load_more_posts` requests.
///
/// Rotates daily on the server side; one value is used for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
