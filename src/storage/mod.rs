//! Output of scrape results.
//!
//! - `stories.json`: the latest snapshot, replaced atomically on each run
//! - `courierscraper.log`: append-only progress and failure log

pub mod failure_log;
pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ScrapeOutcome;

// Re-export for convenience
pub use failure_log::FailureLog;
pub use local::LocalStorage;

/// Metadata about a snapshot write.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    pub story_count: usize,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Content of `stories.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySnapshot {
    /// ISO 8601 timestamp of the write
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: ScrapeOutcome,
}

impl StorySnapshot {
    pub fn new(outcome: ScrapeOutcome) -> Self {
        Self {
            updated_at: Utc::now(),
            outcome,
        }
    }
}

/// Trait for scrape result storage backends.
#[async_trait]
pub trait StoryStorage: Send + Sync {
    /// Replace the stored snapshot with `outcome`.
    async fn write_snapshot(&self, outcome: &ScrapeOutcome) -> Result<WriteSummary>;

    /// Load the last snapshot, if any.
    async fn load_snapshot(&self) -> Result<Option<StorySnapshot>>;
}
