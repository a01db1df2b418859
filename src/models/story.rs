//! Story records and extraction results.

use serde::{Deserialize, Serialize};

/// Metadata extracted from one story page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoryRecord {
    /// Headline text
    pub title: String,

    /// Byline text
    pub author: String,

    /// Category/section text
    pub section: String,

    /// Story URL as navigated
    pub url: String,
}

/// A story that could not be extracted after the retry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    pub url: String,
    pub reason: String,
}

/// Result of extracting a single story with retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Scraped(StoryRecord),
    Failed(Failure),
}

impl ExtractionOutcome {
    pub fn is_scraped(&self) -> bool {
        matches!(self, Self::Scraped(_))
    }
}
