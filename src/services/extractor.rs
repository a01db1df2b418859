// src/services/extractor.rs

//! Story page extraction.
//!
//! Opens each story in its own tab so the feed tab keeps its "load more"
//! state, reads three fixed fields and closes the tab again.

use std::time::Duration;

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::models::{BrowserConfig, ExtractionOutcome, Failure, StoryRecord, StorySelectors};

/// Reads title, author and section from story pages.
#[derive(Debug, Clone)]
pub struct StoryExtractor {
    selectors: StorySelectors,
    wait: Duration,
}

impl StoryExtractor {
    pub fn new(selectors: StorySelectors, wait: Duration) -> Self {
        Self { selectors, wait }
    }

    pub fn from_config(selectors: &StorySelectors, browser: &BrowserConfig) -> Self {
        Self::new(
            selectors.clone(),
            Duration::from_secs(browser.element_wait_secs),
        )
    }

    /// Extract one story.
    ///
    /// Fails with `AppError::ElementNotFound` when any of the three selectors
    /// does not appear within the wait bound. The story tab is closed either way.
    pub async fn extract(&self, session: &mut dyn BrowserSession, url: &str) -> Result<StoryRecord> {
        log::debug!("Scraping story {}", url);
        session.open_tab(url).await?;

        let record = self.read_fields(session, url).await;
        session.close_tab().await?;
        record
    }

    async fn read_fields(&self, session: &mut dyn BrowserSession, url: &str) -> Result<StoryRecord> {
        let title = session
            .wait_for_text(&self.selectors.title_selector, self.wait)
            .await?;
        let author = session
            .wait_for_text(&self.selectors.author_selector, self.wait)
            .await?;
        let section = session
            .wait_for_text(&self.selectors.section_selector, self.wait)
            .await?;

        Ok(StoryRecord {
            title,
            author,
            section,
            url: url.to_string(),
        })
    }

    /// Extract with one retry on timeout.
    ///
    /// A second timeout becomes `ExtractionOutcome::Failed`; any other error
    /// is returned as-is and ends the run.
    pub async fn extract_with_retry(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ExtractionOutcome> {
        match self.extract(session, url).await {
            Ok(story) => return Ok(ExtractionOutcome::Scraped(story)),
            Err(e) if e.is_element_not_found() => {
                log::warn!("Scrape failed for {} ({}), trying again", url, e);
            }
            Err(e) => return Err(e),
        }

        match self.extract(session, url).await {
            Ok(story) => Ok(ExtractionOutcome::Scraped(story)),
            Err(e) if e.is_element_not_found() => {
                log::warn!("Scrape failed again for {}, moving on", url);
                Ok(ExtractionOutcome::Failed(Failure {
                    url: url.to_string(),
                    reason: e.to_string(),
                }))
            }
            Err(e) => Err(e),
        }
    }
}
