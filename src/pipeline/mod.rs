//! Pipeline entry points for scraping.
//!
//! - `run_feed_scrape`: paginate each outlet by clicking "load more"
//! - `run_ajax_scrape`: paginate each outlet through `admin-ajax.php`

pub mod ajax;
pub mod feed;
pub mod scrape;

pub use ajax::AjaxPaginator;
pub use feed::FeedPaginator;
pub use scrape::{run_ajax_scrape, run_feed_scrape};

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::models::{ExtractionOutcome, OutletReport, PaginationState};
use crate::services::StoryExtractor;
use crate::storage::FailureLog;

/// Extract one story with retry and route the result into `report`.
///
/// Failures are appended to the failure log as they happen. Returns whether
/// the story was scraped.
pub(crate) async fn scrape_story(
    extractor: &StoryExtractor,
    session: &mut dyn BrowserSession,
    url: &str,
    state: &mut PaginationState,
    report: &mut OutletReport,
    failures: &mut FailureLog,
) -> Result<bool> {
    let outcome = extractor.extract_with_retry(session, url).await?;
    let scraped = outcome.is_scraped();
    match &outcome {
        ExtractionOutcome::Scraped(_) => state.stories_scraped += 1,
        ExtractionOutcome::Failed(failure) => failures.record(failure).await?,
    }
    report.record(outcome);
    Ok(scraped)
}
