// src/pipeline/scrape.rs

//! Outer loop over outlets for both pagination modes.

use chrono::Utc;

use crate::browser::SessionFactory;
use crate::error::{AppError, Result};
use crate::models::{Config, Outlet, ScrapeMode, ScrapeOutcome};
use crate::pipeline::{AjaxPaginator, FeedPaginator};
use crate::services::{PageSource, SessionRecovery, StoryExtractor, resolve_nonce};
use crate::storage::FailureLog;

/// Scrape `outlets` by clicking through each landing-page feed.
///
/// One browser session serves the whole run; it is not recycled mid-outlet
/// because it holds the expanded feed.
pub async fn run_feed_scrape(
    config: &Config,
    factory: &dyn SessionFactory,
    outlets: &[Outlet],
    failures: &mut FailureLog,
) -> Result<ScrapeOutcome> {
    let start_time = Utc::now();
    let extractor = StoryExtractor::from_config(&config.story, &config.browser);
    let paginator = FeedPaginator::new(&config.feed, &extractor);

    let mut session = factory.launch().await?;
    let mut reports = Vec::with_capacity(outlets.len());
    for outlet in outlets {
        log::info!("Scraping feed of {} ({})", outlet.name, outlet.url);
        let report = paginator.run(session.as_mut(), outlet, failures).await?;
        reports.push(report);
    }
    session.quit().await?;

    Ok(ScrapeOutcome::new(ScrapeMode::Feed, start_time, reports))
}

/// Scrape `outlets` through the `load_more_posts` endpoint.
///
/// The nonce is resolved once on the first outlet and shared by all of them.
pub async fn run_ajax_scrape(
    config: &Config,
    factory: &dyn SessionFactory,
    source: &dyn PageSource,
    outlets: &[Outlet],
    failures: &mut FailureLog,
) -> Result<ScrapeOutcome> {
    let start_time = Utc::now();
    let first = outlets
        .first()
        .ok_or_else(|| AppError::config("No outlets selected"))?;

    let extractor = StoryExtractor::from_config(&config.story, &config.browser);
    let paginator = AjaxPaginator::new(&config.ajax, &extractor, source);
    let mut recovery = SessionRecovery::start(factory, config.browser.reset_every).await?;

    let nonce = resolve_nonce(
        config.ajax.nonce.as_deref(),
        recovery.session(),
        &first.url,
        &config.ajax.nonce_script_selector,
    )
    .await?;

    let mut reports = Vec::with_capacity(outlets.len());
    for outlet in outlets {
        log::info!("Scraping {} ({}) via AJAX", outlet.name, outlet.url);
        let report = paginator
            .run(&mut recovery, outlet, &nonce, failures)
            .await?;
        reports.push(report);
    }

    log::debug!("Browser session was reset {} times", recovery.resets());
    recovery.finish().await?;

    Ok(ScrapeOutcome::new(ScrapeMode::Ajax, start_time, reports))
}
