// src/pipeline/feed.rs

//! UI-driven feed pagination.
//!
//! Reads the story containers on an outlet's landing page, extracts the
//! newly revealed ones and clicks "load more" until a click no longer adds
//! containers:
//!
//! ```text
//! Loading ──▶ Extracting ──▶ ClickMore ──▶ Loading
//!    │                           │
//!    └──────────▶ Done ◀─────────┘ (no growth / no control / round cap)
//! ```
//!
//! For K stories revealed P at a time this clicks ceil(K/P) times: the last
//! click is the one that shows no growth.

use std::time::Duration;

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::models::{FeedConfig, Outlet, OutletReport, PaginationState};
use crate::pipeline::scrape_story;
use crate::services::StoryExtractor;
use crate::storage::FailureLog;
use crate::utils::resolve;

/// Paginator state.
#[derive(Debug)]
enum Phase {
    Loading,
    Extracting(Vec<Option<String>>),
    ClickMore,
    Done,
}

/// Drives one outlet's "load more" feed.
pub struct FeedPaginator<'a> {
    config: &'a FeedConfig,
    extractor: &'a StoryExtractor,
}

impl<'a> FeedPaginator<'a> {
    pub fn new(config: &'a FeedConfig, extractor: &'a StoryExtractor) -> Self {
        Self { config, extractor }
    }

    /// Scrape every story reachable from the outlet's feed.
    pub async fn run(
        &self,
        session: &mut dyn BrowserSession,
        outlet: &Outlet,
        failures: &mut FailureLog,
    ) -> Result<OutletReport> {
        let mut report = OutletReport::new(outlet.clone());
        let mut state = PaginationState::new(self.config.page_size);
        let pause = Duration::from_millis(self.config.load_more_pause_ms);

        failures.outlet_started(outlet, None).await?;
        session.goto(&outlet.url).await?;

        let mut phase = Phase::Loading;
        loop {
            phase = match phase {
                Phase::Loading => {
                    let links = session
                        .child_attributes(
                            &self.config.item_selector,
                            &self.config.link_selector,
                            "href",
                        )
                        .await?;
                    if links.len() <= state.consumed() {
                        log::info!(
                            "No more stories in feed. Processed {} stories total",
                            state.seen_count()
                        );
                        Phase::Done
                    } else {
                        log::info!("{} stories in feed", links.len());
                        Phase::Extracting(links)
                    }
                }
                Phase::Extracting(links) => {
                    let increment = &links[state.consumed()..];
                    if increment.len() > self.config.page_size {
                        log::debug!(
                            "Feed grew by {} (expected at most {})",
                            increment.len(),
                            self.config.page_size
                        );
                    }
                    for href in increment {
                        let Some(href) = href else {
                            log::warn!("Story container without a link on {}", outlet.url);
                            continue;
                        };
                        let url = resolve(&outlet.url, href).unwrap_or_else(|| href.clone());
                        if !state.mark_seen(&url) {
                            log::debug!("Already scraped {}, skipping", url);
                            continue;
                        }

                        scrape_story(
                            self.extractor,
                            session,
                            &url,
                            &mut state,
                            &mut report,
                            failures,
                        )
                        .await?;
                    }
                    state.set_consumed(links.len());
                    Phase::ClickMore
                }
                Phase::ClickMore => {
                    if self
                        .config
                        .max_rounds
                        .is_some_and(|max| report.requests >= max)
                    {
                        log::warn!(
                            "Stopping {} after {} load-more rounds",
                            outlet.url,
                            report.requests
                        );
                        Phase::Done
                    } else if session.click(&self.config.load_more_selector).await? {
                        report.requests += 1;
                        if !pause.is_zero() {
                            tokio::time::sleep(pause).await;
                        }
                        Phase::Loading
                    } else {
                        log::info!("Load-more control gone on {}", outlet.url);
                        Phase::Done
                    }
                }
                Phase::Done => break,
            };
        }

        failures.outlet_finished(outlet, &state).await?;
        log::info!(
            "Total stories scraped from {}: {}",
            outlet.url,
            state.stories_scraped
        );
        Ok(report)
    }
}
