// src/pipeline/ajax.rs

//! AJAX-driven feed pagination.
//!
//! Requests pages 1, 2, ... of the `load_more_posts` action until a page
//! comes back without story links. For K stories at P per page that is
//! ceil(K/P)+1 requests.

use crate::error::Result;
use crate::models::{AjaxConfig, Nonce, Outlet, OutletReport, PaginationState};
use crate::pipeline::scrape_story;
use crate::services::{AjaxPage, PageSource, SessionRecovery, StoryExtractor};
use crate::storage::FailureLog;
use crate::utils::resolve;

/// Drives one outlet through the AJAX endpoint.
pub struct AjaxPaginator<'a> {
    config: &'a AjaxConfig,
    extractor: &'a StoryExtractor,
    source: &'a dyn PageSource,
}

impl<'a> AjaxPaginator<'a> {
    pub fn new(
        config: &'a AjaxConfig,
        extractor: &'a StoryExtractor,
        source: &'a dyn PageSource,
    ) -> Self {
        Self {
            config,
            extractor,
            source,
        }
    }

    async fn next_page(
        &self,
        state: &mut PaginationState,
        report: &mut OutletReport,
        nonce: &Nonce,
        endpoint: &str,
    ) -> Result<AjaxPage> {
        let page = state.next_page();
        report.requests += 1;
        self.source
            .fetch_page(nonce, page, state.page_size, endpoint)
            .await
    }

    /// Scrape every story the endpoint lists for `outlet`.
    pub async fn run(
        &self,
        recovery: &mut SessionRecovery<'_>,
        outlet: &Outlet,
        nonce: &Nonce,
        failures: &mut FailureLog,
    ) -> Result<OutletReport> {
        let endpoint = outlet.ajax_endpoint(&self.config.endpoint_path);
        let mut state = PaginationState::new(self.config.per_page);
        let mut report = OutletReport::new(outlet.clone());

        let mut page = self
            .next_page(&mut state, &mut report, nonce, &endpoint)
            .await?;
        state.expected_total = page.total;
        report.expected_total = page.total;

        failures.outlet_started(outlet, page.total).await?;
        log::info!(
            "Started {}. Stories expected: {}",
            outlet.url,
            page.total.map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );

        while !page.is_exhausted() {
            let mut new_on_page = 0;
            for href in &page.urls {
                let url = resolve(&outlet.url, href).unwrap_or_else(|| href.clone());
                if !state.mark_seen(&url) {
                    continue;
                }
                new_on_page += 1;

                let scraped = scrape_story(
                    self.extractor,
                    recovery.session(),
                    &url,
                    &mut state,
                    &mut report,
                    failures,
                )
                .await?;
                recovery.story_processed().await?;

                if scraped
                    && self.config.progress_every > 0
                    && state.stories_scraped % self.config.progress_every == 0
                {
                    log::info!("Stories scraped: {}", state.progress());
                }
            }

            if new_on_page == 0 {
                log::warn!(
                    "Page {} of {} repeated earlier stories; stopping",
                    state.page,
                    outlet.url
                );
                break;
            }

            log::debug!("Requesting more story urls");
            page = self
                .next_page(&mut state, &mut report, nonce, &endpoint)
                .await?;
        }

        failures.outlet_finished(outlet, &state).await?;
        log::info!(
            "Finished {}. Stories scraped: {}",
            outlet.url,
            state.progress()
        );
        Ok(report)
    }
}
