//! In-memory browser used by unit tests.
//!
//! Simulates a Courier landing page with a "load more" feed, story pages and
//! stories that time out a configurable number of times.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{BrowserSession, SessionFactory};
use crate::error::{AppError, Result};
use crate::models::{FeedConfig, StorySelectors};

/// Observable browser events, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Launch,
    Goto(String),
    OpenTab(String),
    CloseTab,
    Click,
    Quit,
}

#[derive(Debug, Default)]
pub struct FakeState {
    /// Feed entries; `None` is a container without a story link
    pub feed: Vec<Option<String>>,
    pub visible: usize,
    pub increment: usize,
    pub hide_button_when_exhausted: bool,
    /// url -> (title, author, section)
    pub pages: HashMap<String, (String, String, String)>,
    /// url -> remaining timeouts (usize::MAX for always)
    pub timeouts: HashMap<String, usize>,
    /// css -> inner html
    pub inner_html: HashMap<String, String>,
    pub tabs: Vec<String>,
    pub events: Vec<Event>,
}

impl FakeState {
    pub fn opened(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::OpenTab(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

/// Shared handle to a fake site; cheap to clone into sessions.
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSite {
    /// A feed of `total` stories under `base`, revealed `increment` at a time.
    pub fn with_feed(base: &str, total: usize, increment: usize) -> Self {
        let site = Self::default();
        {
            let mut state = site.state();
            for i in 0..total {
                let url = story_url(base, i);
                state.pages.insert(
                    url.clone(),
                    (format!("Story {i}"), format!("Author {i}"), "News".to_string()),
                );
                state.feed.push(Some(url));
            }
            state.increment = increment;
            state.visible = increment.min(total);
        }
        site
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn add_page(&self, url: &str, title: &str, author: &str, section: &str) {
        self.state().pages.insert(
            url.to_string(),
            (title.to_string(), author.to_string(), section.to_string()),
        );
    }

    pub fn time_out(&self, url: &str, times: usize) {
        self.state().timeouts.insert(url.to_string(), times);
    }

    pub fn session(&self) -> FakeSession {
        FakeSession {
            site: self.clone(),
            feed: FeedConfig::default(),
            story: StorySelectors::default(),
        }
    }
}

pub fn story_url(base: &str, i: usize) -> String {
    format!("{}/story-{i}/", base.trim_end_matches('/'))
}

pub struct FakeSession {
    site: FakeSite,
    feed: FeedConfig,
    story: StorySelectors,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        let mut state = self.site.state();
        match state.tabs.last_mut() {
            Some(tab) => *tab = url.to_string(),
            None => state.tabs.push(url.to_string()),
        }
        state.events.push(Event::Goto(url.to_string()));
        Ok(())
    }

    async fn open_tab(&mut self, url: &str) -> Result<()> {
        let mut state = self.site.state();
        state.tabs.push(url.to_string());
        state.events.push(Event::OpenTab(url.to_string()));
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<()> {
        let mut state = self.site.state();
        state.tabs.pop();
        state.events.push(Event::CloseTab);
        Ok(())
    }

    async fn wait_for_text(&mut self, css: &str, _timeout: Duration) -> Result<String> {
        let mut state = self.site.state();
        let current = state.tabs.last().cloned().unwrap_or_default();

        if let Some(remaining) = state.timeouts.get_mut(&current) {
            if *remaining > 0 {
                if *remaining != usize::MAX {
                    *remaining -= 1;
                }
                return Err(AppError::element_not_found(css));
            }
        }

        let (title, author, section) = state
            .pages
            .get(&current)
            .cloned()
            .ok_or_else(|| AppError::element_not_found(css))?;
        if css == self.story.title_selector {
            Ok(title)
        } else if css == self.story.author_selector {
            Ok(author)
        } else if css == self.story.section_selector {
            Ok(section)
        } else {
            Err(AppError::element_not_found(css))
        }
    }

    async fn inner_html(&mut self, css: &str) -> Result<String> {
        self.site
            .state()
            .inner_html
            .get(css)
            .cloned()
            .ok_or_else(|| AppError::element_not_found(css))
    }

    async fn child_attributes(
        &mut self,
        parent_css: &str,
        child_css: &str,
        _attr: &str,
    ) -> Result<Vec<Option<String>>> {
        assert_eq!(parent_css, self.feed.item_selector);
        assert_eq!(child_css, self.feed.link_selector);
        let state = self.site.state();
        Ok(state.feed[..state.visible].to_vec())
    }

    async fn click(&mut self, css: &str) -> Result<bool> {
        assert_eq!(css, self.feed.load_more_selector);
        let mut state = self.site.state();
        if state.hide_button_when_exhausted && state.visible == state.feed.len() {
            return Ok(false);
        }
        state.visible = (state.visible + state.increment).min(state.feed.len());
        state.events.push(Event::Click);
        Ok(true)
    }

    async fn quit(&mut self) -> Result<()> {
        self.site.state().events.push(Event::Quit);
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for FakeSite {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        {
            let mut state = self.state();
            state.tabs.clear();
            state.events.push(Event::Launch);
        }
        Ok(Box::new(self.session()))
    }
}
