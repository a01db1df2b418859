//! Browser automation seam.
//!
//! The paginators and the story extractor only talk to [`BrowserSession`];
//! [`WebDriverSession`] backs it with a real WebDriver server, and tests use
//! an in-memory fake.

mod webdriver;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use webdriver::{WebDriverLauncher, WebDriverSession};

/// Operations the scraper needs from a live browser.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate the current tab.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Open `url` in a new tab and make it current.
    async fn open_tab(&mut self, url: &str) -> Result<()>;

    /// Close the current tab and return to the first one.
    async fn close_tab(&mut self) -> Result<()>;

    /// Wait up to `timeout` for `css` to appear and return its text.
    ///
    /// Fails with `AppError::ElementNotFound` when the wait runs out.
    async fn wait_for_text(&mut self, css: &str, timeout: Duration) -> Result<String>;

    /// Inner HTML of the first element matching `css`.
    async fn inner_html(&mut self, css: &str) -> Result<String>;

    /// For every element matching `parent_css`, the `attr` of its first
    /// `child_css` descendant (`None` when the child or attribute is missing).
    async fn child_attributes(
        &mut self,
        parent_css: &str,
        child_css: &str,
        attr: &str,
    ) -> Result<Vec<Option<String>>>;

    /// Click the first element matching `css`; `false` if none is present.
    async fn click(&mut self, css: &str) -> Result<bool>;

    /// End the browser session.
    async fn quit(&mut self) -> Result<()>;
}

/// Creates fresh browser sessions (initially and on every reset).
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}
