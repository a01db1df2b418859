//! Application configuration structures.

use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Outlet;

/// Environment variable carrying the session cookie for the AJAX endpoint.
pub const ENV_COOKIE: &str = "COURIER_COOKIE";
/// Environment variable carrying a nonce that skips discovery.
pub const ENV_NONCE: &str = "COURIER_NONCE";
/// Environment variable overriding the WebDriver server URL.
pub const ENV_WEBDRIVER_URL: &str = "COURIER_WEBDRIVER_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Browser session settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// UI-driven feed pagination settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Story page selectors
    #[serde(default)]
    pub story: StorySelectors,

    /// AJAX-driven pagination settings
    #[serde(default)]
    pub ajax: AjaxConfig,

    /// Output file names
    #[serde(default)]
    pub output: OutputConfig,

    /// Outlets to scrape, in order
    #[serde(default = "defaults::outlets")]
    pub outlets: Vec<Outlet>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides for secrets and per-run state.
    ///
    /// `lookup` is usually `std::env::var(..).ok()`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(cookie) = get(ENV_COOKIE) {
            self.ajax.cookie = Some(cookie);
        }
        if let Some(nonce) = get(ENV_NONCE) {
            self.ajax.nonce = Some(nonce);
        }
        if let Some(url) = get(ENV_WEBDRIVER_URL) {
            self.browser.webdriver_url = url;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.browser.webdriver_url.trim().is_empty() {
            return Err(AppError::validation("browser.webdriver_url is empty"));
        }
        url::Url::parse(&self.browser.webdriver_url)?;
        if self.browser.element_wait_secs == 0 {
            return Err(AppError::validation(
                "browser.element_wait_secs must be > 0",
            ));
        }
        if self.browser.reset_every == 0 {
            return Err(AppError::validation("browser.reset_every must be > 0"));
        }
        if self.feed.page_size == 0 {
            return Err(AppError::validation("feed.page_size must be > 0"));
        }
        if self.ajax.per_page == 0 {
            return Err(AppError::validation("ajax.per_page must be > 0"));
        }
        if self.ajax.user_agent.trim().is_empty() {
            return Err(AppError::validation("ajax.user_agent is empty"));
        }
        if self.ajax.timeout_secs == 0 {
            return Err(AppError::validation("ajax.timeout_secs must be > 0"));
        }
        if !self.ajax.endpoint_path.starts_with('/') {
            return Err(AppError::validation(
                "ajax.endpoint_path must start with '/'",
            ));
        }

        for selector in [
            &self.feed.item_selector,
            &self.feed.link_selector,
            &self.feed.load_more_selector,
            &self.story.title_selector,
            &self.story.author_selector,
            &self.story.section_selector,
            &self.ajax.nonce_script_selector,
            &self.ajax.link_selector,
        ] {
            Selector::parse(selector).map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        }

        if self.outlets.is_empty() {
            return Err(AppError::validation("No outlets defined"));
        }
        for outlet in &self.outlets {
            url::Url::parse(&outlet.url)
                .map_err(|e| AppError::validation(format!("outlet {}: {e}", outlet.name)))?;
        }
        Ok(())
    }

    /// Outlets to scrape, optionally narrowed to a single base URL.
    pub fn select_outlets(&self, only: Option<&str>) -> Vec<Outlet> {
        match only {
            None => self.outlets.clone(),
            Some(url) => {
                let wanted = url.trim_end_matches('/');
                let known = self
                    .outlets
                    .iter()
                    .find(|o| o.base_url() == wanted)
                    .cloned();
                vec![known.unwrap_or_else(|| Outlet::new(wanted, wanted))]
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            feed: FeedConfig::default(),
            story: StorySelectors::default(),
            ajax: AjaxConfig::default(),
            output: OutputConfig::default(),
            outlets: defaults::outlets(),
        }
    }
}

/// WebDriver session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// WebDriver server (e.g. geckodriver) URL
    #[serde(default = "defaults::webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Upper bound on waiting for a story element, in seconds
    #[serde(default = "defaults::element_wait")]
    pub element_wait_secs: u64,

    /// Recreate the browser session after this many processed stories
    #[serde(default = "defaults::reset_every")]
    pub reset_every: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: defaults::webdriver_url(),
            headless: defaults::headless(),
            element_wait_secs: defaults::element_wait(),
            reset_every: defaults::reset_every(),
        }
    }
}

/// Selectors and pacing for the "load more" driven feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Selector for each story container in the feed
    #[serde(default = "defaults::item_selector")]
    pub item_selector: String,

    /// Selector for the story link within a container
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// Selector for the "load more stories" control
    #[serde(default = "defaults::load_more_selector")]
    pub load_more_selector: String,

    /// Expected stories per "load more" activation.
    ///
    /// Diagnostic only: the increment actually extracted is whatever the feed
    /// grew by, and a larger growth is logged at debug level.
    #[serde(default = "defaults::feed_page_size")]
    pub page_size: usize,

    /// Pause after clicking "load more", in milliseconds
    #[serde(default = "defaults::load_more_pause")]
    pub load_more_pause_ms: u64,

    /// Optional cap on "load more" activations per outlet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            item_selector: defaults::item_selector(),
            link_selector: defaults::link_selector(),
            load_more_selector: defaults::load_more_selector(),
            page_size: defaults::feed_page_size(),
            load_more_pause_ms: defaults::load_more_pause(),
            max_rounds: None,
        }
    }
}

/// CSS selectors read from a story page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySelectors {
    #[serde(default = "defaults::title_selector")]
    pub title_selector: String,

    #[serde(default = "defaults::author_selector")]
    pub author_selector: String,

    #[serde(default = "defaults::section_selector")]
    pub section_selector: String,
}

impl Default for StorySelectors {
    fn default() -> Self {
        Self {
            title_selector: defaults::title_selector(),
            author_selector: defaults::author_selector(),
            section_selector: defaults::section_selector(),
        }
    }
}

/// Settings for the WordPress `load_more_posts` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AjaxConfig {
    /// Path appended to the outlet base URL
    #[serde(default = "defaults::endpoint_path")]
    pub endpoint_path: String,

    /// Value of the `action` form field
    #[serde(default = "defaults::action")]
    pub action: String,

    /// Stories requested per page
    #[serde(default = "defaults::per_page")]
    pub per_page: usize,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Cookie header sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,

    /// Fixed nonce; discovered from the landing page when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Script element embedding the nonce on the landing page
    #[serde(default = "defaults::nonce_script_selector")]
    pub nonce_script_selector: String,

    /// Selector for story anchors inside the returned markup
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// Log progress every N scraped stories
    #[serde(default = "defaults::progress_every")]
    pub progress_every: usize,
}

impl Default for AjaxConfig {
    fn default() -> Self {
        Self {
            endpoint_path: defaults::endpoint_path(),
            action: defaults::action(),
            per_page: defaults::per_page(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            cookie: None,
            nonce: None,
            nonce_script_selector: defaults::nonce_script_selector(),
            link_selector: defaults::link_selector(),
            progress_every: defaults::progress_every(),
        }
    }
}

/// Output file names, relative to the storage directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "defaults::stories_file")]
    pub stories_file: String,

    #[serde(default = "defaults::failure_log")]
    pub failure_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stories_file: defaults::stories_file(),
            failure_log: defaults::failure_log(),
        }
    }
}

mod defaults {
    use crate::models::Outlet;

    // Browser defaults
    pub fn webdriver_url() -> String {
        "http://localhost:4444".into()
    }
    pub fn headless() -> bool {
        true
    }
    pub fn element_wait() -> u64 {
        5
    }
    pub fn reset_every() -> usize {
        50
    }

    // Feed defaults
    pub fn item_selector() -> String {
        ".recent-posts div.item".into()
    }
    pub fn link_selector() -> String {
        "a.item-title".into()
    }
    pub fn load_more_selector() -> String {
        ".load-more-button".into()
    }
    pub fn feed_page_size() -> usize {
        8
    }
    pub fn load_more_pause() -> u64 {
        2000
    }

    // Story defaults
    pub fn title_selector() -> String {
        "h1.entry-title".into()
    }
    pub fn author_selector() -> String {
        "span.post-author".into()
    }
    pub fn section_selector() -> String {
        "a.post-category".into()
    }

    // AJAX defaults
    pub fn endpoint_path() -> String {
        "/wp-admin/admin-ajax.php".into()
    }
    pub fn action() -> String {
        "load_more_posts".into()
    }
    pub fn per_page() -> usize {
        300
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn nonce_script_selector() -> String {
        "#site-script-js-extra".into()
    }
    pub fn progress_every() -> usize {
        20
    }

    // Output defaults
    pub fn stories_file() -> String {
        "stories.json".into()
    }
    pub fn failure_log() -> String {
        "courierscraper.log".into()
    }

    // Iowa Starting Line uses a different theme and is left out.
    pub fn outlets() -> Vec<Outlet> {
        vec![
            Outlet::new("Cardinal & Pine", "https://cardinalpine.com"),
            Outlet::new("The Gander", "https://gandernewsroom.com"),
            Outlet::new("UpNorthNews", "https://upnorthnewswi.com"),
            Outlet::new("The Copper Courier", "https://coppercourier.com"),
            Outlet::new("Dogwood", "https://vadogwood.com"),
            Outlet::new("The Keystone", "https://keystonenewsroom.com"),
            Outlet::new("Floricua", "https://theamericanonews.com/floricua"),
        ]
    }
}
