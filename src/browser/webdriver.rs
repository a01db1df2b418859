// src/browser/webdriver.rs

//! WebDriver-backed browser session (geckodriver + Firefox).

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::error::{WebDriverError, WebDriverErrorInner};
use thirtyfour::prelude::*;

use crate::browser::{BrowserSession, SessionFactory};
use crate::error::{AppError, Result};
use crate::models::BrowserConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches Firefox sessions against a running WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    server_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            server_url: config.webdriver_url.clone(),
            headless: config.headless,
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let mut caps = DesiredCapabilities::firefox();
        if self.headless {
            caps.set_headless()?;
        }
        log::debug!("Starting WebDriver session at {}", self.server_url);
        let driver = WebDriver::new(self.server_url.as_str(), caps).await?;
        Ok(Box::new(WebDriverSession { driver }))
    }
}

/// A wait that runs out surfaces as `NoSuchElement`; report it as
/// `ElementNotFound` so extraction can retry.
fn map_wait_error(err: WebDriverError, css: &str) -> AppError {
    match err.as_inner() {
        WebDriverErrorInner::NoSuchElement(..) => AppError::element_not_found(css),
        _ => AppError::from(err),
    }
}

/// A live WebDriver session.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    async fn first(&self, css: &str) -> Result<Option<WebElement>> {
        let mut found = self.driver.find_all(By::Css(css)).await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn open_tab(&mut self, url: &str) -> Result<()> {
        let handle = self.driver.new_tab().await?;
        self.driver.switch_to_window(handle).await?;
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<()> {
        self.driver.close_window().await?;
        let handles = self.driver.windows().await?;
        if let Some(first) = handles.into_iter().next() {
            self.driver.switch_to_window(first).await?;
        }
        Ok(())
    }

    async fn wait_for_text(&mut self, css: &str, timeout: Duration) -> Result<String> {
        let element = self
            .driver
            .query(By::Css(css))
            .wait(timeout, POLL_INTERVAL)
            .first()
            .await
            .map_err(|e| map_wait_error(e, css))?;
        Ok(element.text().await?)
    }

    async fn inner_html(&mut self, css: &str) -> Result<String> {
        let element = self
            .first(css)
            .await?
            .ok_or_else(|| AppError::element_not_found(css))?;
        Ok(element.inner_html().await?)
    }

    async fn child_attributes(
        &mut self,
        parent_css: &str,
        child_css: &str,
        attr: &str,
    ) -> Result<Vec<Option<String>>> {
        let parents = self.driver.find_all(By::Css(parent_css)).await?;
        let mut values = Vec::with_capacity(parents.len());
        for parent in parents {
            let children = parent.find_all(By::Css(child_css)).await?;
            let value = match children.first() {
                Some(child) => child.attr(attr).await?,
                None => None,
            };
            values.push(value);
        }
        Ok(values)
    }

    async fn click(&mut self, css: &str) -> Result<bool> {
        let Some(element) = self.first(css).await? else {
            return Ok(false);
        };
        element.scroll_into_view().await?;
        element.click().await?;
        Ok(true)
    }

    async fn quit(&mut self) -> Result<()> {
        self.driver.clone().quit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a running geckodriver on localhost:4444"]
    async fn launches_and_quits_headless_firefox() {
        let launcher = WebDriverLauncher::new(&BrowserConfig::default());
        let mut session = launcher.launch().await.unwrap();
        session.goto("about:blank").await.unwrap();
        session.quit().await.unwrap();
    }

    #[test]
    fn wait_timeout_maps_to_element_not_found() {
        let err = thirtyfour::error::no_such_element("h1.entry-title not found".to_string());
        let mapped = map_wait_error(err, "h1.entry-title");
        assert!(mapped.is_element_not_found());
        assert!(mapped.to_string().contains("h1.entry-title"));
    }

    #[test]
    fn other_webdriver_errors_pass_through() {
        let err = WebDriverError::from_inner(WebDriverErrorInner::InvalidUrl(
            url::ParseError::EmptyHost,
        ));
        let mapped = map_wait_error(err, "h1.entry-title");
        assert!(matches!(mapped, AppError::WebDriver(_)));
    }

    #[test]
    fn launcher_copies_browser_config() {
        let config = BrowserConfig {
            webdriver_url: "http://127.0.0.1:9515".to_string(),
            headless: false,
            ..BrowserConfig::default()
        };
        let launcher = WebDriverLauncher::new(&config);
        assert_eq!(launcher.server_url, "http://127.0.0.1:9515");
        assert!(!launcher.headless);
    }
}
