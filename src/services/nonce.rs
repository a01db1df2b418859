//! Nonce discovery from an outlet landing page.

use std::sync::LazyLock;

use regex::Regex;

use crate::browser::BrowserSession;
use crate::error::{AppError, Result};
use crate::models::Nonce;

static NONCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"_nonce"\s*:\s*"(\w+)""#).expect("valid nonce regex"));

/// Pull the nonce out of the localized script payload, e.g.
/// `var site = {"ajax_url":"...","load_more_nonce":"a1b2c3"};`.
pub fn parse_nonce(script: &str) -> Option<Nonce> {
    NONCE_PATTERN
        .captures(script)
        .and_then(|caps| caps.get(1))
        .map(|m| Nonce::new(m.as_str()))
}

/// Navigate to `landing_url` and read the nonce from `script_selector`.
pub async fn discover_nonce(
    session: &mut dyn BrowserSession,
    landing_url: &str,
    script_selector: &str,
) -> Result<Nonce> {
    session.goto(landing_url).await?;
    let script = session.inner_html(script_selector).await.map_err(|e| {
        AppError::nonce(format!(
            "script {script_selector} not readable on {landing_url}: {e}"
        ))
    })?;
    parse_nonce(&script)
        .ok_or_else(|| AppError::nonce(format!("no nonce in {script_selector} on {landing_url}")))
}

/// Use the configured nonce if there is one, otherwise discover it.
pub async fn resolve_nonce(
    configured: Option<&str>,
    session: &mut dyn BrowserSession,
    landing_url: &str,
    script_selector: &str,
) -> Result<Nonce> {
    if let Some(value) = configured {
        log::info!("Using configured nonce");
        return Ok(Nonce::new(value));
    }
    let nonce = discover_nonce(session, landing_url, script_selector).await?;
    log::info!("Discovered nonce on {}", landing_url);
    Ok(nonce)
}
