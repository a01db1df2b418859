// src/services/ajax.rs

//! Client for the WordPress `load_more_posts` AJAX action.
//!
//! The endpoint answers with JSON whose string fields carry rendered feed
//! markup. The body is decoded as JSON first and the markup is then parsed
//! as HTML, so a change in escaping cannot silently turn into an empty page.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::COOKIE;
use reqwest::multipart::Form;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{AjaxConfig, Nonce};
use crate::utils::http;

/// One decoded page of story links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AjaxPage {
    /// Story URLs in feed order, without duplicates
    pub urls: Vec<String>,

    /// Total story count, when the response carries one
    pub total: Option<u64>,
}

impl AjaxPage {
    /// An empty page ends pagination for the outlet.
    pub fn is_exhausted(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Source of story-link pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        nonce: &Nonce,
        page: usize,
        per_page: usize,
        endpoint: &str,
    ) -> Result<AjaxPage>;
}

/// HTTP implementation of [`PageSource`].
pub struct AjaxClient {
    client: Client,
    action: String,
    cookie: Option<String>,
    link_selector: Selector,
}

impl AjaxClient {
    pub fn new(config: &AjaxConfig) -> Result<Self> {
        let client = http::create_async_client(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            action: config.action.clone(),
            cookie: config.cookie.clone(),
            link_selector: parse_selector(&config.link_selector)?,
        })
    }
}

#[async_trait]
impl PageSource for AjaxClient {
    async fn fetch_page(
        &self,
        nonce: &Nonce,
        page: usize,
        per_page: usize,
        endpoint: &str,
    ) -> Result<AjaxPage> {
        let form = Form::new()
            .text("action", self.action.clone())
            .text("nonce", nonce.as_str().to_string())
            .text("per_page", per_page.to_string())
            .text("page", page.to_string());

        let mut request = self.client.post(endpoint).multipart(form);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        log::debug!("POST {} page={} per_page={}", endpoint, page, per_page);
        let body = request.send().await?.error_for_status()?.text().await?;
        parse_response(&body, &self.link_selector, endpoint)
    }
}

/// Decode a `load_more_posts` response body.
pub fn parse_response(body: &str, link_selector: &Selector, endpoint: &str) -> Result<AjaxPage> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::response_shape(endpoint, format!("body is not JSON ({e})")))?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(AppError::response_shape(
            endpoint,
            "request rejected (stale nonce or cookie?)",
        ));
    }

    let total = find_total(&value);
    let mut fragments = Vec::new();
    collect_markup(&value, &mut fragments);

    let succeeded = value.get("success").and_then(Value::as_bool) == Some(true);
    if total.is_none() && fragments.is_empty() && !succeeded && !has_markup_field(&value) {
        return Err(AppError::response_shape(
            endpoint,
            "neither markup nor a total field present",
        ));
    }

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for fragment in fragments {
        let html = Html::parse_fragment(fragment);
        for anchor in html.select(link_selector) {
            if let Some(href) = anchor.value().attr("href") {
                if seen.insert(href.to_string()) {
                    urls.push(href.to_string());
                }
            }
        }
    }

    Ok(AjaxPage { urls, total })
}

/// First numeric `total` field, searched depth-first.
fn find_total(value: &Value) -> Option<u64> {
    match value {
        Value::Object(map) => map
            .get("total")
            .and_then(|t| t.as_u64().or_else(|| t.as_str()?.parse().ok()))
            .or_else(|| map.values().find_map(find_total)),
        Value::Array(items) => items.iter().find_map(find_total),
        _ => None,
    }
}

/// String leaves that look like markup.
fn collect_markup<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) if s.contains('<') => out.push(s),
        Value::Object(map) => map.values().for_each(|v| collect_markup(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_markup(v, out)),
        _ => {}
    }
}

/// Whether an `html` string field exists anywhere, even an empty one.
fn has_markup_field(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.get("html").is_some_and(Value::is_string) || map.values().any(has_markup_field)
        }
        Value::Array(items) => items.iter().any(has_markup_field),
        _ => false,
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ENDPOINT: &str = "https://cardinalpine.com/wp-admin/admin-ajax.php";

    fn selector() -> Selector {
        parse_selector("a.item-title").unwrap()
    }

    fn body(links: &[&str], total: u64) -> String {
        let html: String = links
            .iter()
            .map(|l| format!(r#"<div class="item"><a class="item-title" href="{l}">Headline</a></div>"#))
            .collect();
        serde_json::json!({ "success": true, "data": { "html": html, "total": total, "pages": 3 } })
            .to_string()
    }

    #[test]
    fn test_parse_extracts_links_and_total() {
        let raw = body(
            &["https://cardinalpine.com/a/", "https://cardinalpine.com/b/"],
            640,
        );
        let page = parse_response(&raw, &selector(), ENDPOINT).unwrap();
        assert_eq!(
            page.urls,
            vec!["https://cardinalpine.com/a/", "https://cardinalpine.com/b/"]
        );
        assert_eq!(page.total, Some(640));
    }

    #[test]
    fn test_parse_handles_escaped_slashes() {
        let raw = r#"{"html":"<a class=\"item-title\" href=\"https:\/\/vadogwood.com\/x\/\">X<\/a>","total":1,"max":1}"#;
        let page = parse_response(raw, &selector(), ENDPOINT).unwrap();
        assert_eq!(page.urls, vec!["https://vadogwood.com/x/"]);
    }

    #[test]
    fn test_parse_dedupes_in_order() {
        let raw = body(
            &[
                "https://cardinalpine.com/a/",
                "https://cardinalpine.com/b/",
                "https://cardinalpine.com/a/",
            ],
            2,
        );
        let page = parse_response(&raw, &selector(), ENDPOINT).unwrap();
        assert_eq!(page.urls.len(), 2);
        assert_eq!(page.urls[0], "https://cardinalpine.com/a/");
    }

    #[test]
    fn test_parse_empty_page_is_exhausted() {
        let raw = body(&[], 640);
        let page = parse_response(&raw, &selector(), ENDPOINT).unwrap();
        assert!(page.is_exhausted());
        assert_eq!(page.total, Some(640));
    }

    #[test]
    fn test_parse_empty_last_page_without_total() {
        for raw in [
            r#"{"success":true,"data":{"html":""}}"#,
            r#"{"success":true,"data":{"html":"","pages":3}}"#,
            r#"{"success":true,"data":[]}"#,
            r#"{"html":""}"#,
        ] {
            let page = parse_response(raw, &selector(), ENDPOINT).unwrap();
            assert!(page.is_exhausted(), "{raw}");
            assert_eq!(page.total, None);
        }
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_response("<html>Bad gateway</html>", &selector(), ENDPOINT).unwrap_err();
        assert!(matches!(err, AppError::ResponseShape { .. }));
    }

    #[test]
    fn test_parse_rejects_wp_error() {
        let err = parse_response(r#"{"success":false,"data":"-1"}"#, &selector(), ENDPOINT)
            .unwrap_err();
        assert!(matches!(err, AppError::ResponseShape { .. }));
    }

    #[test]
    fn test_parse_rejects_unrelated_json() {
        let err = parse_response(r#"{"status":"ok"}"#, &selector(), ENDPOINT).unwrap_err();
        assert!(matches!(err, AppError::ResponseShape { .. }));
    }

    #[tokio::test]
    async fn test_fetch_page_posts_multipart_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/wp-admin/admin-ajax.php")
            .match_header("cookie", "wordpress_test=1")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="action"\r\n\r\nload_more_posts\r\n"#.to_string()),
                Matcher::Regex(r#"name="nonce"\r\n\r\nabc123\r\n"#.to_string()),
                Matcher::Regex(r#"name="per_page"\r\n\r\n300\r\n"#.to_string()),
                Matcher::Regex(r#"name="page"\r\n\r\n2\r\n"#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body(&["https://cardinalpine.com/a/"], 301))
            .create_async()
            .await;

        let config = AjaxConfig {
            cookie: Some("wordpress_test=1".to_string()),
            ..AjaxConfig::default()
        };
        let client = AjaxClient::new(&config).unwrap();
        let endpoint = format!("{}/wp-admin/admin-ajax.php", server.url());

        let page = client
            .fetch_page(&Nonce::new("abc123"), 2, 300, &endpoint)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.urls, vec!["https://cardinalpine.com/a/"]);
        assert_eq!(page.total, Some(301));
    }

    #[tokio::test]
    async fn test_fetch_page_propagates_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/wp-admin/admin-ajax.php")
            .with_status(403)
            .create_async()
            .await;

        let client = AjaxClient::new(&AjaxConfig::default()).unwrap();
        let endpoint = format!("{}/wp-admin/admin-ajax.php", server.url());

        let err = client
            .fetch_page(&Nonce::new("abc123"), 1, 300, &endpoint)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }
}
