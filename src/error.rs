// src/error.rs

//! Unified error handling for the scraper.

use std::fmt;

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Browser automation failed
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A selector did not resolve within the wait bound
    #[error("Element '{selector}' not found")]
    ElementNotFound { selector: String },

    /// Nonce could not be obtained from the landing page
    #[error("Nonce error: {0}")]
    Nonce(String),

    /// The AJAX endpoint answered with something other than the expected payload
    #[error("Unexpected response from {endpoint}: {message}")]
    ResponseShape { endpoint: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    pub fn nonce(message: impl Into<String>) -> Self {
        Self::Nonce(message.into())
    }

    /// Create a response shape error for an endpoint.
    pub fn response_shape(endpoint: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ResponseShape {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error is the timeout kind that extraction retries.
    pub fn is_element_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_not_found_is_retryable() {
        assert!(AppError::element_not_found("h1.entry-title").is_element_not_found());
        assert!(!AppError::nonce("missing").is_element_not_found());
    }

    #[test]
    fn response_shape_message_names_endpoint() {
        let err = AppError::response_shape("https://x.test/wp-admin/admin-ajax.php", "not JSON");
        assert_eq!(
            err.to_string(),
            "Unexpected response from https://x.test/wp-admin/admin-ajax.php: not JSON"
        );
    }
}
