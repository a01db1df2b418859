// src/models/outlet.rs

//! Outlet (one Courier news site) definition.

use serde::{Deserialize, Serialize};

/// A WordPress-based news site whose feed is scraped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outlet {
    /// Display name (e.g., "Cardinal & Pine")
    pub name: String,

    /// Landing page URL; may carry a path for sub-sites
    pub url: String,
}

impl Outlet {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Full URL of the AJAX endpoint for this outlet.
    ///
    /// The path is appended rather than joined so sub-site prefixes such as
    /// `/floricua` are preserved.
    pub fn ajax_endpoint(&self, endpoint_path: &str) -> String {
        format!("{}{}", self.base_url(), endpoint_path)
    }
}
