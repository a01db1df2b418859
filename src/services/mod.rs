//! Service layer for the scraper.
//!
//! This module contains the business logic for:
//! - Story page extraction (`StoryExtractor`)
//! - The `load_more_posts` endpoint (`AjaxClient`)
//! - Nonce discovery (`discover_nonce`)
//! - Browser session recycling (`SessionRecovery`)

mod ajax;
mod extractor;
mod nonce;
mod recovery;

pub use ajax::{AjaxClient, AjaxPage, PageSource, parse_response};
pub use extractor::StoryExtractor;
pub use nonce::{discover_nonce, parse_nonce, resolve_nonce};
pub use recovery::SessionRecovery;
