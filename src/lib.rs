// src/lib.rs

//! Courier news scraper library.
//!
//! Collects title, author, section and URL for every story published by the
//! Courier network outlets, paginating either through the landing-page
//! "load more" control or through the WordPress AJAX endpoint behind it.

pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;
