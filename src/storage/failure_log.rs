// src/storage/failure_log.rs

//! Append-only text log of per-outlet progress and failed stories.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{Failure, Outlet, PaginationState};

/// Failure log file opened in append mode.
pub struct FailureLog {
    path: PathBuf,
    file: File,
}

impl FailureLog {
    /// Open (or create) the log at `path`, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let stamped = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), line);
        self.file.write_all(stamped.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }

    pub async fn outlet_started(&mut self, outlet: &Outlet, expected: Option<u64>) -> Result<()> {
        let expected = expected.map_or_else(|| "unknown".to_string(), |n| n.to_string());
        self.write_line(&format!(
            "Start scraping {}. Stories expected: {}",
            outlet.url, expected
        ))
        .await
    }

    pub async fn record(&mut self, failure: &Failure) -> Result<()> {
        self.write_line(&format!(
            "Scrape failed for {}: {}",
            failure.url, failure.reason
        ))
        .await
    }

    pub async fn outlet_finished(&mut self, outlet: &Outlet, state: &PaginationState) -> Result<()> {
        self.write_line(&format!(
            "Finished scraping {}. Stories scraped: {}",
            outlet.url,
            state.progress()
        ))
        .await
    }
}
