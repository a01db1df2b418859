//! Local filesystem output for scrape results.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Scraper configuration
//! ├── stories.json          # Latest scrape snapshot
//! └── courierscraper.log    # Append-only failure log
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ScrapeOutcome;
use crate::storage::{StorySnapshot, StoryStorage, WriteSummary};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    stories_file: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, stories_file: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            stories_file: stories_file.into(),
        }
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl StoryStorage for LocalStorage {
    async fn write_snapshot(&self, outcome: &ScrapeOutcome) -> Result<WriteSummary> {
        let snapshot = StorySnapshot::new(outcome.clone());
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        self.write_bytes(&self.stories_file, &bytes).await?;

        let location = self.path(&self.stories_file).display().to_string();
        log::info!(
            "Wrote {} stories ({} failures) to {}",
            outcome.stats.story_count,
            outcome.stats.failure_count,
            location
        );
        Ok(WriteSummary {
            story_count: outcome.stats.story_count,
            location,
            timestamp: snapshot.updated_at,
        })
    }

    async fn load_snapshot(&self) -> Result<Option<StorySnapshot>> {
        match self.read_bytes(&self.stories_file).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
