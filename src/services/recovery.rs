// src/services/recovery.rs

//! Periodic browser session recycling.

use crate::browser::{BrowserSession, SessionFactory};
use crate::error::Result;

/// Owns the active browser session and replaces it every `reset_every`
/// processed stories.
pub struct SessionRecovery<'a> {
    factory: &'a dyn SessionFactory,
    session: Box<dyn BrowserSession>,
    reset_every: usize,
    since_reset: usize,
    resets: usize,
}

impl<'a> SessionRecovery<'a> {
    /// Launch the first session.
    pub async fn start(factory: &'a dyn SessionFactory, reset_every: usize) -> Result<Self> {
        let session = factory.launch().await?;
        Ok(Self {
            factory,
            session,
            reset_every: reset_every.max(1),
            since_reset: 0,
            resets: 0,
        })
    }

    pub fn session(&mut self) -> &mut dyn BrowserSession {
        self.session.as_mut()
    }

    /// Number of resets performed so far.
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Count one processed story (scraped or failed) and reset the session
    /// when the threshold is reached. Returns whether a reset happened.
    pub async fn story_processed(&mut self) -> Result<bool> {
        self.since_reset += 1;
        if self.since_reset < self.reset_every {
            return Ok(false);
        }
        self.reset().await?;
        Ok(true)
    }

    /// Quit the current session and launch a fresh one.
    pub async fn reset(&mut self) -> Result<()> {
        log::info!("Resetting browser session");
        if let Err(e) = self.session.quit().await {
            log::warn!("Failed to quit browser session cleanly: {}", e);
        }
        self.session = self.factory.launch().await?;
        self.since_reset = 0;
        self.resets += 1;
        Ok(())
    }

    /// Quit the session at the end of a run.
    pub async fn finish(mut self) -> Result<()> {
        self.session.quit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, FakeSite};

    #[tokio::test]
    async fn test_resets_on_threshold() {
        let site = FakeSite::default();
        let mut recovery = SessionRecovery::start(&site, 3).await.unwrap();

        let mut resets = Vec::new();
        for _ in 0..7 {
            resets.push(recovery.story_processed().await.unwrap());
        }

        assert_eq!(
            resets,
            vec![false, false, true, false, false, true, false]
        );
        assert_eq!(recovery.resets(), 2);
        let state = site.state();
        assert_eq!(state.count(&Event::Launch), 3);
        assert_eq!(state.count(&Event::Quit), 2);
    }

    #[tokio::test]
    async fn test_finish_quits_session() {
        let site = FakeSite::default();
        let recovery = SessionRecovery::start(&site, 50).await.unwrap();
        recovery.finish().await.unwrap();
        assert_eq!(site.state().count(&Event::Quit), 1);
    }
}
