use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use gc_ascii::pipeline::ConversionPipeline;
use gc_core::config::Settings;
use gc_core::traits::{DisplaySink, FrameSource};

use crate::session::{PlaybackSession, PlaybackState};

/// How long [`Player::open`] waits for a superseded pump to hand back its
/// pipeline.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(500);

/// Owns at most one [`PlaybackSession`] and replaces it on demand.
///
/// Replacing a source cancels the old session, waits for its pump to stop
/// (bounded by the grace period), reclaims its pipeline and starts a new
/// session with a fresh control token. If the old pump does not report in
/// time the new session gets a fresh pipeline, so two pumps never share one.
pub struct Player {
    settings: Arc<ArcSwap<Settings>>,
    sink: Arc<dyn DisplaySink>,
    session: Option<PlaybackSession>,
    spare: Option<ConversionPipeline>,
    grace: Duration,
}

impl Player {
    #[must_use]
    pub fn new(settings: Arc<ArcSwap<Settings>>, sink: Arc<dyn DisplaySink>) -> Self {
        Self {
            settings,
            sink,
            session: None,
            spare: None,
            grace: DEFAULT_GRACE,
        }
    }

    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Start playing `source`, superseding any active session.
    ///
    /// # Errors
    /// Returns an error if the pump thread cannot be spawned.
    pub fn open<S: FrameSource>(&mut self, source: S) -> Result<()> {
        self.close();
        let params = self.settings.load().scale_parameters();
        let pipeline = match self.spare.take() {
            Some(mut pipeline) => {
                pipeline.clear();
                pipeline.set_params(params);
                pipeline
            }
            None => ConversionPipeline::new(params),
        };
        let session = PlaybackSession::start(
            source,
            pipeline,
            Arc::clone(&self.settings),
            Arc::clone(&self.sink),
        )?;
        self.session = Some(session);
        Ok(())
    }

    /// Cancel the active session, if any, and reclaim its pipeline.
    pub fn close(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.cancel();
        match session.wait(self.grace) {
            Some(exit) => {
                log::debug!(
                    "Player: previous session stopped ({:?}, {} frames)",
                    exit.reason,
                    exit.frames_published
                );
                self.spare = Some(exit.pipeline);
            }
            None => log::warn!(
                "Player: previous session still running after {:?}, detaching it",
                self.grace
            ),
        }
    }

    pub fn pause(&self) {
        if let Some(session) = &self.session {
            session.pause();
        }
    }

    pub fn resume(&self) {
        if let Some(session) = &self.session {
            session.resume();
        }
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&self) {
        match self.state() {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle | PlaybackState::Cancelled => {}
        }
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.session
            .as_ref()
            .map_or(PlaybackState::Idle, PlaybackSession::state)
    }

    /// Shared live settings. Stores take effect from the next frame.
    #[must_use]
    pub fn settings(&self) -> Arc<ArcSwap<Settings>> {
        Arc::clone(&self.settings)
    }

    /// Frames published by the active session.
    #[must_use]
    pub fn frames_published(&self) -> u64 {
        self.session
            .as_ref()
            .map_or(0, PlaybackSession::frames_published)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.close();
    }
}
