use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use grrow_core::Clock;
use grrow_core::model::Circle;

use crate::error::SessionError;
use crate::loader::QuizLoader;
use super::engine::QuizSession;

/// Orchestrates circle loads and session creation.
///
/// Each circle selection reloads content wholesale and binds a fresh session
/// (pointer at the first intro, answers empty). A shared request epoch keeps
/// concurrent selections honest: if a newer circle was requested while a load
/// was in flight, the stale result is discarded on arrival rather than
/// applied — the last-requested circle always wins.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    loader: QuizLoader,
    version: String,
    epoch: Arc<AtomicU64>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(clock: Clock, loader: QuizLoader, version: impl Into<String>) -> Self {
        Self {
            clock,
            loader,
            version: version.into(),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Content version this flow loads.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Loads `circle` and binds a fresh session to it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` when the load fails, and
    /// `SessionError::Superseded` when a newer circle request was issued
    /// while this load was in flight.
    pub async fn start_circle(&self, circle: Circle) -> Result<QuizSession, SessionError> {
        let token = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let definition = self
            .loader
            .load_quiz_definition(circle, &self.version)
            .await?;
        if self.epoch.load(Ordering::SeqCst) != token {
            return Err(SessionError::Superseded);
        }
        Ok(QuizSession::new(definition, self.clock.now()))
    }

    /// Moves on to the next circle in the cycle (wrapping), discarding the
    /// given session's pointer and answers.
    ///
    /// # Errors
    ///
    /// See [`QuizFlowService::start_circle`].
    pub async fn next_circle(&self, session: &QuizSession) -> Result<QuizSession, SessionError> {
        self.start_circle(session.circle().next()).await
    }

    /// Redoes the current circle from scratch with freshly loaded content.
    ///
    /// # Errors
    ///
    /// See [`QuizFlowService::start_circle`].
    pub async fn restart_circle(&self, session: &QuizSession) -> Result<QuizSession, SessionError> {
        self.start_circle(session.circle()).await
    }
}
