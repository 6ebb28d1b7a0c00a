//! Exclusive ownership of the active recognition session.
//!
//! [`SessionHandle`] wraps the recognition engine and at most one live
//! session.  The mode controller is the only caller; the handle's job
//! is the session *lifetime*: start, idempotent stop, and release
//! without stop when the backend ended the session on its own.

use crate::stt::engine::{RecognitionEngine, RecognitionSession, SessionConfig, SttError};

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Owns the recognition engine and the (at most one) active session.
pub struct SessionHandle {
    engine: Box<dyn RecognitionEngine>,
    config: SessionConfig,
    active: Option<Box<dyn RecognitionSession>>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("config", &self.config)
            .field("active", &self.active.is_some())
            .finish()
    }
}

impl SessionHandle {
    /// Wrap `engine`; sessions will be created with `config`.
    pub fn new(engine: Box<dyn RecognitionEngine>, config: SessionConfig) -> Self {
        Self {
            engine,
            config,
            active: None,
        }
    }

    /// Start a new session.
    ///
    /// The controller's mode guard means this is never called with a
    /// session outstanding; if it happens anyway the existing session
    /// is kept and the call is a no-op.
    ///
    /// No retry on failure — the error is surfaced once and the handle
    /// stays inactive.
    pub fn start(&mut self) -> Result<(), SttError> {
        if self.active.is_some() {
            log::debug!("session start requested while one is outstanding; ignored");
            return Ok(());
        }
        let session = self.engine.create_session(&self.config)?;
        self.active = Some(session);
        Ok(())
    }

    /// Stop the active session and release it.  Idempotent: a stop with
    /// no session outstanding does nothing.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.stop();
        }
    }

    /// Release the session reference without stopping the backend —
    /// used when the backend reported the session ended on its own.
    pub fn release(&mut self) {
        self.active = None;
    }

    /// `true` while a session is outstanding.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
