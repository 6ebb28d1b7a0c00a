//! Recognition capability traits and implementations.
//!
//! # Overview
//!
//! [`RecognitionEngine`] creates sessions; a [`RecognitionSession`] is
//! the live, stateful connection to the recognition backend and must be
//! explicitly stopped.  Both traits are object-safe and `Send`.
//!
//! [`CommandRecognition`] is the production implementation: it spawns a
//! user-configured transcriber command whose stdout lines are the
//! recognition fragments.  [`UnavailableRecognition`] stands in when no
//! transcriber is configured, so the listening control fails with a
//! clear notice instead of silently doing nothing.
//!
//! [`MockRecognition`] (under `#[cfg(test)]`) records calls through a
//! shared log for controller tests.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
#[cfg(test)]
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::controller::EngineEvent;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the recognition subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// No recognition backend is available on this installation.
    #[error("no speech recognition backend: {0}")]
    Unavailable(String),

    /// The configured transcriber command line could not be parsed.
    #[error("invalid transcriber command: {0}")]
    InvalidCommand(String),

    /// The transcriber process could not be launched.
    #[error("cannot start recognition session: {0}")]
    SessionStart(String),
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Fixed configuration a recognition session is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Language tag handed to the backend (e.g. `"en-US"`).
    pub language: String,
    /// Keep accumulating results until explicitly stopped, rather than
    /// auto-terminating after a single utterance.
    pub continuous: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            continuous: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Object-safe factory for recognition sessions.
///
/// # Contract
///
/// A session delivers [`EngineEvent::SessionStarted`] once, then zero
/// or more [`EngineEvent::Fragment`]s, then
/// [`EngineEvent::SessionEnded`] when the backend ends the session on
/// its own.  A session stopped via [`RecognitionSession::stop`] sends
/// no further events.
pub trait RecognitionEngine: Send {
    /// Request a new session from the backend.
    fn create_session(
        &mut self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RecognitionSession>, SttError>;
}

/// A live recognition session.  Dropping it without calling `stop`
/// leaves the backend running; the session handle always stops it
/// explicitly.
pub trait RecognitionSession: Send {
    /// Terminate the session.  Further results are suppressed.
    fn stop(&mut self);
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn RecognitionEngine>, _: Box<dyn RecognitionSession>) {}
};

// ---------------------------------------------------------------------------
// CommandRecognition
// ---------------------------------------------------------------------------

/// Production recognition backend around a configured transcriber
/// command (settings `[stt] command`).
///
/// The command is spawned once per session with its stdout piped; every
/// line it prints is delivered as one recognition fragment.  The child
/// receives the session configuration in the environment:
/// `VOICEPAD_LANGUAGE` and `VOICEPAD_CONTINUOUS`.  EOF on stdout is the
/// backend ending the session on its own.
pub struct CommandRecognition {
    argv: Vec<String>,
    events: mpsc::Sender<EngineEvent>,
}

impl std::fmt::Debug for CommandRecognition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRecognition")
            .field("argv", &self.argv)
            .finish_non_exhaustive()
    }
}

impl CommandRecognition {
    /// Parse `command_line` (shell-style quoting) into an engine.
    pub fn new(
        command_line: &str,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, SttError> {
        let argv = shell_words::split(command_line)
            .map_err(|e| SttError::InvalidCommand(e.to_string()))?;
        if argv.is_empty() {
            return Err(SttError::InvalidCommand("empty command line".into()));
        }
        Ok(Self { argv, events })
    }
}

impl RecognitionEngine for CommandRecognition {
    fn create_session(
        &mut self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RecognitionSession>, SttError> {
        let mut cmd = Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..])
            .env("VOICEPAD_LANGUAGE", &config.language)
            .env(
                "VOICEPAD_CONTINUOUS",
                if config.continuous { "1" } else { "0" },
            )
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd
            .spawn()
            .map_err(|e| SttError::SessionStart(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SttError::SessionStart("no stdout pipe".into()))?;

        log::info!("recognition session started: {}", self.argv[0]);

        let stopped = Arc::new(AtomicBool::new(false));

        {
            let stopped = Arc::clone(&stopped);
            let events = self.events.clone();
            std::thread::Builder::new()
                .name("stt-reader".into())
                .spawn(move || {
                    let _ = events.blocking_send(EngineEvent::SessionStarted);
                    for line in BufReader::new(stdout).lines() {
                        if stopped.load(Ordering::SeqCst) {
                            return;
                        }
                        match line {
                            Ok(text) => {
                                let text = text.trim();
                                if text.is_empty() {
                                    continue;
                                }
                                let _ = events
                                    .blocking_send(EngineEvent::Fragment(text.to_string()));
                            }
                            Err(e) => {
                                log::warn!("transcriber stdout read failed: {e}");
                                break;
                            }
                        }
                    }
                    // EOF: the backend ended the session on its own.
                    if !stopped.load(Ordering::SeqCst) {
                        let _ = events.blocking_send(EngineEvent::SessionEnded);
                    }
                })
                .expect("failed to spawn stt-reader thread");
        }

        Ok(Box::new(CommandSession {
            child: Some(child),
            stopped,
        }))
    }
}

/// A live transcriber subprocess.
struct CommandSession {
    child: Option<Child>,
    stopped: Arc<AtomicBool>,
}

impl RecognitionSession for CommandSession {
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                // Already exited.
                log::debug!("transcriber kill: {e}");
            }
            let _ = child.wait();
            log::info!("recognition session stopped");
        }
    }
}

impl Drop for CommandSession {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// UnavailableRecognition
// ---------------------------------------------------------------------------

/// Stand-in engine used when no transcriber command is configured.
///
/// Every `create_session` fails with [`SttError::Unavailable`], which
/// the controller surfaces as a user notice — the listening button
/// stays visible but reports why it cannot work.
#[derive(Debug)]
pub struct UnavailableRecognition {
    reason: String,
}

impl UnavailableRecognition {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl RecognitionEngine for UnavailableRecognition {
    fn create_session(
        &mut self,
        _config: &SessionConfig,
    ) -> Result<Box<dyn RecognitionSession>, SttError> {
        Err(SttError::Unavailable(self.reason.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockRecognition  (test-only)
// ---------------------------------------------------------------------------

/// Call log shared between a [`MockRecognition`] and the test.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockRecognitionLog {
    /// `SessionConfig`s of every successfully created session.
    pub sessions: Vec<SessionConfig>,
    /// Number of `stop` calls across all sessions.
    pub stops: usize,
}

/// A test double whose sessions do nothing but record their stop calls.
#[cfg(test)]
pub struct MockRecognition {
    log: Arc<Mutex<MockRecognitionLog>>,
    fail: Option<SttError>,
}

#[cfg(test)]
impl MockRecognition {
    /// A mock whose `create_session` always succeeds.
    pub fn new() -> (Self, Arc<Mutex<MockRecognitionLog>>) {
        let log = Arc::new(Mutex::new(MockRecognitionLog::default()));
        (
            Self {
                log: Arc::clone(&log),
                fail: None,
            },
            log,
        )
    }

    /// A mock whose `create_session` always returns `error`.
    pub fn failing(error: SttError) -> (Self, Arc<Mutex<MockRecognitionLog>>) {
        let log = Arc::new(Mutex::new(MockRecognitionLog::default()));
        (
            Self {
                log: Arc::clone(&log),
                fail: Some(error),
            },
            log,
        )
    }
}

#[cfg(test)]
impl RecognitionEngine for MockRecognition {
    fn create_session(
        &mut self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RecognitionSession>, SttError> {
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        self.log.lock().unwrap().sessions.push(config.clone());
        Ok(Box::new(MockSession {
            log: Arc::clone(&self.log),
        }))
    }
}

#[cfg(test)]
struct MockSession {
    log: Arc<Mutex<MockRecognitionLog>>,
}

#[cfg(test)]
impl RecognitionSession for MockSession {
    fn stop(&mut self) {
        self.log.lock().unwrap().stops += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- CommandRecognition construction ---

    #[test]
    fn empty_command_line_is_rejected() {
        let (tx, _rx) = mpsc::channel(8);
        let err = CommandRecognition::new("", tx).unwrap_err();
        assert!(matches!(err, SttError::InvalidCommand(_)));
    }

    #[test]
    fn quoted_command_line_is_split_shell_style() {
        let (tx, _rx) = mpsc::channel(8);
        let engine =
            CommandRecognition::new("transcribe --model 'base en'", tx).unwrap();
        assert_eq!(engine.argv, ["transcribe", "--model", "base en"]);
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let (tx, _rx) = mpsc::channel(8);
        let err = CommandRecognition::new("transcribe 'oops", tx).unwrap_err();
        assert!(matches!(err, SttError::InvalidCommand(_)));
    }

    #[test]
    fn missing_program_fails_at_session_start() {
        let (tx, _rx) = mpsc::channel(8);
        let mut engine = CommandRecognition::new("/nonexistent/transcriber", tx).unwrap();
        let err = engine.create_session(&SessionConfig::default()).err().unwrap();
        assert!(matches!(err, SttError::SessionStart(_)));
    }

    // --- UnavailableRecognition ---

    #[test]
    fn unavailable_engine_always_errors() {
        let mut engine = UnavailableRecognition::new("no transcriber configured");
        let err = engine.create_session(&SessionConfig::default()).err().unwrap();
        assert!(matches!(err, SttError::Unavailable(_)));
        assert!(err.to_string().contains("no transcriber configured"));
    }

    // --- MockRecognition ---

    #[test]
    fn mock_records_sessions_and_stops() {
        let (mut engine, log) = MockRecognition::new();
        let config = SessionConfig {
            language: "de-DE".into(),
            continuous: true,
        };
        let mut session = engine.create_session(&config).unwrap();
        session.stop();

        let log = log.lock().unwrap();
        assert_eq!(log.sessions, vec![config]);
        assert_eq!(log.stops, 1);
    }

    #[test]
    fn failing_mock_returns_configured_error() {
        let (mut engine, log) = MockRecognition::failing(SttError::Unavailable("x".into()));
        assert!(engine.create_session(&SessionConfig::default()).is_err());
        assert!(log.lock().unwrap().sessions.is_empty());
    }

    // --- SessionConfig ---

    #[test]
    fn default_session_config_is_continuous_en_us() {
        let config = SessionConfig::default();
        assert_eq!(config.language, "en-US");
        assert!(config.continuous);
    }
}
