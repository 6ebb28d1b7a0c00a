//! STT (speech-to-text) capability module.
//!
//! [`RecognitionEngine`] creates live [`RecognitionSession`]s;
//! [`SessionHandle`] gives the mode controller exclusive ownership of
//! the one session that may be outstanding.  The production backend is
//! [`CommandRecognition`] (a configured transcriber subprocess whose
//! stdout lines are recognition fragments); installations without one
//! get [`UnavailableRecognition`] so the failure is reported instead of
//! silent.

pub mod engine;
pub mod session;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{
    CommandRecognition, RecognitionEngine, RecognitionSession, SessionConfig, SttError,
    UnavailableRecognition,
};
pub use session::SessionHandle;

// test-only re-export for the controller test module.
#[cfg(test)]
pub use engine::{MockRecognition, MockRecognitionLog};
