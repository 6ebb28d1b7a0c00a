//! Events delivered by the engine backends.
//!
//! Every asynchronous callback the platform engines would normally fire
//! is represented as one explicit [`EngineEvent`] value, sent over a
//! single `tokio::sync::mpsc` channel and consumed by the mode
//! controller one at a time in arrival order.  This keeps the state
//! machine testable with no engines at all — tests hand events to the
//! controller directly.

/// One notification from an engine backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The synthesis backend's voice list changed (including its
    /// initial asynchronous load completing).
    VoicesChanged,

    /// Playback finished naturally.  Cancelled utterances do not send
    /// this; a stray one is ignored by the controller.
    SpeechEnded,

    /// The recognition session is up.  Confirmation only — the
    /// controller already entered Listening when the session was
    /// acquired.
    SessionStarted,

    /// The recognition backend ended the session on its own (timeout,
    /// engine stop, process exit).
    SessionEnded,

    /// One unit of recognized text.
    Fragment(String),
}
