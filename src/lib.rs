//! voicepad — type or dictate text, hear it spoken.
//!
//! A small desktop utility around two externally-owned speech engines:
//! a text-to-speech backend reads the text area aloud, a speech-to-text
//! backend dictates into it. voicepad implements neither engine — it
//! orchestrates them, and the interesting part is the mode arbitration
//! that keeps speaking and listening mutually exclusive (the device's
//! own speech output would otherwise feed back into its microphone and
//! corrupt the transcript).
//!
//! # Architecture
//!
//! ```text
//! user input (egui)                engine watcher threads
//!        │                                  │
//!        ▼                                  ▼ EngineEvent (mpsc)
//! ModeController ◀──────────────────────────┘
//!   ├─ Mode (Idle / Speaking / Listening)
//!   ├─ VoiceRegistry     (mirror of the TTS backend's voice list)
//!   ├─ TranscriptBuffer  (the text area; fragments appended here)
//!   └─ SessionHandle     (owns the live recognition session)
//! ```
//!
//! The controller is synchronous and runs entirely on the UI thread;
//! engines report back through a single `tokio::sync::mpsc` channel
//! that the egui app drains each frame, so events are handled one at a
//! time in arrival order and no locking is needed.

pub mod app;
pub mod config;
pub mod controller;
pub mod stt;
pub mod transcript;
pub mod tts;
