//! TTS (text-to-speech) capability module.
//!
//! [`SynthesisEngine`] is the narrow interface the mode controller
//! drives; [`EspeakEngine`] implements it over an external `espeak-ng`
//! process.  [`VoiceRegistry`] mirrors the backend's voice list and
//! tracks the user's selection.

pub mod engine;
pub mod voice;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{EspeakEngine, SynthesisEngine, TtsError};
pub use voice::{Voice, VoiceRegistry};

// test-only re-export so the controller test module can import the mock
// without spelling out the engine path.
#[cfg(test)]
pub use engine::{MockSynthesis, MockSynthesisLog};
