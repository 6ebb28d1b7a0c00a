//! Mode arbitration between the speech engines.
//!
//! [`ModeController`] is the heart of the application: it owns the
//! current [`Mode`], the [`TranscriptBuffer`], the [`VoiceRegistry`]
//! and the recognition [`SessionHandle`], and it is the only place
//! state transitions happen.
//!
//! # Transition table
//!
//! ```text
//! Idle       ── speak, text non-empty ──────────▶ Speaking   tts.speak(text, voice)
//! Idle       ── speak, text empty ──────────────▶ Idle       notice "textarea is empty"
//! Listening  ── speak (any text) ───────────────▶ Listening  notice "Listening is ON Stop Listening"
//! Speaking   ── SpeechEnded ────────────────────▶ Idle
//! Speaking   ── stop speak ─────────────────────▶ Idle       tts.cancel()
//! Idle       ── start listening ────────────────▶ Listening  session.start()
//! Speaking   ── start listening ────────────────▶ Speaking   (ignored)
//! Listening  ── SessionEnded ───────────────────▶ Idle       session.release()
//! Listening  ── stop listening ─────────────────▶ Idle       session.stop()
//! ```
//!
//! Speaking and listening are mutually exclusive because the device's
//! own speech output would be picked up by its microphone and corrupt
//! the transcript; the guard is an invariant, not a convenience check.
//! All guard violations surface as a [`Notice`] and nothing is fatal —
//! the controller stays usable after any of them.

pub mod events;
pub mod mode;
pub mod notice;

pub use events::EngineEvent;
pub use mode::Mode;
pub use notice::Notice;

use crate::stt::SessionHandle;
use crate::transcript::TranscriptBuffer;
use crate::tts::{SynthesisEngine, VoiceRegistry};

// ---------------------------------------------------------------------------
// ModeController
// ---------------------------------------------------------------------------

/// Arbitrates speak and listen over the two external engines.
///
/// All methods run synchronously on the UI thread; engine completion
/// and result callbacks arrive as [`EngineEvent`]s via [`handle_event`]
/// in the order the engines delivered them.
///
/// [`handle_event`]: ModeController::handle_event
pub struct ModeController {
    mode: Mode,
    text: TranscriptBuffer,
    voices: VoiceRegistry,
    tts: Box<dyn SynthesisEngine>,
    session: SessionHandle,
    notice: Option<Notice>,
    /// Configured voice preference (`[tts] default_voice`), re-applied
    /// on every registry reload.
    preferred_voice: Option<String>,
}

impl ModeController {
    /// Build the controller and perform the initial voice-list load.
    ///
    /// The list may still be empty at this point when the backend
    /// enumerates asynchronously; [`EngineEvent::VoicesChanged`]
    /// triggers the reload once it is ready.
    ///
    /// `preferred_voice` is matched against voice names and ids on each
    /// reload; no match (or `None`) leaves the first entry selected.
    pub fn new(
        tts: Box<dyn SynthesisEngine>,
        session: SessionHandle,
        preferred_voice: Option<String>,
    ) -> Self {
        let mut controller = Self {
            mode: Mode::Idle,
            text: TranscriptBuffer::new(),
            voices: VoiceRegistry::new(),
            tts,
            session,
            notice: None,
            preferred_voice,
        };
        controller.reload_voices();
        controller
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn text(&self) -> &TranscriptBuffer {
        &self.text
    }

    /// Mutable text access for the text-edit widget binding.
    pub fn text_mut(&mut self) -> &mut TranscriptBuffer {
        &mut self.text
    }

    pub fn voices(&self) -> &VoiceRegistry {
        &self.voices
    }

    /// Select the voice at `index`; out-of-bounds is a silent no-op.
    pub fn select_voice(&mut self, index: usize) {
        self.voices.select(index);
    }

    /// Take the pending notice, if any, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // ── User requests ────────────────────────────────────────────────────

    /// "Speak" pressed.
    ///
    /// The two guards are checked in an order that gives the most
    /// specific feedback: a live session wins over empty text, so the
    /// user is told to stop listening first.
    pub fn request_speak(&mut self) {
        if self.mode.is_listening() {
            self.notice = Some(Notice::ListeningActive);
            return;
        }
        if self.text.is_empty() {
            self.notice = Some(Notice::EmptyText);
            return;
        }

        match self.tts.speak(self.text.as_str(), self.voices.selected()) {
            Ok(()) => {
                // Set immediately so the Stop button is live for the
                // whole playback, not only after completion.
                self.mode = Mode::Speaking;
            }
            Err(e) => {
                log::warn!("synthesis failed: {e}");
                self.notice = Some(Notice::SynthesisFailed(e.to_string()));
            }
        }
    }

    /// "Stop" pressed while speaking.  Cancels playback; the cancelled
    /// utterance sends no completion event.
    pub fn request_stop_speaking(&mut self) {
        if self.mode.is_speaking() {
            self.tts.cancel();
            self.mode = Mode::Idle;
        }
    }

    /// "Start Listening" pressed.  Ignored while speaking.
    pub fn request_start_listening(&mut self) {
        if self.mode.is_speaking() {
            log::debug!("start-listening ignored while speaking");
            return;
        }
        if self.mode.is_listening() {
            return;
        }

        match self.session.start() {
            Ok(()) => self.mode = Mode::Listening,
            Err(e) => {
                log::warn!("recognition session failed to start: {e}");
                self.notice = Some(Notice::RecognitionUnavailable(e.to_string()));
            }
        }
    }

    /// "Stop Listening" pressed.  Idempotent — safe with no session.
    pub fn request_stop_listening(&mut self) {
        self.session.stop();
        if self.mode.is_listening() {
            self.mode = Mode::Idle;
        }
    }

    // ── Engine events ────────────────────────────────────────────────────

    /// Feed one engine event through the transition table.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::VoicesChanged => self.reload_voices(),

            EngineEvent::SpeechEnded => {
                if self.mode.is_speaking() {
                    self.mode = Mode::Idle;
                } else {
                    // Completion that slipped past a cancel.
                    log::debug!("stray speech-ended event ignored");
                }
            }

            EngineEvent::SessionStarted => {
                // Confirmation only; Listening was entered when the
                // session was acquired.
            }

            EngineEvent::SessionEnded => {
                if self.mode.is_listening() {
                    log::info!("recognition session ended by the backend");
                    self.session.release();
                    self.mode = Mode::Idle;
                }
            }

            EngineEvent::Fragment(text) => {
                if self.mode.is_listening() {
                    self.text.append_fragment(&text);
                } else {
                    // Result delivered after the session was told to
                    // stop; discarded per contract.
                    log::debug!("fragment discarded outside listening: {text:?}");
                }
            }
        }
    }

    fn reload_voices(&mut self) {
        let list = self.tts.list_voices();
        log::debug!("voice registry reloaded: {} voices", list.len());
        self.voices.load(list);

        if let Some(pref) = &self.preferred_voice {
            let position = self.voices.iter().position(|v| v.name == *pref || v.id == *pref);
            match position {
                Some(index) => self.voices.select(index),
                None => {
                    if !self.voices.is_empty() {
                        log::debug!("configured default voice {pref:?} not found");
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
