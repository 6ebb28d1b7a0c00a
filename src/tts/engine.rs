//! Synthesis capability trait and implementations.
//!
//! # Overview
//!
//! [`SynthesisEngine`] is the narrow interface the mode controller
//! drives.  It is object-safe and `Send` so it can be held behind a
//! `Box<dyn SynthesisEngine>`.
//!
//! [`EspeakEngine`] is the production implementation: it shells out to
//! `espeak-ng` (one child process per utterance) and reports playback
//! completion through the shared engine-event channel.
//!
//! [`MockSynthesis`] (under `#[cfg(test)]`) records every call through
//! a shared log so the controller can be tested without any external
//! program.

use std::process::{Child, Command, Stdio};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::controller::EngineEvent;
use crate::tts::voice::Voice;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// All errors that can arise from the synthesis subsystem.
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    /// The speech program could not be launched (missing binary,
    /// permissions, …).
    #[error("cannot launch speech program: {0}")]
    Spawn(String),
}

// ---------------------------------------------------------------------------
// SynthesisEngine trait
// ---------------------------------------------------------------------------

/// Object-safe interface for text-to-speech backends.
///
/// # Contract
///
/// - [`speak`] starts playback and returns immediately; when playback
///   finishes naturally the engine sends [`EngineEvent::SpeechEnded`]
///   on its event channel.
/// - [`cancel`] stops any in-progress playback and suppresses the
///   completion event for the cancelled utterance.
/// - [`list_voices`] may return an empty list before the backend has
///   finished enumerating; [`EngineEvent::VoicesChanged`] fires when
///   the list becomes available or changes.
///
/// [`speak`]: SynthesisEngine::speak
/// [`cancel`]: SynthesisEngine::cancel
/// [`list_voices`]: SynthesisEngine::list_voices
pub trait SynthesisEngine: Send {
    /// Current voice list, in backend order.
    fn list_voices(&self) -> Vec<Voice>;

    /// Begin speaking `text` with `voice` (backend default when `None`).
    fn speak(&mut self, text: &str, voice: Option<&Voice>) -> Result<(), TtsError>;

    /// Stop any in-progress playback.  No completion event follows.
    fn cancel(&mut self);
}

// Compile-time assertion: Box<dyn SynthesisEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SynthesisEngine>) {}
};

// ---------------------------------------------------------------------------
// EspeakEngine
// ---------------------------------------------------------------------------

/// How often the watcher thread polls the child for exit.
const WATCH_INTERVAL: Duration = Duration::from_millis(50);

/// A running utterance: the child process plus its cancel flag.
struct Utterance {
    child: Arc<Mutex<Child>>,
    cancelled: Arc<AtomicBool>,
}

/// Production TTS backend that shells out to `espeak-ng`.
///
/// The voice list is enumerated on a background thread at construction
/// (`espeak-ng --voices`); [`EngineEvent::VoicesChanged`] is sent when
/// the enumeration completes, mirroring platforms that load their voice
/// lists asynchronously.  Each [`speak`] call spawns one child process;
/// a watcher thread polls it and sends [`EngineEvent::SpeechEnded`] on
/// natural exit unless the utterance was cancelled.
///
/// [`speak`]: SynthesisEngine::speak
pub struct EspeakEngine {
    program: String,
    voices: Arc<Mutex<Vec<Voice>>>,
    events: mpsc::Sender<EngineEvent>,
    current: Option<Utterance>,
}

impl std::fmt::Debug for EspeakEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspeakEngine")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl EspeakEngine {
    /// Create an engine around `program` (normally `"espeak-ng"`) and
    /// start enumerating its voices in the background.
    pub fn new(program: impl Into<String>, events: mpsc::Sender<EngineEvent>) -> Self {
        let program = program.into();
        let voices = Arc::new(Mutex::new(Vec::new()));

        {
            let program = program.clone();
            let voices = Arc::clone(&voices);
            let events = events.clone();
            std::thread::Builder::new()
                .name("tts-voice-list".into())
                .spawn(move || {
                    let list = enumerate_voices(&program);
                    if list.is_empty() {
                        log::warn!("`{program} --voices` returned no voices");
                    } else {
                        log::info!("{} voices reported by {program}", list.len());
                    }
                    *voices.lock().unwrap() = list;
                    let _ = events.blocking_send(EngineEvent::VoicesChanged);
                })
                .expect("failed to spawn tts-voice-list thread");
        }

        Self {
            program,
            voices,
            events,
            current: None,
        }
    }
}

impl SynthesisEngine for EspeakEngine {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }

    fn speak(&mut self, text: &str, voice: Option<&Voice>) -> Result<(), TtsError> {
        // One utterance at a time; the controller never overlaps them,
        // but a stale finished utterance may still be held here.
        self.cancel();

        let mut cmd = Command::new(&self.program);
        if let Some(v) = voice {
            cmd.arg("-v").arg(&v.id);
        }
        cmd.arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| TtsError::Spawn(e.to_string()))?;
        log::debug!("speaking {} bytes via {}", text.len(), self.program);

        let child = Arc::new(Mutex::new(child));
        let cancelled = Arc::new(AtomicBool::new(false));

        {
            let child = Arc::clone(&child);
            let cancelled = Arc::clone(&cancelled);
            let events = self.events.clone();
            std::thread::Builder::new()
                .name("tts-watch".into())
                .spawn(move || {
                    loop {
                        if cancelled.load(Ordering::SeqCst) {
                            return;
                        }
                        match child.lock().unwrap().try_wait() {
                            Ok(Some(_)) => break,
                            Ok(None) => {}
                            Err(e) => {
                                log::warn!("waiting on speech process failed: {e}");
                                break;
                            }
                        }
                        std::thread::sleep(WATCH_INTERVAL);
                    }
                    if !cancelled.load(Ordering::SeqCst) {
                        let _ = events.blocking_send(EngineEvent::SpeechEnded);
                    }
                })
                .expect("failed to spawn tts-watch thread");
        }

        self.current = Some(Utterance { child, cancelled });
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(utt) = self.current.take() {
            utt.cancelled.store(true, Ordering::SeqCst);
            let mut child = utt.child.lock().unwrap();
            if let Err(e) = child.kill() {
                // Already exited — nothing to stop.
                log::debug!("speech process kill: {e}");
            }
            let _ = child.wait();
        }
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `<program> --voices` and parse its table.
///
/// espeak-ng prints one header line followed by rows of the form
///
/// ```text
/// Pty Language       Age/Gender VoiceName        File            Other Languages
///  5  en-US           M  english-us             gmw/en-US
/// ```
///
/// Columns are whitespace-separated: language, gender, name, file.
/// The file column becomes the voice id passed back via `-v`.
fn enumerate_voices(program: &str) -> Vec<Voice> {
    let output = match Command::new(program).arg("--voices").output() {
        Ok(out) if out.status.success() => out,
        Ok(out) => {
            log::warn!("`{program} --voices` exited with {}", out.status);
            return Vec::new();
        }
        Err(e) => {
            log::warn!("cannot run `{program} --voices`: {e}");
            return Vec::new();
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .skip(1) // header
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 {
                return None;
            }
            Some(Voice {
                language: fields[1].to_string(),
                name: fields[3].to_string(),
                id: fields[4].to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// MockSynthesis  (test-only)
// ---------------------------------------------------------------------------

/// Call log shared between a [`MockSynthesis`] and the test that owns it.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSynthesisLog {
    /// `(text, voice id)` for every `speak` call.
    pub spoken: Vec<(String, Option<String>)>,
    /// Number of `cancel` calls.
    pub cancels: usize,
}

/// A test double that records calls instead of producing audio.
#[cfg(test)]
pub struct MockSynthesis {
    voices: Vec<Voice>,
    log: Arc<Mutex<MockSynthesisLog>>,
    fail_speak: Option<TtsError>,
}

#[cfg(test)]
impl MockSynthesis {
    /// A mock whose `speak` always succeeds.
    pub fn new(voices: Vec<Voice>) -> (Self, Arc<Mutex<MockSynthesisLog>>) {
        let log = Arc::new(Mutex::new(MockSynthesisLog::default()));
        (
            Self {
                voices,
                log: Arc::clone(&log),
                fail_speak: None,
            },
            log,
        )
    }

    /// A mock whose `speak` always returns `error`.
    pub fn failing(error: TtsError) -> (Self, Arc<Mutex<MockSynthesisLog>>) {
        let log = Arc::new(Mutex::new(MockSynthesisLog::default()));
        (
            Self {
                voices: Vec::new(),
                log: Arc::clone(&log),
                fail_speak: Some(error),
            },
            log,
        )
    }
}

#[cfg(test)]
impl SynthesisEngine for MockSynthesis {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, text: &str, voice: Option<&Voice>) -> Result<(), TtsError> {
        if let Some(err) = &self.fail_speak {
            return Err(err.clone());
        }
        self.log
            .lock()
            .unwrap()
            .spoken
            .push((text.to_string(), voice.map(|v| v.id.clone())));
        Ok(())
    }

    fn cancel(&mut self) {
        self.log.lock().unwrap().cancels += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str) -> Voice {
        Voice {
            id: id.into(),
            name: id.into(),
            language: "en".into(),
        }
    }

    // --- MockSynthesis ---

    #[test]
    fn mock_records_speak_calls() {
        let (mut tts, log) = MockSynthesis::new(vec![voice("gmw/en")]);
        tts.speak("hello", Some(&voice("gmw/en"))).unwrap();
        tts.speak("again", None).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(
            log.spoken,
            vec![
                ("hello".to_string(), Some("gmw/en".to_string())),
                ("again".to_string(), None),
            ]
        );
    }

    #[test]
    fn mock_records_cancel_calls() {
        let (mut tts, log) = MockSynthesis::new(Vec::new());
        tts.cancel();
        tts.cancel();
        assert_eq!(log.lock().unwrap().cancels, 2);
    }

    #[test]
    fn failing_mock_returns_configured_error() {
        let (mut tts, log) = MockSynthesis::failing(TtsError::Spawn("nope".into()));
        let err = tts.speak("hello", None).unwrap_err();
        assert!(matches!(err, TtsError::Spawn(_)));
        assert!(log.lock().unwrap().spoken.is_empty());
    }

    // --- SynthesisEngine object safety ---

    #[test]
    fn box_dyn_synthesis_engine_compiles() {
        let (tts, _log) = MockSynthesis::new(Vec::new());
        let mut engine: Box<dyn SynthesisEngine> = Box::new(tts);
        let _ = engine.speak("x", None);
    }

    // --- voice table parsing ---

    #[test]
    fn enumerate_voices_on_missing_program_returns_empty() {
        let voices = enumerate_voices("/nonexistent/espeak-ng");
        assert!(voices.is_empty());
    }

    // --- TtsError display ---

    #[test]
    fn spawn_error_mentions_the_cause() {
        let e = TtsError::Spawn("No such file".into());
        assert!(e.to_string().contains("No such file"));
    }
}
