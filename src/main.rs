//! Application entry point — voicepad.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults on first run).
//! 3. Create the engine-event channel.
//! 4. Build the synthesis backend (`espeak-ng`; voice enumeration
//!    starts in the background).
//! 5. Build the recognition backend — the configured transcriber
//!    command, or the unavailable stand-in so listening reports why it
//!    cannot work instead of silently failing.
//! 6. Build the [`ModeController`] and run [`eframe::run_native`] —
//!    blocks the main thread until the window is closed.

use eframe::egui;
use tokio::sync::mpsc;

use voicepad::{
    app::VoicePadApp,
    config::AppConfig,
    controller::{EngineEvent, ModeController},
    stt::{
        CommandRecognition, RecognitionEngine, SessionConfig, SessionHandle,
        UnavailableRecognition,
    },
    tts::EspeakEngine,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([560.0, 420.0])
        .with_min_inner_size([400.0, 280.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("voicepad starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Engine-event channel — every backend notification funnels
    //    through here and is handled one at a time on the UI thread.
    let (events_tx, events_rx) = mpsc::channel::<EngineEvent>(64);

    // 4. Synthesis backend
    let tts = EspeakEngine::new(config.tts.program.clone(), events_tx.clone());

    // 5. Recognition backend (degrade gracefully when not configured)
    let stt: Box<dyn RecognitionEngine> = match &config.stt.command {
        Some(command) => match CommandRecognition::new(command, events_tx.clone()) {
            Ok(engine) => {
                log::info!("transcriber configured: {command}");
                Box::new(engine)
            }
            Err(e) => {
                log::warn!("invalid transcriber command ({e}); listening disabled");
                Box::new(UnavailableRecognition::new(e.to_string()))
            }
        },
        None => Box::new(UnavailableRecognition::new(
            "no transcriber command configured (set [stt] command in settings.toml)",
        )),
    };

    let session_config = SessionConfig {
        language: config.speech.language.clone(),
        continuous: config.speech.continuous,
    };
    let session = SessionHandle::new(stt, session_config);

    // 6. Controller + UI
    let controller =
        ModeController::new(Box::new(tts), session, config.tts.default_voice.clone());
    let options = native_options(&config);
    let app = VoicePadApp::new(controller, events_rx, config);

    eframe::run_native("voicepad", options, Box::new(move |_cc| Ok(Box::new(app))))
}
