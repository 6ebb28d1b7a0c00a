//! voicepad window — egui/eframe application.
//!
//! # Architecture
//!
//! [`VoicePadApp`] is the top-level [`eframe::App`].  It owns the
//! [`ModeController`] and the receiving end of the engine-event
//! channel; each frame it drains pending [`EngineEvent`]s into the
//! controller, then renders:
//!
//! * a multiline text area bound to the transcript buffer,
//! * a voice-selection combo box mirroring the voice registry,
//! * the primary button ("Speak" / "Stop"),
//! * the secondary button ("Start Listening" / "Stop Listening"),
//! * a transient notice line, auto-cleared after a few seconds.

use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::controller::{EngineEvent, Mode, ModeController};

/// How long a notice stays visible.
const NOTICE_TIMEOUT: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// VoicePadApp
// ---------------------------------------------------------------------------

/// eframe application — the voicepad window.
pub struct VoicePadApp {
    /// The mode-arbitration state machine; single source of truth.
    controller: ModeController,
    /// Receive completion / result events from the engine backends.
    events_rx: mpsc::Receiver<EngineEvent>,
    /// Currently displayed notice and when it appeared.
    notice: Option<(String, Instant)>,
    /// Configuration as loaded at startup; written back on exit.
    config: AppConfig,
    /// Last observed window position, persisted on exit.
    window_pos: Option<(f32, f32)>,
}

impl VoicePadApp {
    pub fn new(
        controller: ModeController,
        events_rx: mpsc::Receiver<EngineEvent>,
        config: AppConfig,
    ) -> Self {
        Self {
            controller,
            events_rx,
            notice: None,
            config,
            window_pos: None,
        }
    }

    /// The configuration to write back on exit: the startup config with
    /// the last observed window position folded in.
    fn exit_config(&self) -> AppConfig {
        let mut config = self.config.clone();
        if let Some(pos) = self.window_pos {
            config.ui.window_position = Some(pos);
        }
        config
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending engine events (non-blocking) into the
    /// controller, preserving arrival order.
    fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.controller.handle_event(event);
        }
    }

    /// Pick up a freshly raised notice and expire the displayed one.
    fn update_notice(&mut self) {
        if let Some(notice) = self.controller.take_notice() {
            self.notice = Some((notice.message(), Instant::now()));
        }
        if let Some((_, since)) = &self.notice {
            if since.elapsed() >= NOTICE_TIMEOUT {
                self.notice = None;
            }
        }
    }

    // ── Widgets ──────────────────────────────────────────────────────────

    fn draw_text_area(&mut self, ui: &mut egui::Ui) {
        ui.add(
            egui::TextEdit::multiline(self.controller.text_mut().buffer_mut())
                .hint_text("Your text here")
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        );
    }

    fn draw_voice_selector(&mut self, ui: &mut egui::Ui) {
        let names: Vec<String> = self
            .controller
            .voices()
            .iter()
            .map(|v| v.name.clone())
            .collect();
        let selected = self.controller.voices().selected_index();

        let selected_text = selected
            .and_then(|i| names.get(i).cloned())
            .unwrap_or_else(|| "no voices available".into());

        let mut clicked: Option<usize> = None;
        egui::ComboBox::from_id_salt("voice-select")
            .selected_text(selected_text)
            .width(200.0)
            .show_ui(ui, |ui| {
                for (index, name) in names.iter().enumerate() {
                    if ui
                        .selectable_label(selected == Some(index), name)
                        .clicked()
                    {
                        clicked = Some(index);
                    }
                }
            });
        if let Some(index) = clicked {
            self.controller.select_voice(index);
        }
    }

    fn draw_buttons(&mut self, ui: &mut egui::Ui) {
        let mode = self.controller.mode();

        if ui.button(mode.speak_button_label()).clicked() {
            if mode.is_speaking() {
                self.controller.request_stop_speaking();
            } else {
                self.controller.request_speak();
            }
        }

        if ui.button(mode.listen_button_label()).clicked() {
            if mode.is_listening() {
                self.controller.request_stop_listening();
            } else {
                self.controller.request_start_listening();
            }
        }
    }

    fn draw_status_line(&self, ui: &mut egui::Ui) {
        let mode = self.controller.mode();
        ui.label(
            egui::RichText::new(mode.label())
                .color(self.mode_color(mode))
                .size(12.0),
        );

        if let Some((message, _)) = &self.notice {
            ui.label(
                egui::RichText::new(message.as_str())
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(12.0),
            );
        }
    }

    fn mode_color(&self, mode: Mode) -> egui::Color32 {
        match mode {
            Mode::Idle => egui::Color32::from_rgb(130, 130, 130),
            Mode::Speaking => egui::Color32::from_rgb(255, 80, 80),
            Mode::Listening => egui::Color32::from_rgb(68, 136, 255),
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for VoicePadApp {
    /// Called every frame.  Polls the event channel, advances the
    /// notice timer, then renders.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.update_notice();

        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.window_pos = Some((rect.min.x, rect.min.y));
        }

        // Engine events arrive between frames; keep polling at a rate
        // that matches how much is going on.
        let cadence = match self.controller.mode() {
            Mode::Speaking | Mode::Listening => Duration::from_millis(100),
            Mode::Idle => Duration::from_millis(500),
        };
        ctx.request_repaint_after(cadence);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("voicepad");
            ui.add_space(6.0);

            self.draw_text_area(ui);
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                self.draw_voice_selector(ui);
                self.draw_buttons(ui);
            });

            ui.add_space(6.0);
            self.draw_status_line(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Stop whichever engine is still running so no child process
        // outlives the window.
        self.controller.request_stop_speaking();
        self.controller.request_stop_listening();

        // Persist the window position (best-effort).
        if let Err(e) = self.exit_config().save() {
            log::warn!("failed to save settings: {e}");
        }
        log::info!("voicepad closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ModeController;
    use crate::stt::{MockRecognition, SessionConfig, SessionHandle};
    use crate::tts::MockSynthesis;

    fn app_with(config: AppConfig) -> VoicePadApp {
        let (tts, _log) = MockSynthesis::new(Vec::new());
        let (stt, _log) = MockRecognition::new();
        let session = SessionHandle::new(Box::new(stt), SessionConfig::default());
        let controller = ModeController::new(Box::new(tts), session, None);
        let (_tx, rx) = mpsc::channel(8);
        VoicePadApp::new(controller, rx, config)
    }

    #[test]
    fn exit_config_folds_in_the_observed_window_position() {
        let mut app = app_with(AppConfig::default());
        app.window_pos = Some((120.0, 48.0));
        assert_eq!(app.exit_config().ui.window_position, Some((120.0, 48.0)));
    }

    #[test]
    fn exit_config_keeps_the_saved_position_when_none_was_observed() {
        let mut config = AppConfig::default();
        config.ui.window_position = Some((10.0, 20.0));
        let app = app_with(config);
        assert_eq!(app.exit_config().ui.window_position, Some((10.0, 20.0)));
    }

    #[test]
    fn exit_config_preserves_the_rest_of_the_settings() {
        let mut config = AppConfig::default();
        config.speech.language = "de-DE".into();
        let mut app = app_with(config);
        app.window_pos = Some((0.0, 0.0));
        let exit = app.exit_config();
        assert_eq!(exit.speech.language, "de-DE");
    }
}
