//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and
//! `Clone` so they can be round-tripped through `settings.toml` and
//! shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings shared by both speech engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Language tag handed to the recognition backend (e.g. `"en-US"`).
    pub language: String,
    /// Keep the recognition session open across utterances until the
    /// user explicitly stops it.
    pub continuous: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            continuous: true,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the synthesis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Speech program to shell out to.
    pub program: String,
    /// Preferred voice, matched against the backend's voice names and
    /// ids on every registry reload.  `None` (or no match) selects the
    /// first voice the backend reports.
    pub default_voice: Option<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".into(),
            default_voice: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the recognition backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SttConfig {
    /// Transcriber command line (shell-style quoting).  Each line the
    /// command prints on stdout is one recognition fragment; the
    /// session configuration is passed in the environment
    /// (`VOICEPAD_LANGUAGE`, `VOICEPAD_CONTINUOUS`).
    ///
    /// `None` means no recognition backend is installed; the listening
    /// control will report that instead of silently doing nothing.
    pub command: Option<String>,
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance and behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None`
    /// lets the window manager pick one on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Keep the window floating above all others.
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            always_on_top: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voicepad::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared speech settings.
    pub speech: SpeechConfig,
    /// Synthesis backend settings.
    pub tts: TtsConfig,
    /// Recognition backend settings.
    pub stt: SttConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist
    /// yet, so callers never need to special-case a first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `AppConfig` survives a TOML round trip unchanged.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path returns `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.speech.language, "en-US");
        assert!(cfg.speech.continuous);
        assert_eq!(cfg.tts.program, "espeak-ng");
        assert!(cfg.tts.default_voice.is_none());
        assert!(cfg.stt.command.is_none());
        assert!(!cfg.ui.always_on_top);
        assert!(cfg.ui.window_position.is_none());
    }

    /// Modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.speech.language = "de-DE".into();
        cfg.speech.continuous = false;
        cfg.tts.program = "/usr/local/bin/espeak-ng".into();
        cfg.tts.default_voice = Some("english-us".into());
        cfg.stt.command = Some("whisper-stream --model base".into());
        cfg.ui.window_position = Some((100.0, 200.0));
        cfg.ui.always_on_top = true;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg, loaded);
    }

    /// A hand-written partial file would fail to parse only for fields
    /// it actually misspells; a full valid file parses.
    #[test]
    fn parses_a_hand_written_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[speech]
language = "fr-FR"
continuous = true

[tts]
program = "espeak-ng"
default_voice = "english-us"

[stt]
command = "transcribe --live"

[ui]
always_on_top = true
"#,
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.speech.language, "fr-FR");
        assert_eq!(cfg.tts.default_voice.as_deref(), Some("english-us"));
        assert_eq!(cfg.stt.command.as_deref(), Some("transcribe --live"));
        assert!(cfg.ui.always_on_top);
    }
}
