//! The mutually exclusive operating mode.
//!
//! [`Mode`] is a single enum value, so "speaking and listening at the
//! same time" is unrepresentable — the guards in the controller decide
//! *which* transitions are allowed, the type rules out the impossible
//! combination.

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Operating state of the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Neither engine is active.
    #[default]
    Idle,

    /// The synthesis backend is reading the text aloud.
    Speaking,

    /// A recognition session is live and dictating into the text area.
    Listening,
}

impl Mode {
    pub fn is_speaking(&self) -> bool {
        matches!(self, Mode::Speaking)
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, Mode::Listening)
    }

    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::Speaking => "Speaking",
            Mode::Listening => "Listening",
        }
    }

    /// Label of the primary button, which toggles speak / stop.
    pub fn speak_button_label(&self) -> &'static str {
        if self.is_speaking() {
            "Stop"
        } else {
            "Speak"
        }
    }

    /// Label of the secondary button, which toggles the session.
    pub fn listen_button_label(&self) -> &'static str {
        if self.is_listening() {
            "Stop Listening"
        } else {
            "Start Listening"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_idle() {
        assert_eq!(Mode::default(), Mode::Idle);
    }

    #[test]
    fn predicates_match_variants() {
        assert!(!Mode::Idle.is_speaking());
        assert!(!Mode::Idle.is_listening());
        assert!(Mode::Speaking.is_speaking());
        assert!(!Mode::Speaking.is_listening());
        assert!(Mode::Listening.is_listening());
        assert!(!Mode::Listening.is_speaking());
    }

    #[test]
    fn speak_button_toggles_on_speaking() {
        assert_eq!(Mode::Idle.speak_button_label(), "Speak");
        assert_eq!(Mode::Speaking.speak_button_label(), "Stop");
        assert_eq!(Mode::Listening.speak_button_label(), "Speak");
    }

    #[test]
    fn listen_button_toggles_on_listening() {
        assert_eq!(Mode::Idle.listen_button_label(), "Start Listening");
        assert_eq!(Mode::Listening.listen_button_label(), "Stop Listening");
        assert_eq!(Mode::Speaking.listen_button_label(), "Start Listening");
    }

    #[test]
    fn labels_are_distinct() {
        assert_eq!(Mode::Idle.label(), "Idle");
        assert_eq!(Mode::Speaking.label(), "Speaking");
        assert_eq!(Mode::Listening.label(), "Listening");
    }
}
