//! Non-fatal, user-visible notices.
//!
//! Every guard violation or engine failure surfaces as exactly one
//! [`Notice`]; nothing propagates past the controller and nothing is
//! fatal.  The UI shows the message transiently and clears it.

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// A notice shown to the user in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Speak was requested with nothing to speak.
    EmptyText,

    /// Speak was requested while a recognition session is live.
    ListeningActive,

    /// The synthesis backend could not start playback.
    SynthesisFailed(String),

    /// A recognition session could not be started.
    RecognitionUnavailable(String),
}

impl Notice {
    /// The user-facing message.
    pub fn message(&self) -> String {
        match self {
            Notice::EmptyText => "textarea is empty".into(),
            Notice::ListeningActive => "Listening is ON Stop Listening".into(),
            Notice::SynthesisFailed(reason) => {
                format!("Speech synthesis failed: {reason}")
            }
            Notice::RecognitionUnavailable(reason) => {
                format!("Speech recognition unavailable: {reason}")
            }
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_message() {
        assert_eq!(Notice::EmptyText.message(), "textarea is empty");
    }

    #[test]
    fn listening_active_message() {
        assert_eq!(
            Notice::ListeningActive.message(),
            "Listening is ON Stop Listening"
        );
    }

    #[test]
    fn failure_notices_carry_the_reason() {
        assert!(Notice::SynthesisFailed("boom".into())
            .message()
            .contains("boom"));
        assert!(Notice::RecognitionUnavailable("none".into())
            .message()
            .contains("none"));
    }

    #[test]
    fn display_matches_message() {
        let n = Notice::EmptyText;
        assert_eq!(n.to_string(), n.message());
    }
}
