//! The editable text buffer and its append-only dictation surface.
//!
//! [`TranscriptBuffer`] is the single text area shown to the user.  It
//! is mutated two ways:
//!
//! * **Direct edits** — the egui `TextEdit` widget binds to
//!   [`buffer_mut`] and replaces content freely.
//! * **Dictation** — the mode controller calls [`append_fragment`] once
//!   per recognition result while listening.
//!
//! [`buffer_mut`]: TranscriptBuffer::buffer_mut
//! [`append_fragment`]: TranscriptBuffer::append_fragment

// ---------------------------------------------------------------------------
// TranscriptBuffer
// ---------------------------------------------------------------------------

/// The full editable text content.
///
/// Starts empty.  Dictation only ever appends; there is no dedup or
/// reordering of fragments — whatever the recognition engine delivers,
/// in the order it delivers it, lands in the buffer as-is.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    text: String,
}

impl TranscriptBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a separating space followed by `fragment`.
    ///
    /// One call per recognition result event.  The caller (the mode
    /// controller) is responsible for discarding fragments that arrive
    /// outside the Listening mode; this type does not know the mode.
    pub fn append_fragment(&mut self, fragment: &str) {
        self.text.push(' ');
        self.text.push_str(fragment);
    }

    /// The current content.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Mutable access for the text-edit widget binding.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// `true` when no text has been entered or dictated.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
