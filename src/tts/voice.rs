//! Voice descriptions and the registry that mirrors the backend's list.
//!
//! [`Voice`] is whatever the synthesis backend reports — immutable once
//! reported.  [`VoiceRegistry`] is a pure mirror of that list plus the
//! user's current selection; it imposes no ordering of its own, and the
//! selection always points at an element currently in the registry (or
//! is unset when the registry is empty).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// One synthesis voice as described by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Backend identifier, passed back verbatim when speaking
    /// (e.g. an espeak-ng voice file name such as `"gmw/en"`).
    pub id: String,
    /// Human-readable name shown in the selection list.
    pub name: String,
    /// Language tag as reported by the backend (e.g. `"en-US"`).
    pub language: String,
}

// ---------------------------------------------------------------------------
// VoiceRegistry
// ---------------------------------------------------------------------------

/// Mirror of the synthesis backend's voice list plus the selection.
///
/// Reload via [`load`] at startup and whenever the backend signals that
/// its list changed.  Each reload resets the selection to the first
/// entry, or unsets it when the new list is empty.
///
/// [`load`]: VoiceRegistry::load
#[derive(Debug, Default)]
pub struct VoiceRegistry {
    voices: Vec<Voice>,
    selected: Option<usize>,
}

impl VoiceRegistry {
    /// Create an empty registry with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents and reset the selection.
    ///
    /// The selection becomes the first entry of the new list, or `None`
    /// when the list is empty.
    pub fn load(&mut self, voices: Vec<Voice>) {
        self.selected = if voices.is_empty() { None } else { Some(0) };
        self.voices = voices;
    }

    /// Select the voice at `index`.  Silently a no-op when `index` is
    /// out of bounds.
    pub fn select(&mut self, index: usize) {
        if index < self.voices.len() {
            self.selected = Some(index);
        }
    }

    /// The currently selected voice, if any.
    pub fn selected(&self) -> Option<&Voice> {
        self.selected.and_then(|i| self.voices.get(i))
    }

    /// Index of the currently selected voice, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// All voices, in the order the backend returned them.
    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str) -> Voice {
        Voice {
            id: format!("test/{name}"),
            name: name.into(),
            language: "en-US".into(),
        }
    }

    #[test]
    fn new_registry_has_no_selection() {
        let reg = VoiceRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.selected().is_none());
    }

    #[test]
    fn load_non_empty_selects_first_entry() {
        let mut reg = VoiceRegistry::new();
        reg.load(vec![voice("alice"), voice("bob")]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.selected().unwrap().name, "alice");
        assert_eq!(reg.selected_index(), Some(0));
    }

    #[test]
    fn load_empty_unsets_selection() {
        let mut reg = VoiceRegistry::new();
        reg.load(vec![voice("alice")]);
        reg.load(Vec::new());
        assert!(reg.selected().is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn reload_resets_selection_to_first() {
        let mut reg = VoiceRegistry::new();
        reg.load(vec![voice("alice"), voice("bob")]);
        reg.select(1);
        reg.load(vec![voice("carol")]);
        assert_eq!(reg.selected().unwrap().name, "carol");
    }

    #[test]
    fn select_in_bounds_changes_selection() {
        let mut reg = VoiceRegistry::new();
        reg.load(vec![voice("alice"), voice("bob")]);
        reg.select(1);
        assert_eq!(reg.selected().unwrap().name, "bob");
    }

    #[test]
    fn select_out_of_bounds_is_a_no_op() {
        let mut reg = VoiceRegistry::new();
        reg.load(vec![voice("alice")]);
        reg.select(5);
        assert_eq!(reg.selected().unwrap().name, "alice");
    }

    #[test]
    fn select_on_empty_registry_is_a_no_op() {
        let mut reg = VoiceRegistry::new();
        reg.select(0);
        assert!(reg.selected().is_none());
    }

    #[test]
    fn ordering_mirrors_the_backend() {
        let mut reg = VoiceRegistry::new();
        reg.load(vec![voice("zoe"), voice("alice")]);
        let names: Vec<_> = reg.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["zoe", "alice"]);
    }
}
