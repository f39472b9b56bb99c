//! In-memory single-line text box.
//!
//! Behaves like a platform text input: raw editing helpers change the text
//! and caret the way a keystroke would, before any controller sees the
//! resulting input event.

use super::{Control, Interaction, ListenerId};
use crate::editable::{AnchoredSelection, Selection};
use crate::util::{char_len, char_slice, splice};

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    selection: AnchoredSelection,
    focused: bool,
    listeners: Vec<(ListenerId, Interaction)>,
    next_listener: u64,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input holding `text` with the caret at the end
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: AnchoredSelection::collapsed(char_len(text)),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        char_len(&self.text)
    }

    /// Caret (selection head)
    pub fn caret(&self) -> usize {
        self.selection.head
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Select from `anchor` to `head`, clamped to the text
    pub fn select(&mut self, anchor: usize, head: usize) {
        let len = self.len_chars();
        self.selection = AnchoredSelection::new(anchor.min(len), head.min(len));
    }

    pub fn selected_text(&self) -> &str {
        let range = self.selection.range();
        char_slice(&self.text, range.start, range.end)
    }

    /// Replace the selection with `text`, caret after the inserted text
    pub fn insert_text(&mut self, text: &str) {
        let range = self.selection.range();
        self.text = splice(&self.text, range.start, range.end, text);
        self.selection = AnchoredSelection::collapsed(range.start + char_len(text));
    }

    /// Delete the selection, or the character before the caret (Backspace).
    /// Returns false if nothing changed.
    pub fn delete_backward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }

        let caret = self.selection.head;
        if caret == 0 {
            return false;
        }
        self.text = splice(&self.text, caret - 1, caret, "");
        self.selection = AnchoredSelection::collapsed(caret - 1);
        true
    }

    /// Delete the selection, or the character after the caret (Delete).
    /// Returns false if nothing changed.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }

        let caret = self.selection.head;
        if caret >= self.len_chars() {
            return false;
        }
        self.text = splice(&self.text, caret, caret + 1, "");
        true
    }

    fn delete_selection(&mut self) -> bool {
        let range = self.selection.range();
        if range.is_empty() {
            return false;
        }
        self.text = splice(&self.text, range.start, range.end, "");
        self.selection = AnchoredSelection::collapsed(range.start);
        true
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, interaction: Interaction) -> bool {
        self.listeners.iter().any(|(_, kind)| *kind == interaction)
    }
}

impl Control for TextInput {
    fn value(&self) -> String {
        self.text.clone()
    }

    /// Like a platform text box, assignment leaves the caret at the end
    fn set_value(&mut self, value: &str) {
        self.text = value.to_string();
        self.selection = AnchoredSelection::collapsed(char_len(value));
    }

    fn selection(&self) -> Selection {
        self.selection.range()
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        self.select(start, end);
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn add_listener(&mut self, interaction: Interaction) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, interaction));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener, _)| *listener != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_text_caret_at_end() {
        let input = TextInput::with_text("hello");
        assert_eq!(input.caret(), 5);
        assert!(!input.is_focused());
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut input = TextInput::with_text("hello world");
        input.select(0, 5);
        assert_eq!(input.selected_text(), "hello");

        input.insert_text("X");
        assert_eq!(input.text(), "X world");
        assert_eq!(input.caret(), 1);
    }

    #[test]
    fn test_delete_backward() {
        let mut input = TextInput::with_text("hello");
        assert!(input.delete_backward());
        assert_eq!(input.text(), "hell");
        assert_eq!(input.caret(), 4);

        input.select(0, 0);
        assert!(!input.delete_backward());
    }

    #[test]
    fn test_delete_forward() {
        let mut input = TextInput::with_text("hello");
        input.select(1, 1);
        assert!(input.delete_forward());
        assert_eq!(input.text(), "hllo");
        assert_eq!(input.caret(), 1);

        input.select(4, 4);
        assert!(!input.delete_forward());
    }

    #[test]
    fn test_reversed_selection_reports_normalized_range() {
        let mut input = TextInput::with_text("hello");
        input.select(4, 1);
        assert_eq!(Control::selection(&input), Selection::new(1, 4));
        assert_eq!(input.caret(), 1);
    }

    #[test]
    fn test_listeners() {
        let mut input = TextInput::new();
        let press = input.add_listener(Interaction::Press);
        let input_id = input.add_listener(Interaction::Input);
        assert_eq!(input.listener_count(), 2);
        assert!(input.is_listening(Interaction::Press));

        input.remove_listener(press);
        assert!(!input.is_listening(Interaction::Press));
        input.remove_listener(input_id);
        assert_eq!(input.listener_count(), 0);
    }

    #[test]
    fn test_set_value_moves_caret_to_end() {
        let mut input = TextInput::with_text("ab");
        input.select(0, 0);
        input.set_value("abcd");
        assert_eq!(input.caret(), 4);
    }
}
