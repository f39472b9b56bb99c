//! Edit-diff resolution.
//!
//! Turns an observed before/after pair of (value, selection) into a single
//! structured edit: where it starts, what was removed, what was inserted, and
//! which way an ambiguous single-position removal went.

use crate::editable::Selection;
use crate::mask::Direction;
use crate::util::{char_len, char_prefix, char_slice};

/// A structured description of one user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDetails {
    /// Value after the edit
    pub value: String,
    /// Caret after the edit
    pub cursor_pos: usize,
    /// Value before the edit
    pub old_value: String,
    /// Selection before the edit, start adjusted to where the values first differ
    pub old_selection: Selection,
}

impl EditDetails {
    pub fn resolve(
        value: &str,
        cursor_pos: usize,
        old_value: &str,
        old_selection: Selection,
    ) -> Self {
        let mut details = Self {
            value: value.to_string(),
            cursor_pos,
            old_value: old_value.to_string(),
            old_selection,
        };

        // Autofill and similar writes can change text left of the old selection
        while details.old_selection.start > 0 {
            let start = details.start_change_pos();
            if char_prefix(&details.value, start) == char_prefix(&details.old_value, start) {
                break;
            }
            details.old_selection.start -= 1;
        }
        details
    }

    /// First position touched by the edit
    pub fn start_change_pos(&self) -> usize {
        self.cursor_pos.min(self.old_selection.start)
    }

    pub fn inserted_count(&self) -> usize {
        self.cursor_pos - self.start_change_pos()
    }

    pub fn inserted(&self) -> &str {
        let start = self.start_change_pos();
        char_slice(&self.value, start, start + self.inserted_count())
    }

    pub fn removed_count(&self) -> usize {
        let start = self.start_change_pos() as isize;
        let by_selection = self.old_selection.end as isize - start;
        // A collapsed selection means Delete: measure by how much text vanished
        let count = if by_selection != 0 {
            by_selection
        } else {
            char_len(&self.old_value) as isize - char_len(&self.value) as isize
        };
        count.max(0) as usize
    }

    pub fn removed(&self) -> &str {
        let start = self.start_change_pos();
        char_slice(&self.old_value, start, start + self.removed_count())
    }

    pub fn removal_direction(&self) -> Direction {
        if self.removed_count() == 0 || self.inserted_count() > 0 {
            return Direction::None;
        }

        // Delete at the right, or a range removed even with backspace
        let sel = self.old_selection;
        if sel.end == self.cursor_pos || sel.start == self.cursor_pos {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}
