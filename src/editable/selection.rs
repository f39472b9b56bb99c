//! Selection types for bound text controls.
//!
//! Offsets are character offsets (Unicode scalar values) into the control's text.

/// A normalized selection range reported by a control.
///
/// `start <= end` always holds; a collapsed selection is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

impl Selection {
    /// Create a selection, normalizing so that `start <= end`
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Create a collapsed selection (caret with no selection)
    pub fn collapsed(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Check if selection is empty (start == end)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

}

/// An anchor/head selection as a text box tracks it internally.
///
/// The anchor stays fixed while the head moves during selection extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchoredSelection {
    /// Where the selection started (fixed point)
    pub anchor: usize,
    /// Where the caret is (moving point)
    pub head: usize,
}

impl AnchoredSelection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The normalized range
    pub fn range(&self) -> Selection {
        Selection::new(self.anchor, self.head)
    }
}
