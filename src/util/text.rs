//! Character-offset helpers for single-line text.
//!
//! Controls and masks address text by character offset, so these helpers
//! translate between char offsets and the byte offsets `str` slicing needs.

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_idx`, clamped to the end of the text
pub fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Slice `text` by character range, clamping both ends
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let end = end.max(start);
    let from = byte_offset(text, start);
    let to = byte_offset(text, end);
    &text[from..to]
}

/// The first `count` characters of `text`
pub fn char_prefix(text: &str, count: usize) -> &str {
    char_slice(text, 0, count)
}

/// Replace the character range `start..end` with `insert`
pub fn splice(text: &str, start: usize, end: usize, insert: &str) -> String {
    let from = byte_offset(text, start);
    let to = byte_offset(text, end.max(start));
    let mut result = String::with_capacity(text.len() + insert.len());
    result.push_str(&text[..from]);
    result.push_str(insert);
    result.push_str(&text[to..]);
    result
}
