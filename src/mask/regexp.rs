//! Regex-filtered mask engine.

use regex::Regex;

use super::{ChangeDetails, Direction, MaskError, MaskKind, MaskOptions, MaskSource, Masked};
use crate::util::{char_len, char_slice};

fn compile(pattern: &str) -> Result<Regex, MaskError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| MaskError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Free-form mask: a character is kept only if the whole value still matches.
///
/// The expression must accept every prefix of a valid value (e.g. `\d{0,4}`),
/// since values are built one character at a time.
#[derive(Debug, Clone)]
pub struct RegexMask {
    source: MaskSource,
    regex: Regex,
    value: String,
}

impl RegexMask {
    pub fn new(pattern: &str) -> Result<Self, MaskError> {
        Ok(Self {
            source: MaskSource::regex(pattern),
            regex: compile(pattern)?,
            value: String::new(),
        })
    }

    /// Append the characters of `text` that keep `value` matching.
    /// Returns how many were accepted.
    fn append(&self, value: &mut String, text: &str) -> usize {
        let mut accepted = 0;
        for ch in text.chars() {
            value.push(ch);
            if self.regex.is_match(value) {
                accepted += 1;
            } else {
                value.pop();
            }
        }
        accepted
    }
}

impl Masked for RegexMask {
    fn kind(&self) -> MaskKind {
        MaskKind::Regex
    }

    fn mask(&self) -> &MaskSource {
        &self.source
    }

    fn set_mask(&mut self, mask: MaskSource) -> Result<(), MaskError> {
        let MaskSource::Regex(pattern) = &mask else {
            return Err(MaskError::IncompatibleMask {
                current: MaskKind::Regex,
                requested: mask.kind(),
            });
        };

        self.regex = compile(pattern)?;
        self.source = mask;
        let previous = std::mem::take(&mut self.value);
        self.set_value(&previous);
        Ok(())
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: &str) {
        let mut next = String::with_capacity(value.len());
        self.append(&mut next, value);
        self.value = next;
    }

    fn unmasked_value(&self) -> &str {
        &self.value
    }

    fn set_unmasked_value(&mut self, value: &str) {
        self.set_value(value);
    }

    fn is_complete(&self) -> bool {
        !self.value.is_empty()
    }

    fn options(&self) -> MaskOptions {
        MaskOptions::with_mask(self.source.clone())
    }

    fn update_options(&mut self, options: &MaskOptions) -> Result<(), MaskError> {
        match &options.mask {
            Some(mask) if mask != &self.source => self.set_mask(mask.clone()),
            // lazy and placeholder_char have no meaning without slots
            _ => Ok(()),
        }
    }

    fn apply_edit(
        &mut self,
        start: usize,
        delete_count: usize,
        inserted: &str,
        _direction: Direction,
    ) -> ChangeDetails {
        let len = char_len(&self.value);
        let start = start.min(len);
        let end = (start + delete_count).min(len);

        let mut next = char_slice(&self.value, 0, start).to_string();
        let head_len = next.len();
        let accepted = self.append(&mut next, inserted);
        let inserted_text = next[head_len..].to_string();
        let tail = char_slice(&self.value, end, len).to_string();
        self.append(&mut next, &tail);
        self.value = next;

        ChangeDetails {
            inserted: inserted_text,
            offset: accepted as isize,
        }
    }

    fn nearest_input_pos(&self, pos: usize, _direction: Direction) -> usize {
        pos.min(char_len(&self.value))
    }

    fn commit(&mut self) {}
}
