//! Fixed-pattern mask engine.
//!
//! Pattern syntax: `0` accepts a digit, `a` a letter, `*` any character,
//! `\x` makes `x` a literal, every other character is a literal.

use super::{
    ChangeDetails, Direction, MaskError, MaskKind, MaskOptions, MaskSource, Masked,
    DEFAULT_PLACEHOLDER,
};

/// What an input slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Digit,
    Letter,
    Any,
}

impl SlotKind {
    pub fn accepts(self, ch: char) -> bool {
        match self {
            SlotKind::Digit => ch.is_ascii_digit(),
            SlotKind::Letter => ch.is_alphabetic(),
            SlotKind::Any => !ch.is_control(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Input(SlotKind),
    Literal(char),
}

/// Extra check over the filled slots, called with the candidate inputs
pub(crate) type PrefixValidator = fn(&[char]) -> bool;

fn parse_pattern(pattern: &str) -> Result<Vec<Token>, MaskError> {
    if pattern.is_empty() {
        return Err(MaskError::EmptyPattern);
    }

    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        let token = match ch {
            '0' => Token::Input(SlotKind::Digit),
            'a' => Token::Input(SlotKind::Letter),
            '*' => Token::Input(SlotKind::Any),
            // A trailing backslash stands for itself
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Mask engine for fixed patterns such as `00/00` or `+1 (000) 000-0000`.
///
/// Value positions map one-to-one onto pattern tokens: the rendered value is
/// always a prefix of the pattern (lazy) or the whole pattern (not lazy).
#[derive(Debug, Clone)]
pub struct PatternMask {
    source: MaskSource,
    tokens: Vec<Token>,
    /// Token index of each input slot, in order
    slot_tokens: Vec<usize>,
    /// Filled slots, always a prefix of `slot_tokens`
    inputs: Vec<char>,
    lazy: bool,
    placeholder_char: char,
    /// Show the literals that follow the last filled slot
    provisional_tail: bool,
    validator: Option<PrefixValidator>,
    value: String,
    unmasked: String,
}

impl PatternMask {
    pub fn new(pattern: &str) -> Result<Self, MaskError> {
        let tokens = parse_pattern(pattern)?;
        let mut mask = Self {
            source: MaskSource::pattern(pattern),
            slot_tokens: Vec::new(),
            tokens,
            inputs: Vec::new(),
            lazy: true,
            placeholder_char: DEFAULT_PLACEHOLDER,
            provisional_tail: true,
            validator: None,
            value: String::new(),
            unmasked: String::new(),
        };
        mask.index_slots();
        mask.sync();
        Ok(mask)
    }

    pub(crate) fn with_validator(
        pattern: &str,
        validator: PrefixValidator,
    ) -> Result<Self, MaskError> {
        let mut mask = Self::new(pattern)?;
        mask.validator = Some(validator);
        Ok(mask)
    }

    /// Number of input slots in the pattern
    pub fn slot_count(&self) -> usize {
        self.slot_tokens.len()
    }

    /// The filled slots
    pub fn inputs(&self) -> &[char] {
        &self.inputs
    }

    fn index_slots(&mut self) {
        self.slot_tokens = self
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| matches!(token, Token::Input(_)))
            .map(|(idx, _)| idx)
            .collect();
    }

    fn is_literal(&self, token_idx: usize) -> bool {
        matches!(self.tokens.get(token_idx), Some(Token::Literal(_)))
    }

    /// Token index of slot `slot`, or the pattern length past the last slot
    fn slot_token(&self, slot: usize) -> usize {
        self.slot_tokens
            .get(slot)
            .copied()
            .unwrap_or(self.tokens.len())
    }

    /// Number of filled slots rendered before value position `pos`
    fn inputs_before(&self, pos: usize) -> usize {
        self.slot_tokens[..self.inputs.len()]
            .iter()
            .take_while(|&&token_idx| token_idx < pos)
            .count()
    }

    /// Furthest position the caret may occupy
    fn caret_limit(&self) -> usize {
        if self.lazy {
            self.value.chars().count()
        } else {
            self.slot_token(self.inputs.len())
        }
    }

    fn skip_literals_forward(&self, mut pos: usize, limit: usize) -> usize {
        while pos < limit && self.is_literal(pos) {
            pos += 1;
        }
        pos
    }

    /// Push `ch` into the next slot if the slot and the validator accept it
    fn try_push(&self, inputs: &mut Vec<char>, ch: char) -> bool {
        let Some(&token_idx) = self.slot_tokens.get(inputs.len()) else {
            return false;
        };
        let Token::Input(kind) = self.tokens[token_idx] else {
            return false;
        };
        if !kind.accepts(ch) {
            return false;
        }

        inputs.push(ch);
        if let Some(validator) = self.validator {
            if !validator(inputs.as_slice()) {
                inputs.pop();
                return false;
            }
        }
        true
    }

    /// Feed raw text starting at token `token_idx`, matching typed literals
    /// against pattern literals. Returns the token index after the last
    /// consumed token.
    fn feed_raw(&self, inputs: &mut Vec<char>, token_idx: usize, text: &str) -> usize {
        let mut ti = token_idx;
        for ch in text.chars() {
            loop {
                match self.tokens.get(ti) {
                    None => return ti,
                    Some(Token::Literal(literal)) => {
                        ti += 1;
                        if *literal == ch {
                            break;
                        }
                    }
                    Some(Token::Input(_)) => {
                        if !self.lazy && ch == self.placeholder_char {
                            break;
                        }
                        if self.try_push(inputs, ch) {
                            ti += 1;
                        }
                        break;
                    }
                }
            }
        }
        ti
    }

    /// Fill slots from unmasked characters, dropping rejected ones
    fn feed_unmasked(&self, inputs: &mut Vec<char>, chars: impl IntoIterator<Item = char>) {
        for ch in chars {
            if inputs.len() >= self.slot_count() {
                break;
            }
            self.try_push(inputs, ch);
        }
    }

    fn render(&self) -> String {
        let mut value = String::with_capacity(self.tokens.len());

        if !self.lazy {
            let mut slot = 0;
            for token in &self.tokens {
                match token {
                    Token::Input(_) => {
                        let ch = self.inputs.get(slot).copied();
                        value.push(ch.unwrap_or(self.placeholder_char));
                        slot += 1;
                    }
                    Token::Literal(ch) => value.push(*ch),
                }
            }
            return value;
        }

        let filled = self.inputs.len();
        if filled == 0 {
            return value;
        }

        // Literals after the last slot of a complete mask belong to the value
        let keep_tail = self.provisional_tail || filled == self.slot_count();
        let mut slot = 0;
        for token in &self.tokens {
            match token {
                Token::Input(_) => {
                    if slot >= filled {
                        break;
                    }
                    value.push(self.inputs[slot]);
                    slot += 1;
                }
                Token::Literal(ch) => {
                    if slot >= filled && !keep_tail {
                        break;
                    }
                    value.push(*ch);
                }
            }
        }
        value
    }

    fn sync(&mut self) {
        self.value = self.render();
        self.unmasked = self.inputs.iter().collect();
    }

    fn reseed_from_unmasked(&mut self) {
        let previous = std::mem::take(&mut self.inputs);
        let mut inputs = Vec::with_capacity(previous.len());
        self.feed_unmasked(&mut inputs, previous);
        self.inputs = inputs;
        self.sync();
    }
}

impl Masked for PatternMask {
    fn kind(&self) -> MaskKind {
        MaskKind::Pattern
    }

    fn mask(&self) -> &MaskSource {
        &self.source
    }

    fn set_mask(&mut self, mask: MaskSource) -> Result<(), MaskError> {
        let MaskSource::Pattern(pattern) = &mask else {
            return Err(MaskError::IncompatibleMask {
                current: MaskKind::Pattern,
                requested: mask.kind(),
            });
        };

        self.tokens = parse_pattern(pattern)?;
        self.source = mask;
        self.index_slots();
        self.reseed_from_unmasked();
        Ok(())
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: &str) {
        let mut inputs = Vec::new();
        self.feed_raw(&mut inputs, 0, value);
        self.inputs = inputs;
        self.provisional_tail = true;
        self.sync();
    }

    fn unmasked_value(&self) -> &str {
        &self.unmasked
    }

    fn set_unmasked_value(&mut self, value: &str) {
        let mut inputs = Vec::new();
        self.feed_unmasked(&mut inputs, value.chars());
        self.inputs = inputs;
        self.provisional_tail = true;
        self.sync();
    }

    fn is_complete(&self) -> bool {
        self.inputs.len() == self.slot_count()
    }

    fn options(&self) -> MaskOptions {
        MaskOptions {
            mask: Some(self.source.clone()),
            lazy: Some(self.lazy),
            placeholder_char: Some(self.placeholder_char),
        }
    }

    fn update_options(&mut self, options: &MaskOptions) -> Result<(), MaskError> {
        if let Some(mask) = &options.mask {
            if mask != &self.source {
                self.set_mask(mask.clone())?;
            }
        }
        if let Some(lazy) = options.lazy {
            self.lazy = lazy;
        }
        if let Some(ch) = options.placeholder_char {
            self.placeholder_char = ch;
        }
        self.sync();
        Ok(())
    }

    fn apply_edit(
        &mut self,
        start: usize,
        delete_count: usize,
        inserted: &str,
        direction: Direction,
    ) -> ChangeDetails {
        let end = start + delete_count;
        let mut head = self.inputs_before(start);
        let mut removed = self.inputs_before(end) - head;

        // Only literals were removed: take the neighbouring input with them
        if removed == 0 && delete_count > 0 {
            match direction {
                Direction::Left if head > 0 => {
                    head -= 1;
                    removed = 1;
                }
                Direction::Right if head < self.inputs.len() => removed = 1,
                _ => {}
            }
        }

        let tail = self.inputs[head + removed..].to_vec();
        let mut inputs = self.inputs[..head].to_vec();
        let from = self.slot_token(head).min(start);
        let token_end = self.feed_raw(&mut inputs, from, inserted);
        let accepted: String = inputs[head..].iter().collect();
        self.feed_unmasked(&mut inputs, tail);

        self.inputs = inputs;
        self.provisional_tail = true;
        self.sync();

        ChangeDetails {
            inserted: accepted,
            offset: token_end as isize - start as isize,
        }
    }

    fn nearest_input_pos(&self, pos: usize, direction: Direction) -> usize {
        let limit = self.caret_limit();
        let pos = pos.min(limit);

        match direction {
            Direction::Left => {
                let mut p = pos;
                while p > 0 && self.is_literal(p - 1) {
                    p -= 1;
                }
                if p > 0 {
                    return p;
                }
                self.skip_literals_forward(0, limit)
            }
            Direction::None | Direction::Right => self.skip_literals_forward(pos, limit),
        }
    }

    fn commit(&mut self) {
        self.provisional_tail = false;
        self.sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(pattern: &str) -> PatternMask {
        PatternMask::new(pattern).unwrap()
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(PatternMask::new("").unwrap_err(), MaskError::EmptyPattern);
    }

    #[test]
    fn test_parse_escape() {
        let m = mask(r"\0-0");
        assert_eq!(m.slot_count(), 1);
    }

    #[test]
    fn test_set_value_skips_literals() {
        let mut m = mask("00/00");
        m.set_value("12/34");
        assert_eq!(m.value(), "12/34");
        assert_eq!(m.unmasked_value(), "1234");
        assert!(m.is_complete());
    }

    #[test]
    fn test_set_value_without_literals() {
        let mut m = mask("00/00");
        m.set_value("1234");
        assert_eq!(m.value(), "12/34");
    }

    #[test]
    fn test_set_value_matches_literal_digits() {
        let mut m = mask("+7 (000)");
        m.set_value("+7 (912)");
        assert_eq!(m.unmasked_value(), "912");
        assert_eq!(m.value(), "+7 (912)");
    }

    #[test]
    fn test_trailing_literal_is_provisional() {
        let mut m = mask("00/00");
        m.set_unmasked_value("12");
        assert_eq!(m.value(), "12/");

        m.commit();
        assert_eq!(m.value(), "12");
        assert_eq!(m.unmasked_value(), "12");
    }

    #[test]
    fn test_commit_keeps_literals_of_complete_value() {
        let mut m = mask("(000)");
        m.apply_edit(0, 0, "123", Direction::None);
        assert_eq!(m.value(), "(123)");

        m.commit();
        assert_eq!(m.value(), "(123)");
        assert!(m.is_complete());
    }

    #[test]
    fn test_commit_keeps_trailing_word_after_last_slot() {
        let mut m = mask("000-00-0000 ext");
        m.set_value("123-45-6789 ext");
        m.commit();
        assert_eq!(m.value(), "123-45-6789 ext");
        assert_eq!(m.unmasked_value(), "123456789");
    }

    #[test]
    fn test_apply_edit_typing() {
        let mut m = mask("00/00");
        let details = m.apply_edit(0, 0, "1", Direction::None);
        assert_eq!(m.value(), "1");
        assert_eq!(details.offset, 1);

        let details = m.apply_edit(1, 0, "2", Direction::None);
        assert_eq!(m.value(), "12/");
        assert_eq!(details.offset, 1);
        assert_eq!(m.nearest_input_pos(2, Direction::None), 3);
    }

    #[test]
    fn test_apply_edit_rejects_invalid_char() {
        let mut m = mask("00/00");
        let details = m.apply_edit(0, 0, "x", Direction::None);
        assert_eq!(m.value(), "");
        assert_eq!(details.offset, 0);
        assert_eq!(details.inserted, "");
    }

    #[test]
    fn test_apply_edit_typed_literal_is_consumed() {
        let mut m = mask("00/00");
        m.set_unmasked_value("12");
        m.commit();
        let details = m.apply_edit(2, 0, "/", Direction::None);
        assert_eq!(m.value(), "12/");
        assert_eq!(details.offset, 1);
        assert_eq!(m.unmasked_value(), "12");
    }

    #[test]
    fn test_backspace_over_literal_removes_previous_input() {
        let mut m = mask("00/00");
        m.set_unmasked_value("12");
        // "12/" with the "/" removed by backspace
        let details = m.apply_edit(2, 1, "", Direction::Left);
        assert_eq!(m.value(), "1");
        assert_eq!(details.offset, -1);
    }

    #[test]
    fn test_delete_over_literal_removes_next_input() {
        let mut m = mask("00/00");
        m.set_unmasked_value("1234");
        let details = m.apply_edit(2, 1, "", Direction::Right);
        assert_eq!(m.value(), "12/4");
        assert_eq!(details.offset, 0);
    }

    #[test]
    fn test_replacing_range_reflows_tail() {
        let mut m = mask("00/00");
        m.set_unmasked_value("1234");
        m.apply_edit(0, 2, "9", Direction::None);
        assert_eq!(m.unmasked_value(), "934");
        assert_eq!(m.value(), "93/4");
    }

    #[test]
    fn test_overflow_is_dropped() {
        let mut m = mask("00");
        m.apply_edit(0, 0, "1234", Direction::None);
        assert_eq!(m.value(), "12");
        assert!(m.is_complete());
    }

    #[test]
    fn test_nearest_input_pos_left_skips_literals() {
        let mut m = mask("00/00");
        m.set_unmasked_value("12");
        assert_eq!(m.value(), "12/");
        assert_eq!(m.nearest_input_pos(3, Direction::Left), 2);
        assert_eq!(m.nearest_input_pos(10, Direction::Left), 2);
        assert_eq!(m.nearest_input_pos(1, Direction::Left), 1);
    }

    #[test]
    fn test_nearest_input_pos_leading_literals() {
        let mut m = mask("+7 (000)");
        m.set_unmasked_value("9");
        assert_eq!(m.value(), "+7 (9");
        assert_eq!(m.nearest_input_pos(0, Direction::Left), 4);
        assert_eq!(m.nearest_input_pos(2, Direction::None), 4);
    }

    #[test]
    fn test_non_lazy_renders_placeholders() {
        let mut m = mask("00/00");
        m.update_options(&MaskOptions::default().lazy(false)).unwrap();
        assert_eq!(m.value(), "__/__");

        m.apply_edit(0, 0, "1", Direction::None);
        assert_eq!(m.value(), "1_/__");
        assert_eq!(m.nearest_input_pos(5, Direction::Left), 1);
    }

    #[test]
    fn test_non_lazy_typing_past_filled_region_lands_in_first_empty_slot() {
        let mut m = mask("00/00");
        m.update_options(&MaskOptions::default().lazy(false).placeholder_char('#'))
            .unwrap();
        m.set_unmasked_value("1");
        m.apply_edit(4, 0, "2", Direction::None);
        assert_eq!(m.value(), "12/##");
    }

    #[test]
    fn test_set_mask_reseeds_from_unmasked() {
        let mut m = mask("00/00");
        m.set_unmasked_value("1234");
        m.set_mask(MaskSource::pattern("00-00-00")).unwrap();
        assert_eq!(m.value(), "12-34-");
        assert!(!m.is_complete());
    }

    #[test]
    fn test_set_mask_rejects_other_kind() {
        let mut m = mask("00");
        assert_eq!(
            m.set_mask(MaskSource::Date),
            Err(MaskError::IncompatibleMask {
                current: MaskKind::Pattern,
                requested: MaskKind::Date
            })
        );
    }

    #[test]
    fn test_letter_and_any_slots() {
        let mut m = mask("a*0");
        // "1" is not a letter and is dropped; "b" and "2" fill the first two slots
        m.set_value("1b2");
        assert_eq!(m.value(), "b2");
        m.set_value("b#2");
        assert_eq!(m.value(), "b#2");
    }
}
