//! Mask engines: the contract the controller drives, plus reference engines.
//!
//! A mask engine owns the canonical masked value and the unmasked value of a
//! control, applies structured edits to them and answers caret queries.
//!
//! # Architecture
//!
//! - [`Masked`]: the engine contract consumed by [`InputMask`](crate::InputMask)
//! - [`PatternMask`]: fixed-pattern engine (`0` digit, `a` letter, `*` any, literals)
//! - [`DateMask`]: `dd.mm.yyyy` pattern with calendar validation
//! - [`RegexMask`]: free-form text filtered through a regular expression
//! - [`create_mask`]: factory selecting an engine from [`MaskOptions`]

mod date;
mod factory;
mod pattern;
mod regexp;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use date::DateMask;
pub use factory::{create_mask, mask_kind};
pub use pattern::{PatternMask, SlotKind};
pub use regexp::RegexMask;

/// Placeholder shown in empty slots when a pattern mask is not lazy
pub const DEFAULT_PLACEHOLDER: char = '_';

/// Direction hint for caret searches and ambiguous single-position removals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// No preference
    #[default]
    None,
    /// Towards the start of the text (Backspace)
    Left,
    /// Towards the end of the text (Delete)
    Right,
}

/// Result of applying a structured edit to an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDetails {
    /// Characters the engine actually accepted from the inserted text
    pub inserted: String,
    /// How far canonicalisation moved the edit point, relative to the edit start
    pub offset: isize,
}

/// The engine family a mask source selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskKind {
    Pattern,
    Date,
    Regex,
}

/// What a mask is built from.
///
/// Parsed from a string: `date` selects the date engine, `/re/` a regex
/// engine, anything else is a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MaskSource {
    Pattern(String),
    Date,
    Regex(String),
}

impl MaskSource {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        MaskSource::Pattern(pattern.into())
    }

    pub fn regex(regex: impl Into<String>) -> Self {
        MaskSource::Regex(regex.into())
    }

    /// The engine family this source needs
    pub fn kind(&self) -> MaskKind {
        match self {
            MaskSource::Pattern(_) => MaskKind::Pattern,
            MaskSource::Date => MaskKind::Date,
            MaskSource::Regex(_) => MaskKind::Regex,
        }
    }
}

impl fmt::Display for MaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskSource::Pattern(pattern) => f.write_str(pattern),
            MaskSource::Date => f.write_str("date"),
            MaskSource::Regex(regex) => write!(f, "/{}/", regex),
        }
    }
}

impl FromStr for MaskSource {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MaskError::EmptyPattern);
        }
        if s == "date" {
            return Ok(MaskSource::Date);
        }
        if s.len() >= 2 && s.starts_with('/') && s.ends_with('/') {
            return Ok(MaskSource::Regex(s[1..s.len() - 1].to_string()));
        }
        Ok(MaskSource::Pattern(s.to_string()))
    }
}

impl TryFrom<String> for MaskSource {
    type Error = MaskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MaskSource> for String {
    fn from(source: MaskSource) -> Self {
        source.to_string()
    }
}

/// Engine configuration. Unset fields mean "leave as is" when updating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskSource>,
    /// Show only what was typed (true) or the whole pattern with placeholders (false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_char: Option<char>,
}

impl MaskOptions {
    pub fn with_mask(mask: MaskSource) -> Self {
        Self {
            mask: Some(mask),
            ..Self::default()
        }
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    pub fn placeholder_char(mut self, ch: char) -> Self {
        self.placeholder_char = Some(ch);
        self
    }

    /// Check whether every option set in `requested` already has that value here
    pub fn includes(&self, requested: &MaskOptions) -> bool {
        fn matches<T: PartialEq>(current: &Option<T>, requested: &Option<T>) -> bool {
            requested.is_none() || current == requested
        }

        matches(&self.mask, &requested.mask)
            && matches(&self.lazy, &requested.lazy)
            && matches(&self.placeholder_char, &requested.placeholder_char)
    }

    /// Overlay the fields set in `other` onto a copy of `self`
    pub fn merged(&self, other: &MaskOptions) -> MaskOptions {
        MaskOptions {
            mask: other.mask.clone().or_else(|| self.mask.clone()),
            lazy: other.lazy.or(self.lazy),
            placeholder_char: other.placeholder_char.or(self.placeholder_char),
        }
    }
}

/// Errors raised while building or reconfiguring an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("no mask configured")]
    MissingMask,

    #[error("mask pattern is empty")]
    EmptyPattern,

    #[error("invalid regex mask /{pattern}/: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("cannot apply a {requested:?} mask to a {current:?} engine")]
    IncompatibleMask {
        current: MaskKind,
        requested: MaskKind,
    },
}

/// The mask engine contract.
///
/// Positions are character offsets into [`Masked::value`].
pub trait Masked: fmt::Debug {
    /// Engine family; two engines of the same kind can swap masks in place
    fn kind(&self) -> MaskKind;

    /// The source this engine was built from
    fn mask(&self) -> &MaskSource;

    /// Replace the mask in place. Fails for a mask of a different kind.
    fn set_mask(&mut self, mask: MaskSource) -> Result<(), MaskError>;

    /// Canonical masked value
    fn value(&self) -> &str;

    /// Replace the value from raw (possibly masked) text
    fn set_value(&mut self, value: &str);

    /// Value with all mask literals removed
    fn unmasked_value(&self) -> &str;

    fn set_unmasked_value(&mut self, value: &str);

    /// Whether the mask is fully satisfied
    fn is_complete(&self) -> bool;

    /// Current options, every field populated where the engine supports it
    fn options(&self) -> MaskOptions;

    fn update_options(&mut self, options: &MaskOptions) -> Result<(), MaskError>;

    /// Remove `delete_count` characters at `start`, then insert `inserted`.
    ///
    /// `direction` disambiguates removals that touched no input characters.
    fn apply_edit(
        &mut self,
        start: usize,
        delete_count: usize,
        inserted: &str,
        direction: Direction,
    ) -> ChangeDetails;

    /// Nearest position where input is possible, searching in `direction`
    fn nearest_input_pos(&self, pos: usize, direction: Direction) -> usize;

    /// Finalize provisional characters
    fn commit(&mut self);
}
