//! Interaction scripts for the playground.
//!
//! A script is one command per line; blank lines and `#` comments are
//! skipped. Text arguments run to the end of the line and may be wrapped in
//! double quotes to keep leading or trailing spaces.
//!
//! ```text
//! # type a date
//! type 12
//! backspace
//! select 0 2
//! paste "31"
//! wait 10
//! blur
//! ```

mod parse;
mod session;

use thiserror::Error;

use crate::mask::{MaskError, MaskSource};

pub use parse::parse_script;
pub use session::{Session, StepReport};

/// One interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Press + insert + input, once per character
    Type(String),
    /// A single input inserting the whole text
    Paste(String),
    Backspace(usize),
    Delete(usize),
    /// Drag-select `start..end`, then click
    Select { start: usize, end: usize },
    /// Click at a position (or where the caret is)
    Click(Option<usize>),
    /// Try to drop text onto the control
    Drop(String),
    Focus,
    /// Blur, which commits the value
    Blur,
    /// Let time pass, firing a due caret correction
    Wait(u64),
    SetValue(String),
    SetUnmasked(String),
    SetMask(MaskSource),
    Print,
}

/// A parsed line, keeping its source for reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub source: String,
    pub step: Step,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: `{command}` needs {expected}")]
    MissingArgument {
        line: usize,
        command: String,
        expected: &'static str,
    },

    #[error("line {line}: invalid argument `{argument}`: {message}")]
    InvalidArgument {
        line: usize,
        argument: String,
        message: String,
    },

    #[error("line {line}: {source}")]
    Mask {
        line: usize,
        #[source]
        source: MaskError,
    },
}
