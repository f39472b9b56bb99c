//! Masked text input controller
//!
//! This crate keeps an editable text control in sync with a masking engine
//! while the user types: it turns raw before/after edits into structured
//! edits, feeds them to the engine, writes the canonical value back and keeps
//! the caret on a valid input position.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod control;
pub mod controller;
pub mod correction;
pub mod diff;
pub mod editable;
pub mod mask;
pub mod notify;
pub mod script;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::PlaygroundConfig;
pub use control::{Control, ControlEvent, Interaction, TextInput};
pub use controller::{ControllerSettings, InputMask};
pub use correction::{Clock, ManualClock, SystemClock};
pub use diff::EditDetails;
pub use editable::Selection;
pub use mask::{Direction, MaskError, MaskOptions, MaskSource, Masked};
pub use notify::{Diagnostic, HandlerId, Notification};
