//! Caret and selection types shared by controls and the controller.

mod selection;

pub use selection::{AnchoredSelection, Selection};
