//! Bound control contract.
//!
//! A control is any text-entry widget exposing a text value, a selection and
//! interaction events. The controller never owns the widget's rendering; it
//! only reads and writes through [`Control`].

mod text_input;

use std::cell::RefCell;
use std::rc::Rc;

use crate::editable::Selection;

pub use text_input::TextInput;

/// Interaction kinds a controller subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Key press, fired before the control applies the keystroke
    Press,
    /// The control's text was changed by user input
    Input,
    /// Something was dropped onto the control
    Drop,
    /// Pointer click inside the control
    Click,
    /// Value committed (blur / change)
    Change,
}

impl Interaction {
    pub const ALL: [Interaction; 5] = [
        Interaction::Press,
        Interaction::Input,
        Interaction::Drop,
        Interaction::Click,
        Interaction::Change,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Press => "press",
            Interaction::Input => "input",
            Interaction::Drop => "drop",
            Interaction::Click => "click",
            Interaction::Change => "change",
        }
    }
}

/// Handle for one subscription on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// An interaction as delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    interaction: Interaction,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl ControlEvent {
    pub fn new(interaction: Interaction) -> Self {
        Self {
            interaction,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Suppress the platform's default handling
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Keep the event from reaching outer handlers
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl From<Interaction> for ControlEvent {
    fn from(interaction: Interaction) -> Self {
        Self::new(interaction)
    }
}

/// The text-entry widget a controller is bound to.
///
/// Offsets are character offsets.
pub trait Control {
    fn value(&self) -> String;

    /// Programmatic write. Must not dispatch an [`Interaction::Input`].
    fn set_value(&mut self, value: &str);

    fn selection(&self) -> Selection;

    fn set_selection_range(&mut self, start: usize, end: usize);

    /// Whether the control currently holds interaction focus
    fn has_focus(&self) -> bool;

    fn add_listener(&mut self, interaction: Interaction) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);
}

/// Lets the host keep a handle on a control it lends to a controller.
impl<C: Control> Control for Rc<RefCell<C>> {
    fn value(&self) -> String {
        self.borrow().value()
    }

    fn set_value(&mut self, value: &str) {
        self.borrow_mut().set_value(value)
    }

    fn selection(&self) -> Selection {
        self.borrow().selection()
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        self.borrow_mut().set_selection_range(start, end)
    }

    fn has_focus(&self) -> bool {
        self.borrow().has_focus()
    }

    fn add_listener(&mut self, interaction: Interaction) -> ListenerId {
        self.borrow_mut().add_listener(interaction)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.borrow_mut().remove_listener(id)
    }
}
