use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use super::{ScriptError, ScriptLine, Step};
use crate::control::{Control, ControlEvent, Interaction, TextInput};
use crate::controller::{ControllerSettings, InputMask};
use crate::correction::ManualClock;
use crate::mask::{MaskError, MaskOptions};
use crate::notify::{Diagnostic, Notification};

type SharedInput = Rc<RefCell<TextInput>>;

/// State after one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub value: String,
    pub unmasked: String,
    pub selection: (usize, usize),
    pub complete: bool,
    /// Target of a scheduled caret correction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_caret: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} value={:?} unmasked={:?} ",
            self.step, self.value, self.unmasked
        )?;
        let (start, end) = self.selection;
        if start == end {
            write!(f, "caret={}", start)?;
        } else {
            write!(f, "selection={}..{}", start, end)?;
        }
        if self.complete {
            f.write_str(" complete")?;
        }
        if let Some(pos) = self.pending_caret {
            write!(f, " pending={}", pos)?;
        }
        if !self.notifications.is_empty() {
            write!(f, " [{}]", self.notifications.join(", "))?;
        }
        for diagnostic in &self.diagnostics {
            write!(f, "\n  warning: {}", diagnostic)?;
        }
        Ok(())
    }
}

/// A focused text input bound to a mask, with a manual clock.
pub struct Session {
    input: SharedInput,
    clock: ManualClock,
    mask: InputMask<SharedInput>,
    fired: Rc<RefCell<Vec<Notification>>>,
    diagnostics: Rc<RefCell<Vec<Diagnostic>>>,
}

impl Session {
    pub fn new(options: MaskOptions, settings: ControllerSettings) -> Result<Self, MaskError> {
        let input = Rc::new(RefCell::new(TextInput::new()));
        input.borrow_mut().focus();
        let clock = ManualClock::new();
        let mut mask = InputMask::with_settings(input.clone(), options, settings, clock.clone())?;

        let fired = Rc::new(RefCell::new(Vec::new()));
        for kind in [Notification::Accept, Notification::Complete] {
            let sink = fired.clone();
            mask.on(kind, move || sink.borrow_mut().push(kind));
        }
        let diagnostics = Rc::new(RefCell::new(Vec::new()));
        let sink = diagnostics.clone();
        mask.on_diagnostic(move |d| sink.borrow_mut().push(d.clone()));

        Ok(Self {
            input,
            clock,
            mask,
            fired,
            diagnostics,
        })
    }

    pub fn mask(&self) -> &InputMask<SharedInput> {
        &self.mask
    }

    /// Run every line, stopping at the first failing one
    pub fn run(&mut self, lines: &[ScriptLine]) -> Result<Vec<StepReport>, ScriptError> {
        lines.iter().map(|line| self.run_line(line)).collect()
    }

    pub fn run_line(&mut self, line: &ScriptLine) -> Result<StepReport, ScriptError> {
        tracing::debug!(line = line.line, step = %line.source, "running step");
        self.apply(&line.step)
            .map_err(|source| ScriptError::Mask {
                line: line.line,
                source,
            })?;
        Ok(self.report(&line.source))
    }

    fn dispatch(&mut self, interaction: Interaction) -> ControlEvent {
        let mut event = ControlEvent::new(interaction);
        self.mask.handle_event(&mut event);
        event
    }

    fn apply(&mut self, step: &Step) -> Result<(), MaskError> {
        match step {
            Step::Type(text) => {
                for ch in text.chars() {
                    self.dispatch(Interaction::Press);
                    self.input.borrow_mut().insert_text(ch.encode_utf8(&mut [0; 4]));
                    self.dispatch(Interaction::Input);
                }
            }
            Step::Paste(text) => {
                self.dispatch(Interaction::Press);
                self.input.borrow_mut().insert_text(text);
                self.dispatch(Interaction::Input);
            }
            Step::Backspace(count) => {
                for _ in 0..*count {
                    self.dispatch(Interaction::Press);
                    let changed = self.input.borrow_mut().delete_backward();
                    if changed {
                        self.dispatch(Interaction::Input);
                    }
                }
            }
            Step::Delete(count) => {
                for _ in 0..*count {
                    self.dispatch(Interaction::Press);
                    let changed = self.input.borrow_mut().delete_forward();
                    if changed {
                        self.dispatch(Interaction::Input);
                    }
                }
            }
            Step::Select { start, end } => {
                self.input.borrow_mut().select(*start, *end);
                self.dispatch(Interaction::Click);
            }
            Step::Click(pos) => {
                if let Some(pos) = pos {
                    self.input.borrow_mut().select(*pos, *pos);
                }
                self.dispatch(Interaction::Click);
            }
            Step::Drop(text) => {
                let event = self.dispatch(Interaction::Drop);
                if !event.is_default_prevented() {
                    self.input.borrow_mut().insert_text(text);
                    self.dispatch(Interaction::Input);
                }
            }
            Step::Focus => self.input.borrow_mut().focus(),
            Step::Blur => {
                self.input.borrow_mut().blur();
                self.dispatch(Interaction::Change);
            }
            Step::Wait(ms) => {
                self.clock.advance(Duration::from_millis(*ms));
                self.mask.poll_correction();
            }
            Step::SetValue(value) => self.mask.set_value(value),
            Step::SetUnmasked(value) => self.mask.set_unmasked_value(value),
            Step::SetMask(source) => self.mask.set_mask(Some(source.clone()))?,
            Step::Print => {}
        }
        Ok(())
    }

    fn report(&mut self, step: &str) -> StepReport {
        let selection = self.input.borrow().selection();
        StepReport {
            step: step.to_string(),
            value: self.mask.value().to_string(),
            unmasked: self.mask.unmasked_value().to_string(),
            selection: (selection.start, selection.end),
            complete: self.mask.is_complete(),
            pending_caret: self
                .mask
                .has_pending_correction()
                .then(|| self.mask.cursor_pos()),
            notifications: self.fired.borrow_mut().drain(..).map(|n| n.name()).collect(),
            diagnostics: self
                .diagnostics
                .borrow_mut()
                .drain(..)
                .map(|d| d.to_string())
                .collect(),
        }
    }
}
