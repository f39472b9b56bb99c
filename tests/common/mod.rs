//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use maskedit::correction::DEFAULT_CORRECTION_DELAY;
use maskedit::{
    ControlEvent, ControllerSettings, InputMask, Interaction, ManualClock, MaskOptions, MaskSource,
    Notification, TextInput,
};

pub type SharedInput = Rc<RefCell<TextInput>>;

/// A focused text input bound to a mask, recording every notification
pub struct Harness {
    pub input: SharedInput,
    pub clock: ManualClock,
    pub mask: InputMask<SharedInput>,
    pub fired: Rc<RefCell<Vec<Notification>>>,
}

impl Harness {
    pub fn new(options: MaskOptions) -> Self {
        Self::with_text(options, "")
    }

    pub fn pattern(pattern: &str) -> Self {
        Self::new(MaskOptions::with_mask(MaskSource::pattern(pattern)))
    }

    pub fn with_text(options: MaskOptions, text: &str) -> Self {
        let input = Rc::new(RefCell::new(TextInput::with_text(text)));
        input.borrow_mut().focus();
        let clock = ManualClock::new();
        let mut mask = InputMask::with_settings(
            input.clone(),
            options,
            ControllerSettings::default(),
            clock.clone(),
        )
        .unwrap();

        let fired = Rc::new(RefCell::new(Vec::new()));
        for kind in [Notification::Accept, Notification::Complete] {
            let sink = fired.clone();
            mask.on(kind, move || sink.borrow_mut().push(kind));
        }

        Self {
            input,
            clock,
            mask,
            fired,
        }
    }

    pub fn dispatch(&mut self, interaction: Interaction) -> ControlEvent {
        let mut event = ControlEvent::new(interaction);
        self.mask.handle_event(&mut event);
        event
    }

    /// One keystroke per character: press, platform insert, input
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.dispatch(Interaction::Press);
            self.input.borrow_mut().insert_text(&ch.to_string());
            self.dispatch(Interaction::Input);
        }
    }

    /// A single input inserting all of `text`
    pub fn paste(&mut self, text: &str) {
        self.dispatch(Interaction::Press);
        self.input.borrow_mut().insert_text(text);
        self.dispatch(Interaction::Input);
    }

    pub fn backspace(&mut self) {
        self.dispatch(Interaction::Press);
        if self.input.borrow_mut().delete_backward() {
            self.dispatch(Interaction::Input);
        }
    }

    pub fn delete(&mut self) {
        self.dispatch(Interaction::Press);
        if self.input.borrow_mut().delete_forward() {
            self.dispatch(Interaction::Input);
        }
    }

    /// Put the caret somewhere without telling the controller
    pub fn place_caret(&mut self, pos: usize) {
        self.input.borrow_mut().select(pos, pos);
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.input.borrow_mut().select(start, end);
    }

    pub fn click_at(&mut self, pos: usize) {
        self.place_caret(pos);
        self.dispatch(Interaction::Click);
    }

    pub fn blur(&mut self) {
        self.input.borrow_mut().blur();
        self.dispatch(Interaction::Change);
    }

    /// Let the correction delay pass and poll
    pub fn settle(&mut self) -> bool {
        self.wait(DEFAULT_CORRECTION_DELAY)
    }

    pub fn wait(&mut self, by: Duration) -> bool {
        self.clock.advance(by);
        self.mask.poll_correction()
    }

    pub fn text(&self) -> String {
        self.input.borrow().text().to_string()
    }

    pub fn caret(&self) -> usize {
        self.input.borrow().caret()
    }

    /// Notifications fired since the last call
    pub fn take_fired(&self) -> Vec<Notification> {
        self.fired.borrow_mut().drain(..).collect()
    }
}
