//! Edit controller: keeps a bound control in sync with a mask engine.
//!
//! Flow for one user edit:
//!
//! ```text
//! Press  -> snapshot selection (and flag uncontrolled changes)
//! Input  -> EditDetails::resolve -> Masked::apply_edit -> update_control
//!        -> update_cursor (immediate write + deferred correction)
//! Change -> resync if needed -> Masked::commit -> update_control
//! ```
//!
//! The controller never blocks. The deferred caret correction is driven by
//! the host through [`InputMask::correction_deadline`] and
//! [`InputMask::poll_correction`].

use std::time::{Duration, Instant};

use crate::control::{Control, ControlEvent, Interaction, ListenerId};
use crate::correction::{Clock, PendingCorrection, SystemClock, DEFAULT_CORRECTION_DELAY};
use crate::diff::EditDetails;
use crate::editable::Selection;
use crate::mask::{
    create_mask, mask_kind, Direction, MaskError, MaskKind, MaskOptions, MaskSource, Masked,
};
use crate::notify::{Diagnostic, HandlerId, Listeners, Notification};

/// Tunables that are not part of the mask configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Delay before a pending caret correction is re-applied
    pub correction_delay: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            correction_delay: DEFAULT_CORRECTION_DELAY,
        }
    }
}

/// Binds a [`Control`] to a mask engine.
pub struct InputMask<C: Control> {
    control: C,
    masked: Box<dyn Masked>,
    subscriptions: Vec<ListenerId>,
    listeners: Listeners,

    /// Last value written through `update_control`
    value: String,
    unmasked_value: String,
    /// Selection captured before the current edit
    selection: Selection,

    pending: PendingCorrection,
    settings: ControllerSettings,
    clock: Box<dyn Clock>,
}

impl<C: Control> std::fmt::Debug for InputMask<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputMask")
            .field("masked", &self.masked)
            .field("value", &self.value)
            .field("unmasked_value", &self.unmasked_value)
            .field("selection", &self.selection)
            .field("pending", &self.pending)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<C: Control> InputMask<C> {
    pub fn new(control: C, options: MaskOptions) -> Result<Self, MaskError> {
        Self::with_settings(control, options, ControllerSettings::default(), SystemClock)
    }

    /// Build a controller, subscribe to the control and seed from its text
    pub fn with_settings(
        mut control: C,
        options: MaskOptions,
        settings: ControllerSettings,
        clock: impl Clock + 'static,
    ) -> Result<Self, MaskError> {
        let masked = create_mask(&options)?;

        let subscriptions = Interaction::ALL
            .iter()
            .map(|&interaction| control.add_listener(interaction))
            .collect();
        let selection = control.selection();

        let mut this = Self {
            control,
            masked,
            subscriptions,
            listeners: Listeners::new(),
            value: String::new(),
            unmasked_value: String::new(),
            selection,
            pending: PendingCorrection::default(),
            settings,
            clock: Box::new(clock),
        };

        this.update_value();
        this.on_change();
        tracing::debug!(mask = %this.masked.mask(), value = %this.value, "input mask bound");
        Ok(this)
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn masked(&self) -> &dyn Masked {
        self.masked.as_ref()
    }

    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    // === Mask configuration ===

    pub fn mask(&self) -> &MaskSource {
        self.masked.mask()
    }

    /// Replace the mask. A mask of the same kind is applied in place; another
    /// kind gets a new engine seeded with the current unmasked value.
    pub fn set_mask(&mut self, mask: Option<MaskSource>) -> Result<(), MaskError> {
        let Some(mask) = mask else {
            return Ok(());
        };
        if &mask == self.masked.mask() {
            return Ok(());
        }

        if mask_kind(&mask) == self.masked.kind() {
            tracing::debug!(mask = %mask, "updating mask in place");
            self.masked.set_mask(mask)?;
        } else {
            self.swap_engine(MaskOptions::with_mask(mask))?;
        }

        self.update_control();
        Ok(())
    }

    fn swap_engine(&mut self, options: MaskOptions) -> Result<(), MaskError> {
        let mut masked = create_mask(&options)?;
        masked.set_unmasked_value(self.masked.unmasked_value());
        tracing::debug!(
            from = ?self.masked.kind(),
            to = ?masked.kind(),
            unmasked = %masked.unmasked_value(),
            "swapped mask engine"
        );
        self.masked = masked;
        Ok(())
    }

    /// Apply option changes. Does nothing if every requested option already
    /// has that value.
    pub fn update_options(&mut self, mut options: MaskOptions) -> Result<(), MaskError> {
        // A date engine already is the date mask
        if options.mask == Some(MaskSource::Date) && self.masked.kind() == MaskKind::Date {
            options.mask = None;
        }

        if self.masked.options().includes(&options) {
            tracing::trace!("update_options: nothing changed");
            return Ok(());
        }

        if let Some(mask) = &options.mask {
            if mask_kind(mask) != self.masked.kind() {
                self.swap_engine(MaskOptions::with_mask(mask.clone()))?;
                options.mask = None;
            }
        }

        self.masked.update_options(&options)?;
        tracing::debug!(options = ?self.masked.options(), "options updated");
        self.update_control();
        Ok(())
    }

    // === Values ===

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.masked.set_value(value);
        self.update_control();
        self.align_cursor();
    }

    pub fn unmasked_value(&self) -> &str {
        &self.unmasked_value
    }

    pub fn set_unmasked_value(&mut self, value: &str) {
        self.masked.set_unmasked_value(value);
        self.update_control();
        self.align_cursor();
    }

    pub fn is_complete(&self) -> bool {
        self.masked.is_complete()
    }

    fn update_value(&mut self) {
        let live = self.control.value();
        self.masked.set_value(&live);
    }

    /// Push the engine state into the cache and the control, notifying on change
    pub fn update_control(&mut self) {
        let new_value = self.masked.value();
        let new_unmasked = self.masked.unmasked_value();
        let changed = self.value != new_value || self.unmasked_value != new_unmasked;

        if changed {
            self.value = new_value.to_string();
            self.unmasked_value = new_unmasked.to_string();
        }

        if self.control.value() != self.value {
            self.control.set_value(&self.value);
        }

        if changed {
            tracing::trace!(value = %self.value, unmasked = %self.unmasked_value, "value accepted");
            self.listeners.fire(Notification::Accept);
            if self.masked.is_complete() {
                self.listeners.fire(Notification::Complete);
            }
        }
    }

    // === Caret ===

    /// Selection start, or the pending correction target while one is scheduled
    pub fn selection_start(&self) -> usize {
        self.pending
            .target()
            .unwrap_or_else(|| self.control.selection().start)
    }

    /// Caret position, or the pending correction target while one is scheduled
    pub fn cursor_pos(&self) -> usize {
        self.pending
            .target()
            .unwrap_or_else(|| self.control.selection().end)
    }

    /// Move the caret. Ignored unless the control has focus.
    pub fn set_cursor_pos(&mut self, pos: usize) {
        if !self.control.has_focus() {
            tracing::trace!(pos, "control not focused, caret left alone");
            return;
        }

        self.control.set_selection_range(pos, pos);
        self.save_selection();
    }

    fn save_selection(&mut self) {
        let live = self.control.value();
        if self.value != live {
            self.listeners.report(Diagnostic::UncontrolledChange {
                cached: self.value.clone(),
                live,
            });
        }

        self.selection = Selection::new(self.selection_start(), self.cursor_pos());
    }

    /// Move the caret to the nearest input position on its left
    pub fn align_cursor(&mut self) {
        let pos = self.masked.nearest_input_pos(self.cursor_pos(), Direction::Left);
        self.set_cursor_pos(pos);
    }

    /// Align the caret, but leave a non-empty selection alone
    pub fn align_cursor_friendly(&mut self) {
        if self.selection_start() != self.cursor_pos() {
            return;
        }
        self.align_cursor();
    }

    /// Place the caret now and again after the correction delay
    pub fn update_cursor(&mut self, pos: Option<usize>) {
        let Some(pos) = pos else {
            return;
        };

        self.set_cursor_pos(pos);
        let due = self.clock.now() + self.settings.correction_delay;
        self.pending.arm(pos, due);
        tracing::trace!(pos, "caret correction armed");
    }

    /// When the pending correction should be applied, if any
    pub fn correction_deadline(&self) -> Option<Instant> {
        self.pending.due()
    }

    pub fn has_pending_correction(&self) -> bool {
        self.pending.is_scheduled()
    }

    /// Apply the pending correction if it is due. Returns true if it fired.
    pub fn poll_correction(&mut self) -> bool {
        let Some(target) = self.pending.take_due(self.clock.now()) else {
            return false;
        };

        self.set_cursor_pos(target);
        self.pending.cancel();
        tracing::trace!(target, "caret correction applied");
        true
    }

    pub fn abort_correction(&mut self) {
        if self.pending.is_scheduled() {
            tracing::trace!("caret correction cancelled");
        }
        self.pending.cancel();
    }

    // === Interaction handling ===

    pub fn handle_event(&mut self, event: &mut ControlEvent) {
        tracing::trace!(event = event.interaction().name(), "handling event");
        match event.interaction() {
            Interaction::Press => self.save_selection(),
            Interaction::Input => self.on_input(),
            Interaction::Drop => {
                event.prevent_default();
                event.stop_propagation();
            }
            Interaction::Click => self.align_cursor_friendly(),
            Interaction::Change => self.on_change(),
        }
    }

    fn on_input(&mut self) {
        self.abort_correction();

        let details = EditDetails::resolve(
            &self.control.value(),
            self.cursor_pos(),
            &self.value,
            self.selection,
        );

        let start = details.start_change_pos();
        let change = self.masked.apply_edit(
            start,
            details.removed_count(),
            details.inserted(),
            details.removal_direction(),
        );
        tracing::trace!(
            start,
            removed = details.removed(),
            inserted = details.inserted(),
            accepted = %change.inserted,
            offset = change.offset,
            "edit applied"
        );

        let target = (start as isize + change.offset).max(0) as usize;
        let cursor_pos = self.masked.nearest_input_pos(target, Direction::None);

        self.update_control();
        self.update_cursor(Some(cursor_pos));
    }

    fn on_change(&mut self) {
        if self.value != self.control.value() {
            self.update_value();
        }
        self.masked.commit();
        self.update_control();
    }

    // === Notifications ===

    pub fn on(&mut self, kind: Notification, handler: impl FnMut() + 'static) -> HandlerId {
        self.listeners.on(kind, handler)
    }

    /// Remove one handler, or all handlers of `kind` when `id` is `None`
    pub fn off(&mut self, kind: Notification, id: Option<HandlerId>) {
        self.listeners.off(kind, id);
    }

    pub fn on_diagnostic(&mut self, handler: impl FnMut(&Diagnostic) + 'static) {
        self.listeners.on_diagnostic(handler);
    }

    /// Unsubscribe from the control, drop all handlers and hand the control back.
    /// A scheduled correction dies with the controller.
    pub fn destroy(mut self) -> C {
        for id in self.subscriptions.drain(..) {
            self.control.remove_listener(id);
        }
        self.listeners.clear();
        self.pending.cancel();
        tracing::debug!("input mask destroyed");
        self.control
    }
}
