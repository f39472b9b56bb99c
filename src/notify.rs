//! Notification bus and diagnostics channel.
//!
//! Handlers fire synchronously in registration order. Notifications carry no
//! payload; observers read the current state from the controller.

use std::fmt;

/// Notification kinds emitted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The value changed
    Accept,
    /// The mask is fully satisfied (fired after `Accept`)
    Complete,
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::Accept => "accept",
            Notification::Complete => "complete",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by [`Listeners::on`], used to unregister one handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub type Handler = Box<dyn FnMut()>;

/// Non-fatal conditions the controller detected and recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The control's text changed without the controller being told
    UncontrolledChange { cached: String, live: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UncontrolledChange { cached, live } => write!(
                f,
                "control value changed outside the mask (cached {:?}, live {:?})",
                cached, live
            ),
        }
    }
}

pub type DiagnosticHandler = Box<dyn FnMut(&Diagnostic)>;

/// Ordered handler lists per notification kind
#[derive(Default)]
pub struct Listeners {
    accept: Vec<(HandlerId, Handler)>,
    complete: Vec<(HandlerId, Handler)>,
    diagnostics: Vec<DiagnosticHandler>,
    next_id: u64,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("accept", &self.accept.len())
            .field("complete", &self.complete.len())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn handlers_mut(&mut self, kind: Notification) -> &mut Vec<(HandlerId, Handler)> {
        match kind {
            Notification::Accept => &mut self.accept,
            Notification::Complete => &mut self.complete,
        }
    }

    pub fn on(&mut self, kind: Notification, handler: impl FnMut() + 'static) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers_mut(kind).push((id, Box::new(handler)));
        id
    }

    /// Remove one handler, or every handler of `kind` when `id` is `None`.
    /// Unknown ids are ignored.
    pub fn off(&mut self, kind: Notification, id: Option<HandlerId>) {
        let handlers = self.handlers_mut(kind);
        match id {
            Some(id) => handlers.retain(|(handler_id, _)| *handler_id != id),
            None => handlers.clear(),
        }
    }

    pub fn fire(&mut self, kind: Notification) {
        for (_, handler) in self.handlers_mut(kind).iter_mut() {
            handler();
        }
    }

    pub fn on_diagnostic(&mut self, handler: impl FnMut(&Diagnostic) + 'static) {
        self.diagnostics.push(Box::new(handler));
    }

    /// Log `diagnostic` and hand it to every diagnostic observer
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UncontrolledChange { cached, live } => {
                tracing::warn!(
                    cached = %cached,
                    live = %live,
                    "Element value was changed outside of mask. Call `update_control()` to resynchronize."
                );
            }
        }
        for handler in self.diagnostics.iter_mut() {
            handler(&diagnostic);
        }
    }

    pub fn count(&self, kind: Notification) -> usize {
        match kind {
            Notification::Accept => self.accept.len(),
            Notification::Complete => self.complete.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accept.is_empty() && self.complete.is_empty() && self.diagnostics.is_empty()
    }

    /// Drop every handler, diagnostics included
    pub fn clear(&mut self) {
        self.accept.clear();
        self.complete.clear();
        self.diagnostics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnMut()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |tag: &'static str| {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(tag)) as Box<dyn FnMut()>
        };
        (log, make)
    }

    #[test]
    fn test_fire_in_registration_order() {
        let (log, make) = recorder();
        let mut listeners = Listeners::new();
        listeners.on(Notification::Accept, make("first"));
        listeners.on(Notification::Accept, make("second"));
        listeners.on(Notification::Complete, make("done"));

        listeners.fire(Notification::Accept);
        assert_eq!(*log.borrow(), ["first", "second"]);

        listeners.fire(Notification::Complete);
        assert_eq!(*log.borrow(), ["first", "second", "done"]);
    }

    #[test]
    fn test_off_single_and_all() {
        let (log, make) = recorder();
        let mut listeners = Listeners::new();
        let a = listeners.on(Notification::Accept, make("a"));
        listeners.on(Notification::Accept, make("b"));

        listeners.off(Notification::Accept, Some(a));
        listeners.fire(Notification::Accept);
        assert_eq!(*log.borrow(), ["b"]);

        listeners.off(Notification::Accept, None);
        listeners.fire(Notification::Accept);
        assert_eq!(*log.borrow(), ["b"]);
        assert_eq!(listeners.count(Notification::Accept), 0);
    }

    #[test]
    fn test_off_unknown_id_is_ignored() {
        let (_, make) = recorder();
        let mut listeners = Listeners::new();
        let id = listeners.on(Notification::Complete, make("x"));
        listeners.on(Notification::Accept, make("y"));

        // Registered under Complete, so removing it from Accept does nothing
        listeners.off(Notification::Accept, Some(id));
        assert_eq!(listeners.count(Notification::Accept), 1);
        assert_eq!(listeners.count(Notification::Complete), 1);
    }

    #[test]
    fn test_report_reaches_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut listeners = Listeners::new();
        listeners.on_diagnostic(move |d| sink.borrow_mut().push(d.clone()));

        listeners.report(Diagnostic::UncontrolledChange {
            cached: "1".into(),
            live: "x".into(),
        });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_clear() {
        let (_, make) = recorder();
        let mut listeners = Listeners::new();
        listeners.on(Notification::Accept, make("a"));
        listeners.on_diagnostic(|_| {});
        assert!(!listeners.is_empty());

        listeners.clear();
        assert!(listeners.is_empty());
    }
}
