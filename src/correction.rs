//! Deferred caret correction.
//!
//! Some platforms move the caret again after an input event has been handled.
//! The controller writes the caret immediately and also arms a correction that
//! re-applies the same position a little later. The host drives the timer: it
//! asks for [`PendingCorrection::due`] and polls once that instant has passed.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Default delay before a pending correction is applied
pub const DEFAULT_CORRECTION_DELAY: Duration = Duration::from_millis(10);

/// Time source for scheduling corrections
pub trait Clock: fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock; clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// At most one scheduled caret placement.
///
/// Idle -> Scheduled on [`arm`](Self::arm); Scheduled -> Idle when it fires
/// ([`take_due`](Self::take_due)) or is [`cancel`](Self::cancel)led. Arming
/// while scheduled replaces the previous target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PendingCorrection {
    #[default]
    Idle,
    Scheduled { target: usize, due: Instant },
}

impl PendingCorrection {
    pub fn arm(&mut self, target: usize, due: Instant) {
        self.cancel();
        *self = PendingCorrection::Scheduled { target, due };
    }

    pub fn cancel(&mut self) {
        *self = PendingCorrection::Idle;
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, PendingCorrection::Scheduled { .. })
    }

    pub fn target(&self) -> Option<usize> {
        match self {
            PendingCorrection::Scheduled { target, .. } => Some(*target),
            PendingCorrection::Idle => None,
        }
    }

    pub fn due(&self) -> Option<Instant> {
        match self {
            PendingCorrection::Scheduled { due, .. } => Some(*due),
            PendingCorrection::Idle => None,
        }
    }

    /// Target position if the correction is due at `now`; state is left untouched
    pub fn take_due(&self, now: Instant) -> Option<usize> {
        match self {
            PendingCorrection::Scheduled { target, due } if *due <= now => Some(*target),
            _ => None,
        }
    }
}
