//! Trailing-edge debounce driven by elapsed time instead of a wall clock.
//!
//! The core never reads the clock. The app feeds elapsed time in through
//! `Msg::Tick`, which keeps every debounce deterministic under test.
//!
//! A call lands somewhere inside a tick interval, so the first tick after a
//! call only marks the start of the idle window. Delivery may trail the
//! window by one tick but never precedes it.

use std::time::Duration;

/// Idle window before checkbox changes refetch the code panel.
pub const CODE_FETCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Idle window before a search query is applied to the tree.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Idle window before an extension selection change is persisted.
pub const EXTENSION_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Collapses bursts of calls into a single delivery of the latest arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    wait: Duration,
    idle: Duration,
    fresh: bool,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            idle: Duration::ZERO,
            fresh: false,
            pending: None,
        }
    }

    /// Records a call. Earlier pending arguments are discarded and the idle
    /// window restarts.
    pub fn call(&mut self, args: T) {
        self.pending = Some(args);
        self.idle = Duration::ZERO;
        self.fresh = true;
    }

    /// Advances time; yields the latest arguments once the window has passed
    /// without another call.
    pub fn advance(&mut self, elapsed: Duration) -> Option<T> {
        self.pending.as_ref()?;
        if std::mem::take(&mut self.fresh) {
            return None;
        }
        self.idle = self.idle.saturating_add(elapsed);
        if self.idle >= self.wait {
            self.idle = Duration::ZERO;
            self.pending.take()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.idle = Duration::ZERO;
        self.fresh = false;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
