//! Timer requests and firings

use crate::Stime;

/// A timer event crossing a stage boundary.
///
/// A request without a later matching firing is not an error: the next
/// hardware frame implicitly cancels any pending request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// A stage asked to be woken after `when`
    Request {
        /// Requested timeout
        when: Stime,
    },
    /// The driver invoked the chain's timer handler at `now`
    Firing {
        /// Current pipeline time
        now: Stime,
    },
}

impl TimerEvent {
    /// The timestamp carried by either variant.
    pub fn time(&self) -> Stime {
        match *self {
            TimerEvent::Request { when } => when,
            TimerEvent::Firing { now } => now,
        }
    }
}
