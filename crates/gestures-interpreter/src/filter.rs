//! Wrapping stages
//!
//! A [`Filter`] supplies hooks; [`FilterInterpreter`] owns the filter and the
//! wrapped stage and runs the hooks around delegation.

use gestures_events::{Gesture, HardwareFrame, Stime};
use tracing::trace;

use crate::interpreter::{GestureConsumer, InitContext, Interpreter};

/// Hooks for a stage that wraps another stage.
///
/// Every hook has a pass-through default, so a filter implements only what
/// it changes.
pub trait Filter {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Local setup, run after the wrapped stage has initialized.
    fn initialize(&mut self, _ctx: &InitContext<'_>) {}

    /// Runs before the frame is delegated inward.
    fn will_interpret(&mut self, _frame: &mut HardwareFrame) {}

    /// Runs after delegation returns, with the chain's pending request.
    fn did_interpret(&mut self, _frame: &HardwareFrame, _timeout: &mut Option<Stime>) {}

    /// Runs before a timer firing is delegated inward.
    fn will_handle_timer(&mut self, _now: Stime) {}

    /// Runs after timer delegation returns.
    fn did_handle_timer(&mut self, _now: Stime, _timeout: &mut Option<Stime>) {}

    /// Transform, drop or forward one gesture from the wrapped stage.
    fn consume_gesture(&mut self, gesture: &Gesture, out: &mut dyn GestureConsumer) {
        out.consume_gesture(gesture);
    }
}

/// A stage made of a [`Filter`] and the stage it exclusively owns.
pub struct FilterInterpreter<F> {
    filter: F,
    next: Box<dyn Interpreter>,
}

/// Outward path handed to the wrapped stage: routes each gesture through the
/// filter and on to the consumer above.
struct Relay<'a, 'b, F> {
    filter: &'a mut F,
    out: &'a mut (dyn GestureConsumer + 'b),
}

impl<F: Filter> GestureConsumer for Relay<'_, '_, F> {
    fn consume_gesture(&mut self, gesture: &Gesture) {
        self.filter.consume_gesture(gesture, self.out);
    }
}

impl<F: Filter> FilterInterpreter<F> {
    /// Wrap `next` with `filter`.
    pub fn new(filter: F, next: Box<dyn Interpreter>) -> Self {
        Self { filter, next }
    }

    /// The filter's hooks.
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Mutable access to the filter's hooks.
    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.filter
    }
}

impl<F: Filter> Interpreter for FilterInterpreter<F> {
    fn name(&self) -> &str {
        self.filter.name()
    }

    fn initialize(&mut self, ctx: &InitContext<'_>) {
        self.next.initialize(ctx);
        self.filter.initialize(ctx);
        trace!(stage = self.filter.name(), "stage initialized");
    }

    fn sync_interpret(
        &mut self,
        frame: &mut HardwareFrame,
        timeout: &mut Option<Stime>,
        out: &mut dyn GestureConsumer,
    ) {
        self.filter.will_interpret(frame);
        let mut relay = Relay {
            filter: &mut self.filter,
            out,
        };
        self.next.sync_interpret(frame, timeout, &mut relay);
        self.filter.did_interpret(frame, timeout);
    }

    fn handle_timer(
        &mut self,
        now: Stime,
        timeout: &mut Option<Stime>,
        out: &mut dyn GestureConsumer,
    ) {
        self.filter.will_handle_timer(now);
        let mut relay = Relay {
            filter: &mut self.filter,
            out,
        };
        self.next.handle_timer(now, timeout, &mut relay);
        self.filter.did_handle_timer(now, timeout);
    }
}

impl<F: std::fmt::Debug> std::fmt::Debug for FilterInterpreter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterInterpreter")
            .field("filter", &self.filter)
            .field("next", &self.next.name())
            .finish()
    }
}
