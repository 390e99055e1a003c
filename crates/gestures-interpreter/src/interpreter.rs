//! Stage and consumer traits

use gestures_events::{Gesture, HardwareDescriptor, HardwareFrame, Stime};
use gestures_props::MetricsProperties;

/// Receives gestures on the outward path.
pub trait GestureConsumer {
    /// Accept one gesture. Called synchronously from inside the producing
    /// stage's `sync_interpret` or `handle_timer`.
    fn consume_gesture(&mut self, gesture: &Gesture);
}

impl<F: FnMut(&Gesture)> GestureConsumer for F {
    fn consume_gesture(&mut self, gesture: &Gesture) {
        self(gesture);
    }
}

/// Everything a stage sees at initialization.
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    /// Device geometry, fixed for the life of the pipeline
    pub descriptor: &'a HardwareDescriptor,
    /// Metrics tuning, when the embedder supplies it
    pub metrics_props: Option<&'a MetricsProperties>,
}

/// One stage of the chain.
///
/// The base interpreter implements this directly; wrapping stages get it
/// from [`FilterInterpreter`](crate::FilterInterpreter).
pub trait Interpreter {
    /// Short name used in diagnostics.
    fn name(&self) -> &str {
        "interpreter"
    }

    /// Called once before the first frame, and again on re-initialization.
    fn initialize(&mut self, _ctx: &InitContext<'_>) {}

    /// Process one hardware frame, emitting gestures to `out`.
    fn sync_interpret(
        &mut self,
        frame: &mut HardwareFrame,
        timeout: &mut Option<Stime>,
        out: &mut dyn GestureConsumer,
    );

    /// Handle a timer firing at `now`, emitting gestures to `out`.
    fn handle_timer(
        &mut self,
        _now: Stime,
        _timeout: &mut Option<Stime>,
        _out: &mut dyn GestureConsumer,
    ) {
    }
}

/// Fold a stage's own wakeup request into the chain's pending request,
/// keeping whichever is earlier.
pub fn merge_timeout(timeout: &mut Option<Stime>, request: Option<Stime>) {
    *timeout = match (*timeout, request) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_earlier() {
        let mut t = Some(2.0);
        merge_timeout(&mut t, Some(1.5));
        assert_eq!(t, Some(1.5));
        merge_timeout(&mut t, Some(3.0));
        assert_eq!(t, Some(1.5));
    }

    #[test]
    fn test_merge_never_drops_pending() {
        let mut t = Some(2.0);
        merge_timeout(&mut t, None);
        assert_eq!(t, Some(2.0));

        let mut none = None;
        merge_timeout(&mut none, Some(4.0));
        assert_eq!(none, Some(4.0));
    }

    #[test]
    fn test_closure_is_consumer() {
        let mut count = 0;
        {
            let mut consumer = |_: &Gesture| count += 1;
            let out: &mut dyn GestureConsumer = &mut consumer;
            out.consume_gesture(&Gesture::default());
            out.consume_gesture(&Gesture::default());
        }
        assert_eq!(count, 2);
    }
}
