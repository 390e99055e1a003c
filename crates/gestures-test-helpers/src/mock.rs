//! Mock stages and consumers for pipeline tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use gestures_events::{FingerTouch, Gesture, HardwareFrame, Stime};
use gestures_interpreter::{
    GestureConsumer, InitContext, Interpreter, MetricsCollector, merge_timeout,
};

/// A minimal base interpreter that turns finger motion into gestures.
///
/// - one finger moving: `Move` with the position delta in device units
/// - two fingers moving: `Scroll` with the mean delta
/// - a change in the button mask: `ButtonsChange`
///
/// Deltas are taken against the previous frame, matching fingers by
/// tracking id. The gesture spans the two frame timestamps. Deltas no
/// larger than `f32::EPSILON` on both axes count as no motion.
#[derive(Debug, Default)]
pub struct MotionInterpreter {
    prev: Option<HardwareFrame>,
    initialized: usize,
}

impl MotionInterpreter {
    /// Create the interpreter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `initialize` calls seen.
    pub fn initialize_count(&self) -> usize {
        self.initialized
    }

    fn mean_delta(prev: &HardwareFrame, fingers: &[FingerTouch]) -> Option<(f32, f32)> {
        let mut sum = (0.0_f32, 0.0_f32);
        for finger in fingers {
            let before = prev.finger_by_tracking_id(finger.tracking_id)?;
            sum.0 += finger.position_x - before.position_x;
            sum.1 += finger.position_y - before.position_y;
        }
        let n = fingers.len() as f32;
        Some((sum.0 / n, sum.1 / n))
    }
}

impl Interpreter for MotionInterpreter {
    fn name(&self) -> &str {
        "motion"
    }

    fn initialize(&mut self, _ctx: &InitContext<'_>) {
        self.prev = None;
        self.initialized += 1;
    }

    fn sync_interpret(
        &mut self,
        frame: &mut HardwareFrame,
        _timeout: &mut Option<Stime>,
        out: &mut dyn GestureConsumer,
    ) {
        if let Some(prev) = &self.prev {
            let (start, end) = (prev.timestamp, frame.timestamp);
            if prev.buttons_down != frame.buttons_down {
                let down = frame.buttons_down & !prev.buttons_down;
                let up = prev.buttons_down & !frame.buttons_down;
                out.consume_gesture(&Gesture::new_buttons_change(start, end, down, up));
            }
            match frame.fingers.len() {
                1 | 2 => {
                    if let Some((dx, dy)) = Self::mean_delta(prev, &frame.fingers) {
                        if dx.abs() > f32::EPSILON || dy.abs() > f32::EPSILON {
                            let gesture = if frame.fingers.len() == 1 {
                                Gesture::new_move(start, end, dx, dy)
                            } else {
                                Gesture::new_scroll(start, end, dx, dy)
                            };
                            out.consume_gesture(&gesture);
                        }
                    }
                }
                _ => {}
            }
        }
        self.prev = Some(frame.clone());
    }
}

/// A base interpreter driven by a script instead of finger data.
///
/// Each frame requests a wakeup `frame_delay` seconds after its timestamp.
/// Each timer firing emits the next scripted gesture, re-stamped to `now`,
/// and requests another wakeup while the script is not exhausted.
#[derive(Debug, Default)]
pub struct ScriptedInterpreter {
    frame_delay: Option<Stime>,
    on_timer: VecDeque<Gesture>,
    frames: Rc<Cell<usize>>,
    timers: Rc<Cell<usize>>,
}

impl ScriptedInterpreter {
    /// Create an interpreter with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a wakeup this long after every frame.
    #[must_use]
    pub fn with_frame_timeout(mut self, delay: Stime) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Append a gesture to emit on a timer firing.
    #[must_use]
    pub fn with_timer_gesture(mut self, gesture: Gesture) -> Self {
        self.on_timer.push_back(gesture);
        self
    }

    /// Shared counters of frames and timer firings seen.
    pub fn counters(&self) -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
        (Rc::clone(&self.frames), Rc::clone(&self.timers))
    }
}

impl Interpreter for ScriptedInterpreter {
    fn name(&self) -> &str {
        "scripted"
    }

    fn sync_interpret(
        &mut self,
        frame: &mut HardwareFrame,
        timeout: &mut Option<Stime>,
        _out: &mut dyn GestureConsumer,
    ) {
        self.frames.set(self.frames.get() + 1);
        merge_timeout(timeout, self.frame_delay.map(|d| frame.timestamp + d));
    }

    fn handle_timer(
        &mut self,
        now: Stime,
        timeout: &mut Option<Stime>,
        out: &mut dyn GestureConsumer,
    ) {
        self.timers.set(self.timers.get() + 1);
        if let Some(mut gesture) = self.on_timer.pop_front() {
            gesture.start_time = now;
            gesture.end_time = now;
            out.consume_gesture(&gesture);
        }
        if !self.on_timer.is_empty() {
            merge_timeout(timeout, self.frame_delay.map(|d| now + d));
        }
    }
}

/// Consumer that records every gesture it receives.
#[derive(Debug, Clone, Default)]
pub struct GestureCollector {
    gestures: Rc<RefCell<Vec<Gesture>>>,
}

impl GestureCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// A boxed consumer feeding this collector, for `Pipeline::initialize`.
    pub fn consumer(&self) -> Box<dyn GestureConsumer> {
        Box::new(self.clone())
    }

    /// Gestures received so far.
    pub fn gestures(&self) -> Vec<Gesture> {
        self.gestures.borrow().clone()
    }

    /// Number of gestures received.
    pub fn len(&self) -> usize {
        self.gestures.borrow().len()
    }

    /// Whether nothing was received.
    pub fn is_empty(&self) -> bool {
        self.gestures.borrow().is_empty()
    }

    /// Forget everything received.
    pub fn clear(&self) {
        self.gestures.borrow_mut().clear();
    }
}

impl GestureConsumer for GestureCollector {
    fn consume_gesture(&mut self, gesture: &Gesture) {
        self.gestures.borrow_mut().push(*gesture);
    }
}

/// Metrics collector that counts the gestures it observes.
#[derive(Debug, Clone, Default)]
pub struct CountingMetrics {
    count: Rc<Cell<usize>>,
}

impl CountingMetrics {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A boxed collector feeding this counter.
    pub fn collector(&self) -> Box<dyn MetricsCollector> {
        Box::new(self.clone())
    }

    /// Gestures observed.
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl MetricsCollector for CountingMetrics {
    fn record(&mut self, _gesture: &Gesture) {
        self.count.set(self.count.get() + 1);
    }
}

#[cfg(all(test, feature = "fixtures"))]
mod tests {
    use super::*;
    use crate::fixtures::{one_finger, touchpad_descriptor, two_fingers};
    use gestures_events::GestureKind;

    fn init(interp: &mut dyn Interpreter) {
        let descriptor = touchpad_descriptor();
        interp.initialize(&InitContext {
            descriptor: &descriptor,
            metrics_props: None,
        });
    }

    #[test]
    fn test_motion_emits_move_for_one_finger() {
        let mut interp = MotionInterpreter::new();
        init(&mut interp);
        let mut out = GestureCollector::new();
        let mut timeout = None;
        interp.sync_interpret(&mut one_finger(0.0, 1, 100.0, 100.0), &mut timeout, &mut out);
        interp.sync_interpret(&mut one_finger(0.01, 1, 110.0, 100.0), &mut timeout, &mut out);
        let gestures = out.gestures();
        assert_eq!(gestures.len(), 1);
        assert!(gestures[0].approx_eq(&Gesture::new_move(0.0, 0.01, 10.0, 0.0), 1e-9));
    }

    #[test]
    fn test_motion_emits_scroll_for_two_fingers() {
        let mut interp = MotionInterpreter::new();
        let mut out = GestureCollector::new();
        let mut timeout = None;
        let mut a = two_fingers(0.0, (1, 0.0, 0.0), (2, 50.0, 0.0));
        let mut b = two_fingers(0.02, (1, 0.0, 4.0), (2, 50.0, 6.0));
        interp.sync_interpret(&mut a, &mut timeout, &mut out);
        interp.sync_interpret(&mut b, &mut timeout, &mut out);
        let gestures = out.gestures();
        assert_eq!(gestures.len(), 1);
        assert_eq!(gestures[0].kind(), GestureKind::Scroll);
        assert!(gestures[0].approx_eq(&Gesture::new_scroll(0.0, 0.02, 0.0, 5.0), 1e-6));
    }

    #[test]
    fn test_motion_ignores_a_resting_finger() {
        let mut interp = MotionInterpreter::new();
        let mut out = GestureCollector::new();
        let mut timeout = None;
        interp.sync_interpret(&mut one_finger(0.0, 1, 40.0, 40.0), &mut timeout, &mut out);
        interp.sync_interpret(&mut one_finger(0.01, 1, 40.0, 40.0), &mut timeout, &mut out);
        interp.sync_interpret(&mut one_finger(0.02, 1, 41.0, 40.0), &mut timeout, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_motion_skips_new_tracking_id() {
        let mut interp = MotionInterpreter::new();
        let mut out = GestureCollector::new();
        let mut timeout = None;
        interp.sync_interpret(&mut one_finger(0.0, 1, 0.0, 0.0), &mut timeout, &mut out);
        interp.sync_interpret(&mut one_finger(0.01, 2, 5.0, 0.0), &mut timeout, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_scripted_requests_and_emits() {
        let mut interp = ScriptedInterpreter::new()
            .with_frame_timeout(0.5)
            .with_timer_gesture(Gesture::new_fling(
                0.0,
                0.0,
                1.0,
                2.0,
                gestures_events::FlingState::Start,
            ));
        let (frames, timers) = interp.counters();
        let mut out = GestureCollector::new();
        let mut timeout = None;
        interp.sync_interpret(&mut HardwareFrame::new(1.0), &mut timeout, &mut out);
        assert_eq!(timeout, Some(1.5));
        timeout = None;
        interp.handle_timer(1.5, &mut timeout, &mut out);
        assert_eq!(timeout, None);
        assert_eq!((frames.get(), timers.get()), (1, 1));
        assert_eq!(out.gestures()[0].start_time, 1.5);
    }
}
