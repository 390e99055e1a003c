//! Fuzzes replay of decoded logs through an accelerated pipeline.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_replay_activity_log
#![no_main]
use gestures_activity::ActivityReplay;
use gestures_events::{Gesture, HardwareFrame, Stime};
use gestures_filters::AccelFilter;
use gestures_interpreter::{ChainBuilder, GestureConsumer, Interpreter};
use gestures_props::PropRegistry;
use libfuzzer_sys::fuzz_target;

/// Turns relative motion into moves so the accel stage sees traffic.
struct Relative {
    last: Option<Stime>,
}

impl Interpreter for Relative {
    fn sync_interpret(
        &mut self,
        frame: &mut HardwareFrame,
        _timeout: &mut Option<Stime>,
        out: &mut dyn GestureConsumer,
    ) {
        let start = self.last.unwrap_or(frame.timestamp);
        out.consume_gesture(&Gesture::new_move(start, frame.timestamp, frame.rel_x, frame.rel_y));
        self.last = Some(frame.timestamp);
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let replay = ActivityReplay::default();
    let Ok(log) = replay.parse(text) else {
        return;
    };
    let registry = PropRegistry::new();
    let Ok(accel) = AccelFilter::new(&registry) else {
        return;
    };
    let mut pipeline = ChainBuilder::new(Relative { last: None }).wrap(accel).build();
    // Restored properties and prop-change entries may hold any value.
    let _ = replay.replay(&log, &mut pipeline, Some(&registry));
});
