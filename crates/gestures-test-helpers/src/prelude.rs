//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use gestures_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};
pub use crate::{assert_approx_eq, assert_gesture_eq};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    button_pad_descriptor, finger_track, one_finger, short_swipe, touchpad_descriptor,
    two_fingers,
};

#[cfg(feature = "mock")]
pub use crate::mock::{CountingMetrics, GestureCollector, MotionInterpreter, ScriptedInterpreter};

#[cfg(feature = "tracing")]
pub use crate::logging::{init_test_tracing, init_test_tracing_at};

/// Result type for tests that use `?`.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;
