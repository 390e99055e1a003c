//! Event model for the gesture pipeline
//!
//! Pure data types that cross the boundaries of the interpreter chain:
//!
//! - [`HardwareFrame`] and [`FingerTouch`]: one synchronous sensor snapshot
//! - [`HardwareDescriptor`]: immutable per-device geometry and capabilities
//! - [`Gesture`]: semantic output of the chain (move, scroll, fling, ...)
//! - [`TimerEvent`]: timer requests and firings
//! - [`PropertyChangeRecord`]: a typed property write
//!
//! None of these types carry behavior beyond construction, comparison and
//! formatting. Serialization lives in `gestures-activity`.
//!
//! # Example
//!
//! ```
//! use gestures_events::prelude::*;
//!
//! let gesture = Gesture::new_move(0.0, 0.01, 10.0, 0.0);
//! assert_eq!(gesture.kind(), GestureKind::Move);
//! assert!(gesture.approx_eq(&Gesture::new_move(0.0, 0.01, 10.0, 0.0), 1e-6));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod gesture;
pub mod hardware;
pub mod prelude;
pub mod property;
pub mod timer;

pub use gesture::{
    Buttons, Fling, FlingState, Gesture, GestureDetails, GestureKind, Metrics, MetricsKind,
    Motion, Pinch,
};
pub use hardware::{FingerTouch, HardwareDescriptor, HardwareFrame};
pub use property::{PropValue, PropertyChangeRecord};
pub use timer::TimerEvent;

/// Pipeline time in seconds.
pub type Stime = f64;
