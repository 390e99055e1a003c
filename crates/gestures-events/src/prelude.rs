//! Prelude for the event model.
//!
//! ```
//! use gestures_events::prelude::*;
//!
//! let frame = HardwareFrame::new(0.0);
//! assert!(frame.fingers.is_empty());
//! ```

pub use crate::Stime;
pub use crate::gesture::{
    Buttons, Fling, FlingState, Gesture, GestureDetails, GestureKind, Metrics, MetricsKind,
    Motion, Pinch,
};
pub use crate::hardware::{FingerTouch, HardwareDescriptor, HardwareFrame};
pub use crate::property::{PropValue, PropertyChangeRecord};
pub use crate::timer::TimerEvent;
