//! Activity recording and replay for the gesture pipeline
//!
//! This crate captures what crosses a pipeline and plays it back:
//!
//! - **Activity Log**: an append-only record of frames, timer events,
//!   gestures and property writes, plus the device descriptor and a property
//!   snapshot
//! - **Codec**: the JSON log format, tolerant of older captures
//! - **Replay**: deterministic re-drive of a live pipeline with gesture and
//!   timeout verification
//!
//! # Architecture
//!
//! - [`log`]: in-memory [`ActivityLog`]
//! - [`codec`]: JSON encode/decode
//! - [`format`]: wire keys and discriminators
//! - [`replay`]: [`ActivityReplay`] and [`ReplayReport`]
//! - [`error`]: error types
//!
//! # Example
//!
//! ```
//! use gestures_activity::prelude::*;
//! use gestures_events::{Gesture, HardwareDescriptor, HardwareFrame};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut log = ActivityLog::new(HardwareDescriptor::default());
//! log.log_hardware_frame(&HardwareFrame::new(0.0));
//! log.log_gesture(&Gesture::new_move(0.0, 0.01, 1.0, 0.0));
//!
//! let text = log.encode()?;
//! let decoded = ActivityReplay::default().parse(&text)?;
//! assert_eq!(decoded.entries(), log.entries());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod codec;
pub mod error;
pub mod format;
pub mod log;
pub mod prelude;
pub mod replay;

pub use error::{ActivityError, ActivityResult, ParseError};
pub use log::{ActivityLog, LogEntry};
pub use replay::{
    ActivityReplay, RESTORE_DENY_LIST, ReplayConfig, ReplayMismatch, ReplayReport, RestoreWarning,
};
