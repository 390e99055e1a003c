//! Pipeline Stages for Touch Gesture Interpretation
//!
//! Concrete [`Filter`](gestures_interpreter::Filter) implementations:
//!
//! - **Acceleration**: scales pointer, scroll and fling magnitude by a
//!   sensitivity curve, with interval sanitization and optional smoothing
//! - **Logging**: records everything crossing the stage into an activity
//!   log and dumps or clears it on property writes
//!
//! Stages read their tuning from a [`PropRegistry`](gestures_props::PropRegistry)
//! on every gesture, so property writes take effect immediately.
//!
//! # Example
//!
//! ```
//! use gestures_events::Gesture;
//! use gestures_filters::prelude::*;
//! use gestures_props::PropRegistry;
//!
//! # fn main() -> FilterResult<()> {
//! let registry = PropRegistry::new();
//! let mut accel = AccelFilter::new(&registry)?;
//!
//! let still = Gesture::new_move(0.0, 0.01, 0.0, 0.0);
//! assert_eq!(accel.accelerate(&still), still);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod accel;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod timing;

pub use accel::{AccelDefaults, AccelFilter, AccelProperties, CUSTOM_SENSITIVITY};
pub use error::{FilterError, FilterResult};
pub use logging::{LoggingConfig, LoggingFilter};
pub use timing::{DtSanitizer, SpeedSmoother};
