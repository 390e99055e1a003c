//! Acceleration Curves for the Gesture Pipeline
//!
//! An acceleration curve maps an input speed in millimetres per second to
//! an output speed. Curves are piecewise quadratic: a short list of
//! [`CurveSegment`]s ordered by ascending upper bound, where the last bound
//! is always `+inf`.
//!
//! # Overview
//!
//! - **Built-in tables**: five sensitivity levels each for touchpad pointer
//!   motion, mouse pointer motion and scrolling ([`CurveTable`])
//! - **Custom curves**: user-supplied flat lists of
//!   `(bound, sqr, mul, int)` tuples ([`AccelCurve::from_flat`])
//!
//! Stages usually care about the gain rather than the mapped speed, so
//! [`AccelCurve::ratio`] returns `f(v) / v` with the zero and tiny-speed
//! cases handled.
//!
//! # Example
//!
//! ```
//! use gestures_curves::{AccelCurve, CurveFamily, CurveTable};
//!
//! let table = CurveTable::new();
//! let curve = table.get(CurveFamily::Pointer, 3);
//!
//! // Slow motion is passed through unchanged.
//! assert!((curve.ratio(20.0) - 1.0).abs() < 1e-12);
//! // Fast motion is amplified.
//! assert!(curve.ratio(200.0) > 1.0);
//!
//! let custom = AccelCurve::from_flat(&[f64::INFINITY, 0.0, 2.0, 0.0])?;
//! assert!((custom.evaluate(10.0) - 20.0).abs() < 1e-12);
//! # Ok::<(), gestures_curves::CurveError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod builtin;
pub mod error;
pub mod prelude;
pub mod segment;

pub use builtin::{CurveFamily, CurveTable, MAX_SENSITIVITY, MIN_SENSITIVITY};
pub use error::CurveError;
pub use segment::{AccelCurve, CurveSegment, MAX_CUSTOM_SEGMENTS, MIN_SPEED};
