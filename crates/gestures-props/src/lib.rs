//! Typed property registry for the gesture pipeline
//!
//! Stages register typed properties by name and read them on the hot path
//! through cheap handles; user configuration, replay restoration and
//! mid-stream property writes all go through a single [`PropRegistry`].
//!
//! # Write observers
//!
//! A write made with [`PropRegistry::set`] is:
//!
//! 1. applied to the property,
//! 2. reported to every write listener (used by the logging stage to append a
//!    property-change record to its activity log),
//! 3. reported to the observers registered for that property name.
//!
//! Listeners and observers run synchronously on the writing thread, with the
//! registry unborrowed, so they may read or write other properties.
//! A write from inside an observer does not re-notify that same observer.
//!
//! Restoration writes ([`PropRegistry::restore_json`]) are applied silently.
//!
//! # Example
//!
//! ```
//! use gestures_props::prelude::*;
//! use gestures_events::PropValue;
//!
//! # fn main() -> PropertyResult<()> {
//! let registry = PropRegistry::new();
//! let sensitivity = registry.register_int("Pointer Sensitivity", 3)?;
//!
//! registry.set("Pointer Sensitivity", PropValue::Int(5))?;
//! assert_eq!(sensitivity.get(), 5);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod metrics;
pub mod prelude;
pub mod property;
pub mod registry;

pub use error::{PropertyError, PropertyResult};
pub use metrics::MetricsProperties;
pub use property::{
    BoolProperty, DoubleArrayProperty, DoubleProperty, IntProperty, Property, ShortProperty,
};
pub use registry::{PropRegistry, PropertySnapshot, WeakPropRegistry};
