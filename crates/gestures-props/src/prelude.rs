//! Prelude for the property registry.

pub use crate::error::{PropertyError, PropertyResult};
pub use crate::metrics::MetricsProperties;
pub use crate::property::{
    BoolProperty, DoubleArrayProperty, DoubleProperty, IntProperty, Property, ShortProperty,
};
pub use crate::registry::{PropRegistry, PropertySnapshot, WeakPropRegistry};
