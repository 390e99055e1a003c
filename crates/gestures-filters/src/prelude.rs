//! Prelude for building chains from the bundled stages.

pub use crate::accel::{AccelDefaults, AccelFilter, AccelProperties, CUSTOM_SENSITIVITY};
pub use crate::error::{FilterError, FilterResult};
pub use crate::logging::{LoggingConfig, LoggingFilter};
pub use crate::timing::{DtSanitizer, SpeedSmoother};
