//! Prelude for capturing and replaying activity logs.

pub use crate::error::{ActivityError, ActivityResult, ParseError};
pub use crate::log::{ActivityLog, LogEntry};
pub use crate::replay::{
    ActivityReplay, ReplayConfig, ReplayMismatch, ReplayReport, RestoreWarning,
};
