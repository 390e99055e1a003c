//! Prelude for acceleration curves.

pub use crate::builtin::{CurveFamily, CurveTable};
pub use crate::error::CurveError;
pub use crate::segment::{AccelCurve, CurveSegment};
