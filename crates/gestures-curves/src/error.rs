//! Error types for curve construction.

use std::fmt;

/// Error type for curve construction.
///
/// Built-in curves never fail; these errors come from custom curve tables.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    /// The curve has no segments.
    Empty,
    /// A flat table's length is not a multiple of four.
    RaggedTable {
        /// Number of values supplied.
        len: usize,
    },
    /// More segments than a custom curve may hold.
    TooManySegments {
        /// Number of segments supplied.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// Segment bounds are not strictly ascending.
    UnorderedBounds {
        /// Index of the first out-of-order segment.
        index: usize,
    },
    /// A coefficient or bound is NaN, or a non-final bound is infinite.
    NonFinite {
        /// Index of the offending segment.
        index: usize,
    },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Curve has no segments"),
            Self::RaggedTable { len } => {
                write!(f, "Curve table length {len} is not a multiple of 4")
            }
            Self::TooManySegments { count, max } => {
                write!(f, "Curve has {count} segments, at most {max} allowed")
            }
            Self::UnorderedBounds { index } => {
                write!(f, "Segment {index} bound is not above the previous bound")
            }
            Self::NonFinite { index } => {
                write!(f, "Segment {index} has a non-finite value")
            }
        }
    }
}

impl std::error::Error for CurveError {}
