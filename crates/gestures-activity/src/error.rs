//! Activity log error types
//!
//! Parsing aborts on the first malformed entry and reports where it was.
//! Replay divergence is never an error; see [`ReplayReport`](crate::ReplayReport).

use thiserror::Error;

/// Log decoding error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The text is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// The top-level value is not an object
    #[error("Log root is not an object")]
    RootNotObject,

    /// A required field is missing or has the wrong type
    #[error("Missing or invalid {context} field `{key}`")]
    Field {
        /// Object being decoded
        context: &'static str,
        /// Offending key
        key: &'static str,
    },

    /// An entry failed to decode
    #[error("Entry {index}: {source}")]
    Entry {
        /// Position in the entry list
        index: usize,
        /// Underlying failure
        source: Box<ParseError>,
    },

    /// A finger inside a hardware-state entry failed to decode
    #[error("Finger {index}: {source}")]
    Finger {
        /// Position in the finger list
        index: usize,
        /// Underlying failure
        source: Box<ParseError>,
    },

    /// Unrecognized entry discriminator
    #[error("Unknown entry type `{0}`")]
    UnknownEntryType(String),

    /// Unrecognized property-change value type
    #[error("Unknown property change type `{0}`")]
    UnknownPropType(String),

    /// A frame carries more touches than any sensor reports
    #[error("Hardware state has {count} fingers, at most {max} allowed")]
    SensorSanity {
        /// Fingers in the frame
        count: usize,
        /// Ceiling
        max: usize,
    },
}

/// Activity log operation error
#[derive(Debug, Error)]
pub enum ActivityError {
    /// Log text could not be decoded
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading or writing a log file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the log failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for activity log operations
pub type ActivityResult<T> = Result<T, ActivityError>;
