//! Property registry errors

use thiserror::Error;

/// Property registration and write errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// No property with this name is registered
    #[error("Unknown property: {0}")]
    Unknown(String),

    /// The name is already registered with a different type
    #[error("Property {name} already registered as {existing}, requested {requested}")]
    TypeConflict {
        /// Property name
        name: String,
        /// Registered type
        existing: &'static str,
        /// Requested type
        requested: &'static str,
    },

    /// The written value does not fit the property type
    #[error("Property {name} expects {expected}, got {found}")]
    TypeMismatch {
        /// Property name
        name: String,
        /// Expected value type
        expected: &'static str,
        /// Description of the rejected value
        found: String,
    },
}

/// Result type for property operations
pub type PropertyResult<T> = Result<T, PropertyError>;
