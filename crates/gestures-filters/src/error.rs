//! Stage construction and dump errors

use gestures_activity::ActivityError;
use gestures_props::PropertyError;
use thiserror::Error;

/// Error raised while building a stage or dumping its log.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A stage property could not be registered
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// The activity log could not be encoded or written
    #[error(transparent)]
    Activity(#[from] ActivityError),
}

/// Result type for stage operations
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_error_is_transparent() {
        let err = FilterError::from(PropertyError::Unknown("Smooth Accel".into()));
        assert_eq!(
            err.to_string(),
            PropertyError::Unknown("Smooth Accel".into()).to_string()
        );
    }

    #[test]
    fn test_activity_error_display() {
        let err = FilterError::from(ActivityError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such directory",
        )));
        insta::assert_snapshot!(err.to_string(), @"I/O error: no such directory");
    }
}
