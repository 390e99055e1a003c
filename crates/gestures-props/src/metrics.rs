//! Properties shared by stages that emit metrics gestures

use crate::error::PropertyResult;
use crate::property::DoubleProperty;
use crate::registry::PropRegistry;

/// Noisy-ground detection distance in millimetres
pub const NOISY_GROUND_DISTANCE: &str = "Metrics Noisy Ground Distance";
/// Noisy-ground detection window in seconds
pub const NOISY_GROUND_TIME: &str = "Metrics Noisy Ground Time";

/// Metrics tuning properties handed to every stage at initialization.
#[derive(Debug, Clone)]
pub struct MetricsProperties {
    /// Distance a contact must jitter within the window to count as noisy ground
    pub noisy_ground_distance_threshold: DoubleProperty,
    /// Window used for noisy-ground detection
    pub noisy_ground_time_threshold: DoubleProperty,
}

impl MetricsProperties {
    /// Register the metrics properties on `registry` with their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is already registered with another type.
    pub fn new(registry: &PropRegistry) -> PropertyResult<Self> {
        Ok(Self {
            noisy_ground_distance_threshold: registry.register_double(NOISY_GROUND_DISTANCE, 10.0)?,
            noisy_ground_time_threshold: registry.register_double(NOISY_GROUND_TIME, 0.1)?,
        })
    }
}
