//! Metrics collection hook

use gestures_events::Gesture;

/// Observes every gesture leaving the pipeline, before the output consumer.
pub trait MetricsCollector {
    /// Record one outgoing gesture.
    fn record(&mut self, gesture: &Gesture);
}
