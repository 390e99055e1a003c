//! Time-delta sanitization and speed smoothing
//!
//! Wireless hardware sometimes resends packets, which shows up as one very
//! long interval followed by a very short one. A short interval makes the
//! motion look very fast and gets over-accelerated, so intervals outside a
//! reasonable band are replaced by the last interval that was inside it.

use gestures_events::Stime;

/// Interval assumed before the first reasonable one is seen.
pub const INITIAL_REASONABLE_DT: Stime = 0.05;

/// Replaces out-of-band intervals with the last in-band one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DtSanitizer {
    last_reasonable: Stime,
}

impl Default for DtSanitizer {
    fn default() -> Self {
        Self::new(INITIAL_REASONABLE_DT)
    }
}

impl DtSanitizer {
    /// Create a sanitizer that falls back to `initial` until it accepts an
    /// interval.
    pub fn new(initial: Stime) -> Self {
        Self {
            last_reasonable: initial,
        }
    }

    /// Last accepted interval.
    pub fn last_reasonable(&self) -> Stime {
        self.last_reasonable
    }

    /// Return `dt` if it lies in `[min, max]`, otherwise the last accepted
    /// interval.
    pub fn sanitize(&mut self, dt: Stime, min: Stime, max: Stime) -> Stime {
        if dt.is_finite() && dt >= min && dt <= max {
            self.last_reasonable = dt;
            dt
        } else {
            self.last_reasonable
        }
    }

    /// Forget accepted intervals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Blend weights for the current sample and the two before it.
const SMOOTHING_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Damps single-sample jitter by blending each sample with the previous two.
///
/// Magnitudes and intervals are blended separately and divided, so a long
/// slow sample cannot be outweighed by a short fast one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedSmoother {
    // (magnitude, dt), newest first
    history: [Option<(f64, Stime)>; 2],
}

impl SpeedSmoother {
    /// Create a smoother with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample and return its smoothed speed.
    pub fn smooth(&mut self, magnitude: f64, dt: Stime) -> f64 {
        let samples = [Some((magnitude, dt)), self.history[0], self.history[1]];
        let (mut mag, mut time) = (0.0, 0.0);
        for (weight, (m, t)) in SMOOTHING_WEIGHTS
            .iter()
            .zip(samples.iter())
            .filter_map(|(w, s)| s.map(|s| (w, s)))
        {
            mag += weight * m;
            time += weight * t;
        }
        self.push(magnitude, dt);
        if time > 0.0 { mag / time } else { 0.0 }
    }

    /// Record a sample without smoothing it.
    pub fn push(&mut self, magnitude: f64, dt: Stime) {
        self.history = [Some((magnitude, dt)), self.history[0]];
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.history.iter().flatten().count()
    }

    /// Whether no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the history.
    pub fn reset(&mut self) {
        self.history = [None, None];
    }
}
