//! Piecewise quadratic curve evaluation.

use crate::error::CurveError;

/// Maximum number of segments in a custom curve.
pub const MAX_CUSTOM_SEGMENTS: usize = 20;

/// Speeds below this are clamped before the gain is computed.
pub const MIN_SPEED: f64 = 1e-4;

/// One bounded quadratic piece of a curve.
///
/// Applies to inputs `x < x_max` not covered by an earlier segment, and maps
/// them to `sqr * x² + mul * x + int`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    /// Exclusive upper bound of the input range
    pub x_max: f64,
    /// Quadratic coefficient
    pub sqr: f64,
    /// Linear coefficient
    pub mul: f64,
    /// Intercept
    pub int: f64,
}

impl CurveSegment {
    /// Create a segment.
    pub const fn new(x_max: f64, sqr: f64, mul: f64, int: f64) -> Self {
        Self {
            x_max,
            sqr,
            mul,
            int,
        }
    }

    /// Create a linear segment `mul * x + int`.
    pub const fn linear(x_max: f64, mul: f64, int: f64) -> Self {
        Self::new(x_max, 0.0, mul, int)
    }

    /// Evaluate the segment polynomial, ignoring the bound.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        (self.sqr * x + self.mul) * x + self.int
    }
}

/// An ordered list of segments covering `[0, +inf)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccelCurve {
    segments: Vec<CurveSegment>,
}

impl AccelCurve {
    /// Build a curve from segments, forcing the last bound to `+inf`.
    ///
    /// # Errors
    ///
    /// Fails if the list is empty, a value is NaN, an inner bound is
    /// infinite, or bounds are not strictly ascending.
    pub fn new(mut segments: Vec<CurveSegment>) -> Result<Self, CurveError> {
        let Some(last) = segments.last_mut() else {
            return Err(CurveError::Empty);
        };
        last.x_max = f64::INFINITY;

        let count = segments.len();
        let mut previous = f64::NEG_INFINITY;
        for (index, seg) in segments.iter().enumerate() {
            let coefficients_finite =
                seg.sqr.is_finite() && seg.mul.is_finite() && seg.int.is_finite();
            let bound_ok = seg.x_max.is_finite() || index + 1 == count;
            if !coefficients_finite || !bound_ok {
                return Err(CurveError::NonFinite { index });
            }
            if seg.x_max <= previous {
                return Err(CurveError::UnorderedBounds { index });
            }
            previous = seg.x_max;
        }
        Ok(Self { segments })
    }

    /// The identity curve `f(x) = x`.
    pub fn identity() -> Self {
        Self {
            segments: vec![CurveSegment::linear(f64::INFINITY, 1.0, 0.0)],
        }
    }

    /// Decode a custom curve from a flat `(bound, sqr, mul, int)` list.
    ///
    /// # Errors
    ///
    /// Fails on a ragged or empty list, more than [`MAX_CUSTOM_SEGMENTS`]
    /// segments, or any condition rejected by [`AccelCurve::new`].
    pub fn from_flat(values: &[f64]) -> Result<Self, CurveError> {
        if values.is_empty() {
            return Err(CurveError::Empty);
        }
        if values.len() % 4 != 0 {
            return Err(CurveError::RaggedTable { len: values.len() });
        }
        let count = values.len() / 4;
        if count > MAX_CUSTOM_SEGMENTS {
            return Err(CurveError::TooManySegments {
                count,
                max: MAX_CUSTOM_SEGMENTS,
            });
        }
        let segments = values
            .chunks_exact(4)
            .map(|chunk| match chunk {
                &[x_max, sqr, mul, int] => CurveSegment::new(x_max, sqr, mul, int),
                _ => CurveSegment::linear(f64::INFINITY, 1.0, 0.0),
            })
            .collect();
        Self::new(segments)
    }

    /// Segments in ascending bound order.
    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    /// The segment covering `x`. Inputs beyond every bound (NaN or `+inf`)
    /// use the last segment.
    pub fn segment_for(&self, x: f64) -> Option<&CurveSegment> {
        self.segments
            .iter()
            .find(|seg| x < seg.x_max)
            .or_else(|| self.segments.last())
    }

    /// Map an input speed to an output speed.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.segment_for(x).map_or(x, |seg| seg.evaluate(x))
    }

    /// Gain `f(v) / v` to apply to a motion whose speed is `speed`.
    ///
    /// Zero and non-finite speeds have gain 1; speeds below [`MIN_SPEED`]
    /// are clamped first.
    pub fn ratio(&self, speed: f64) -> f64 {
        if !speed.is_finite() || speed <= 0.0 {
            return 1.0;
        }
        let speed = speed.max(MIN_SPEED);
        let ratio = self.evaluate(speed) / speed;
        if ratio.is_finite() { ratio } else { 1.0 }
    }
}

impl Default for AccelCurve {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_evaluate() {
        let seg = CurveSegment::new(10.0, 2.0, 3.0, 1.0);
        assert_relative_eq!(seg.evaluate(2.0), 15.0);
    }

    #[test]
    fn test_identity() {
        let curve = AccelCurve::identity();
        assert_relative_eq!(curve.evaluate(123.5), 123.5);
        assert_relative_eq!(curve.ratio(123.5), 1.0);
    }

    #[test]
    fn test_first_segment_above_input_is_used() {
        let curve = AccelCurve::new(vec![
            CurveSegment::linear(10.0, 1.0, 0.0),
            CurveSegment::linear(20.0, 2.0, -10.0),
            CurveSegment::linear(0.0, 3.0, -30.0),
        ])
        .unwrap();
        assert_relative_eq!(curve.evaluate(5.0), 5.0);
        // Bounds are exclusive.
        assert_relative_eq!(curve.evaluate(10.0), 10.0);
        assert_relative_eq!(curve.evaluate(15.0), 20.0);
        assert_relative_eq!(curve.evaluate(25.0), 45.0);
    }

    #[test]
    fn test_last_bound_forced_infinite() {
        let curve = AccelCurve::from_flat(&[5.0, 0.0, 2.0, 0.0]).unwrap();
        assert!(curve.segments().iter().all(|s| s.x_max.is_infinite()));
        assert_relative_eq!(curve.evaluate(1000.0), 2000.0);
    }

    #[test]
    fn test_from_flat_rejects_ragged() {
        assert_eq!(
            AccelCurve::from_flat(&[1.0, 2.0, 3.0]),
            Err(CurveError::RaggedTable { len: 3 })
        );
    }

    #[test]
    fn test_from_flat_rejects_empty() {
        assert_eq!(AccelCurve::from_flat(&[]), Err(CurveError::Empty));
    }

    #[test]
    fn test_from_flat_rejects_too_many() {
        let mut values = Vec::new();
        for i in 0..21 {
            values.extend_from_slice(&[f64::from(i + 1), 0.0, 1.0, 0.0]);
        }
        assert!(matches!(
            AccelCurve::from_flat(&values),
            Err(CurveError::TooManySegments { count: 21, .. })
        ));
    }

    #[test]
    fn test_from_flat_rejects_unordered() {
        let values = [10.0, 0.0, 1.0, 0.0, 5.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        assert_eq!(
            AccelCurve::from_flat(&values),
            Err(CurveError::UnorderedBounds { index: 1 })
        );
    }

    #[test]
    fn test_from_flat_rejects_nan() {
        let values = [10.0, f64::NAN, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        assert_eq!(
            AccelCurve::from_flat(&values),
            Err(CurveError::NonFinite { index: 0 })
        );
    }

    #[test]
    fn test_ratio_zero_speed_is_identity() {
        let curve = AccelCurve::from_flat(&[f64::INFINITY, 0.0, 0.0, 5.0]).unwrap();
        assert_relative_eq!(curve.ratio(0.0), 1.0);
        assert_relative_eq!(curve.ratio(f64::NAN), 1.0);
    }

    #[test]
    fn test_ratio_clamps_tiny_speed() {
        let curve = AccelCurve::from_flat(&[f64::INFINITY, 0.0, 1.0, 1.0]).unwrap();
        let expected = (MIN_SPEED + 1.0) / MIN_SPEED;
        assert_relative_eq!(curve.ratio(1e-12), expected);
    }
}
