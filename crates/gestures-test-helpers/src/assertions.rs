//! Assertion macros for gesture tests.

/// Assert that two floating-point values are approximately equal.
///
/// ```rust
/// use gestures_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(1.0_f64, 1.0001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if diff > tolerance {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
}

/// Assert that two gestures are equal within a float tolerance.
///
/// ```rust
/// use gestures_events::Gesture;
/// use gestures_test_helpers::assert_gesture_eq;
///
/// assert_gesture_eq!(
///     Gesture::new_move(0.0, 0.01, 1.0, 0.0),
///     Gesture::new_move(0.0, 0.01, 1.000_000_1, 0.0),
///     1e-4,
/// );
/// ```
#[macro_export]
macro_rules! assert_gesture_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        if !left.approx_eq(&right, $tolerance) {
            panic!(
                "assertion failed: gestures differ\n  left: `{}`,\n right: `{}`",
                left, right
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use gestures_events::Gesture;

    #[test]
    fn test_approx_eq_passes() {
        assert_approx_eq!(0.1_f64 + 0.2, 0.3, 1e-9);
    }

    #[test]
    #[should_panic(expected = "gestures differ")]
    fn test_gesture_eq_fails_on_kind() {
        assert_gesture_eq!(
            Gesture::new_move(0.0, 1.0, 1.0, 0.0),
            Gesture::new_scroll(0.0, 1.0, 1.0, 0.0),
            1e-6
        );
    }
}
