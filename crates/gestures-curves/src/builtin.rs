//! Built-in sensitivity curve tables.
//!
//! Every family has five levels. Level 1 is the slowest; higher levels add
//! more gain above the family's knee speed. Built-in curves are continuous
//! and non-decreasing.

use crate::segment::{AccelCurve, CurveSegment};

/// Lowest built-in sensitivity level.
pub const MIN_SENSITIVITY: i32 = 1;
/// Highest built-in sensitivity level.
pub const MAX_SENSITIVITY: i32 = 5;

const LEVELS: usize = 5;

// Touchpad pointer: identity up to the knee, quadratic to the second bound,
// then linear with the matching slope.
const POINTER_KNEE: f64 = 32.0;
const POINTER_LINEAR_FROM: f64 = 150.0;
const POINTER_DIVISORS: [f64; LEVELS - 1] = [60.0, 37.5, 30.0, 25.0];

const SCROLL_KNEE: f64 = 75.0;
const SCROLL_LINEAR_FROM: f64 = 600.0;
const SCROLL_DIVISORS: [f64; LEVELS - 1] = [150.0, 75.0, 70.0, 65.0];

// Mouse pointer: linear gain up to the knee, then a gentle quadratic.
const MOUSE_KNEE: f64 = 100.0;
const MOUSE_GAINS: [f64; LEVELS] = [1.0, 1.2, 1.4, 1.6, 1.8];
const MOUSE_DIVISOR: f64 = 400.0;

/// Which built-in table a curve is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveFamily {
    /// Touchpad pointer motion
    Pointer,
    /// Pointer motion from mice and other relative devices
    Mouse,
    /// Scroll and fling
    Scroll,
}

/// Identity up to `knee`, `x + (x - knee)² / d` up to `linear_from`, then
/// the tangent line at `linear_from`.
fn knee_curve(knee: f64, linear_from: f64, d: f64) -> AccelCurve {
    let quad = CurveSegment::new(
        linear_from,
        1.0 / d,
        1.0 - 2.0 * knee / d,
        knee * knee / d,
    );
    let slope = 1.0 + 2.0 * (linear_from - knee) / d;
    let at_join = quad.evaluate(linear_from);
    let tail = CurveSegment::linear(f64::INFINITY, slope, at_join - slope * linear_from);
    AccelCurve::new(vec![CurveSegment::linear(knee, 1.0, 0.0), quad, tail])
        .unwrap_or_default()
}

/// `g * x` up to the knee, then `g * x + (x - knee)² / d`.
fn mouse_curve(gain: f64) -> AccelCurve {
    let linear = CurveSegment::linear(MOUSE_KNEE, gain, 0.0);
    let quad = CurveSegment::new(
        f64::INFINITY,
        1.0 / MOUSE_DIVISOR,
        gain - 2.0 * MOUSE_KNEE / MOUSE_DIVISOR,
        MOUSE_KNEE * MOUSE_KNEE / MOUSE_DIVISOR,
    );
    AccelCurve::new(vec![linear, quad]).unwrap_or_default()
}

fn knee_family(knee: f64, linear_from: f64, divisors: &[f64]) -> Vec<AccelCurve> {
    std::iter::once(AccelCurve::identity())
        .chain(divisors.iter().map(|&d| knee_curve(knee, linear_from, d)))
        .collect()
}

/// All built-in curves, built once per stage.
#[derive(Debug, Clone)]
pub struct CurveTable {
    pointer: Vec<AccelCurve>,
    mouse: Vec<AccelCurve>,
    scroll: Vec<AccelCurve>,
    identity: AccelCurve,
}

impl CurveTable {
    /// Build every built-in curve.
    pub fn new() -> Self {
        Self {
            pointer: knee_family(POINTER_KNEE, POINTER_LINEAR_FROM, &POINTER_DIVISORS),
            mouse: MOUSE_GAINS.iter().map(|&g| mouse_curve(g)).collect(),
            scroll: knee_family(SCROLL_KNEE, SCROLL_LINEAR_FROM, &SCROLL_DIVISORS),
            identity: AccelCurve::identity(),
        }
    }

    /// Curve for `family` at `level`, clamped to
    /// [`MIN_SENSITIVITY`]`..=`[`MAX_SENSITIVITY`].
    pub fn get(&self, family: CurveFamily, level: i32) -> &AccelCurve {
        let curves = match family {
            CurveFamily::Pointer => &self.pointer,
            CurveFamily::Mouse => &self.mouse,
            CurveFamily::Scroll => &self.scroll,
        };
        let index = usize::try_from(level.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY) - 1).unwrap_or(0);
        curves
            .get(index)
            .or_else(|| curves.first())
            .unwrap_or(&self.identity)
    }
}

impl Default for CurveTable {
    fn default() -> Self {
        Self::new()
    }
}
