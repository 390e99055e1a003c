//! Pointer and scroll acceleration
//!
//! Scales `Move`, `Scroll` and `Fling` gestures by the gain of the selected
//! acceleration curve at the gesture's speed, then by the per-axis output
//! scale. Ordinal deltas are left untouched.
//!
//! Speeds are in millimetres per second: deltas are divided by the device
//! resolution when the descriptor reports one.

use gestures_curves::{AccelCurve, CurveFamily, CurveTable};
use gestures_events::{Gesture, GestureDetails, HardwareDescriptor, Stime};
use gestures_interpreter::{Filter, GestureConsumer, InitContext};
use gestures_props::{BoolProperty, DoubleArrayProperty, DoubleProperty, IntProperty, PropRegistry};
use serde::Deserialize;
use tracing::{trace, warn};

use crate::error::FilterResult;
use crate::timing::{DtSanitizer, SpeedSmoother};

/// Largest difference between one gesture's end and the next one's start
/// for the two to count as back-to-back.
const CONTIGUITY_TOLERANCE: Stime = 1e-6;

/// Registry names of the acceleration properties.
pub mod names {
    /// Pointer sensitivity, 1..=5 or 0 for the custom curve
    pub const POINTER_SENSITIVITY: &str = "Pointer Sensitivity";
    /// Scroll sensitivity, 1..=5 or 0 for the custom curve
    pub const SCROLL_SENSITIVITY: &str = "Scroll Sensitivity";
    /// Custom pointer curve as flat `(x_max, sqr, mul, int)` tuples
    pub const POINTER_CURVE: &str = "Pointer Accel Curve";
    /// Custom scroll curve as flat `(x_max, sqr, mul, int)` tuples
    pub const SCROLL_CURVE: &str = "Scroll Accel Curve";
    /// Pointer X output scale
    pub const POINT_X_OUT_SCALE: &str = "Point X Out Scale";
    /// Pointer Y output scale
    pub const POINT_Y_OUT_SCALE: &str = "Point Y Out Scale";
    /// Scroll X output scale
    pub const SCROLL_X_OUT_SCALE: &str = "Scroll X Out Scale";
    /// Scroll Y output scale
    pub const SCROLL_Y_OUT_SCALE: &str = "Scroll Y Out Scale";
    /// Use the mouse pointer curves
    pub const MOUSE_CURVES: &str = "Mouse Accel Curves";
    /// Shortest reasonable interval between gestures
    pub const MIN_DT: &str = "Accel Min dt";
    /// Longest reasonable interval between gestures
    pub const MAX_DT: &str = "Accel Max dt";
    /// Blend speeds with the previous two samples
    pub const SMOOTH_ACCEL: &str = "Smooth Accel";
}

/// Sensitivity value that selects the custom curve.
pub const CUSTOM_SENSITIVITY: i32 = 0;

/// Magnitudes below this are passed through unscaled.
const MIN_MAGNITUDE: f64 = 1e-5;

/// Initial property values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccelDefaults {
    /// Pointer sensitivity level
    pub pointer_sensitivity: i32,
    /// Scroll sensitivity level
    pub scroll_sensitivity: i32,
    /// Custom pointer curve
    pub pointer_curve: Vec<f64>,
    /// Custom scroll curve
    pub scroll_curve: Vec<f64>,
    /// Pointer X output scale
    pub point_x_out_scale: f64,
    /// Pointer Y output scale
    pub point_y_out_scale: f64,
    /// Scroll X output scale
    pub scroll_x_out_scale: f64,
    /// Scroll Y output scale
    pub scroll_y_out_scale: f64,
    /// Use the mouse pointer curves
    pub mouse_curves: bool,
    /// Shortest reasonable interval in seconds
    pub min_reasonable_dt: f64,
    /// Longest reasonable interval in seconds
    pub max_reasonable_dt: f64,
    /// Enable speed smoothing
    pub smooth_accel: bool,
}

impl Default for AccelDefaults {
    fn default() -> Self {
        Self {
            pointer_sensitivity: 3,
            scroll_sensitivity: 3,
            pointer_curve: Vec::new(),
            scroll_curve: Vec::new(),
            point_x_out_scale: 1.0,
            point_y_out_scale: 1.0,
            scroll_x_out_scale: 1.0,
            scroll_y_out_scale: 1.0,
            mouse_curves: false,
            min_reasonable_dt: 0.003,
            max_reasonable_dt: 0.050,
            smooth_accel: false,
        }
    }
}

impl AccelDefaults {
    /// Parse defaults from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed text or unknown fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Handles to the acceleration properties.
#[derive(Debug, Clone)]
pub struct AccelProperties {
    /// Pointer sensitivity
    pub pointer_sensitivity: IntProperty,
    /// Scroll sensitivity
    pub scroll_sensitivity: IntProperty,
    /// Custom pointer curve
    pub pointer_curve: DoubleArrayProperty,
    /// Custom scroll curve
    pub scroll_curve: DoubleArrayProperty,
    /// Pointer X output scale
    pub point_x_out_scale: DoubleProperty,
    /// Pointer Y output scale
    pub point_y_out_scale: DoubleProperty,
    /// Scroll X output scale
    pub scroll_x_out_scale: DoubleProperty,
    /// Scroll Y output scale
    pub scroll_y_out_scale: DoubleProperty,
    /// Mouse curve selector
    pub mouse_curves: BoolProperty,
    /// Shortest reasonable interval
    pub min_reasonable_dt: DoubleProperty,
    /// Longest reasonable interval
    pub max_reasonable_dt: DoubleProperty,
    /// Smoothing switch
    pub smooth_accel: BoolProperty,
}

impl AccelProperties {
    /// Register every acceleration property on `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is already registered with another type.
    pub fn register(registry: &PropRegistry, defaults: &AccelDefaults) -> FilterResult<Self> {
        Ok(Self {
            pointer_sensitivity: registry
                .register_int(names::POINTER_SENSITIVITY, defaults.pointer_sensitivity)?,
            scroll_sensitivity: registry
                .register_int(names::SCROLL_SENSITIVITY, defaults.scroll_sensitivity)?,
            pointer_curve: registry
                .register_double_array(names::POINTER_CURVE, &defaults.pointer_curve)?,
            scroll_curve: registry
                .register_double_array(names::SCROLL_CURVE, &defaults.scroll_curve)?,
            point_x_out_scale: registry
                .register_double(names::POINT_X_OUT_SCALE, defaults.point_x_out_scale)?,
            point_y_out_scale: registry
                .register_double(names::POINT_Y_OUT_SCALE, defaults.point_y_out_scale)?,
            scroll_x_out_scale: registry
                .register_double(names::SCROLL_X_OUT_SCALE, defaults.scroll_x_out_scale)?,
            scroll_y_out_scale: registry
                .register_double(names::SCROLL_Y_OUT_SCALE, defaults.scroll_y_out_scale)?,
            mouse_curves: registry.register_bool(names::MOUSE_CURVES, defaults.mouse_curves)?,
            min_reasonable_dt: registry
                .register_double(names::MIN_DT, defaults.min_reasonable_dt)?,
            max_reasonable_dt: registry
                .register_double(names::MAX_DT, defaults.max_reasonable_dt)?,
            smooth_accel: registry.register_bool(names::SMOOTH_ACCEL, defaults.smooth_accel)?,
        })
    }
}

/// A custom curve parsed from a double-array property, re-parsed only when
/// the property changes.
#[derive(Debug, Clone, Default)]
struct CustomCurve {
    source: Vec<f64>,
    curve: AccelCurve,
}

impl CustomCurve {
    fn resolve(&mut self, property: &DoubleArrayProperty) -> &AccelCurve {
        let values = property.get();
        if values != self.source {
            self.curve = AccelCurve::from_flat(&values).unwrap_or_else(|error| {
                warn!(property = property.name(), %error, "invalid custom curve, using identity");
                AccelCurve::identity()
            });
            self.source = values;
        }
        &self.curve
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Pointer,
    Scroll,
}

/// Acceleration stage.
#[derive(Debug)]
pub struct AccelFilter {
    props: AccelProperties,
    curves: CurveTable,
    custom_pointer: CustomCurve,
    custom_scroll: CustomCurve,
    dt: DtSanitizer,
    smoother: SpeedSmoother,
    last_end_time: Option<Stime>,
    res_x: f64,
    res_y: f64,
}

impl AccelFilter {
    /// Create the stage with default property values.
    ///
    /// # Errors
    ///
    /// Returns an error if a property name is already registered with
    /// another type.
    pub fn new(registry: &PropRegistry) -> FilterResult<Self> {
        Self::with_defaults(registry, &AccelDefaults::default())
    }

    /// Create the stage with explicit initial property values.
    ///
    /// # Errors
    ///
    /// Returns an error if a property name is already registered with
    /// another type.
    pub fn with_defaults(registry: &PropRegistry, defaults: &AccelDefaults) -> FilterResult<Self> {
        Ok(Self::from_properties(AccelProperties::register(registry, defaults)?))
    }

    /// Create the stage from already registered handles.
    pub fn from_properties(props: AccelProperties) -> Self {
        Self {
            props,
            curves: CurveTable::new(),
            custom_pointer: CustomCurve::default(),
            custom_scroll: CustomCurve::default(),
            dt: DtSanitizer::default(),
            smoother: SpeedSmoother::new(),
            last_end_time: None,
            res_x: 0.0,
            res_y: 0.0,
        }
    }

    /// Property handles.
    pub fn properties(&self) -> &AccelProperties {
        &self.props
    }

    /// Apply the device geometry used to convert deltas to millimetres.
    pub fn set_descriptor(&mut self, descriptor: &HardwareDescriptor) {
        self.res_x = f64::from(descriptor.res_x);
        self.res_y = f64::from(descriptor.res_y);
        self.dt.reset();
        self.smoother.reset();
        self.last_end_time = None;
    }

    /// Accelerate one gesture. Gestures other than moves, scrolls and
    /// flings are returned unchanged.
    pub fn accelerate(&mut self, gesture: &Gesture) -> Gesture {
        let mut out = *gesture;
        match &mut out.details {
            GestureDetails::Move(motion) => {
                if let Some((sx, sy)) = self.motion_scale(Axis::Pointer, gesture, motion.dx, motion.dy) {
                    motion.dx = scale(motion.dx, sx);
                    motion.dy = scale(motion.dy, sy);
                }
            }
            GestureDetails::Scroll(motion) => {
                if let Some((sx, sy)) = self.motion_scale(Axis::Scroll, gesture, motion.dx, motion.dy) {
                    motion.dx = scale(motion.dx, sx);
                    motion.dy = scale(motion.dy, sy);
                }
            }
            GestureDetails::Fling(fling) => {
                let speed = self.magnitude_mm(fling.vx, fling.vy);
                if speed >= MIN_MAGNITUDE {
                    let ratio = self.curve(Axis::Scroll).ratio(speed);
                    fling.vx = scale(fling.vx, ratio * self.props.scroll_x_out_scale.get());
                    fling.vy = scale(fling.vy, ratio * self.props.scroll_y_out_scale.get());
                }
            }
            _ => {}
        }
        trace!(input = %gesture, output = %out, "accelerated");
        out
    }

    /// Per-axis scale for a move or scroll, or `None` for zero motion.
    ///
    /// Only back-to-back gestures are blended: a gesture that does not start
    /// where the previous one ended drops the smoothing history.
    fn motion_scale(
        &mut self,
        axis: Axis,
        gesture: &Gesture,
        dx: f32,
        dy: f32,
    ) -> Option<(f64, f64)> {
        let contiguous = self
            .last_end_time
            .is_none_or(|last| (gesture.start_time - last).abs() <= CONTIGUITY_TOLERANCE);
        if !contiguous {
            trace!(start = gesture.start_time, "gap before gesture, smoothing history dropped");
            self.smoother.reset();
        }
        self.last_end_time = Some(gesture.end_time);
        let dt = gesture.end_time - gesture.start_time;
        let magnitude = self.magnitude_mm(dx, dy);
        if magnitude < MIN_MAGNITUDE {
            return None;
        }
        let dt = self.dt.sanitize(
            dt,
            self.props.min_reasonable_dt.get(),
            self.props.max_reasonable_dt.get(),
        );
        let speed = if self.props.smooth_accel.get() {
            self.smoother.smooth(magnitude, dt)
        } else {
            self.smoother.push(magnitude, dt);
            if dt > 0.0 { magnitude / dt } else { 0.0 }
        };
        let ratio = self.curve(axis).ratio(speed);
        let (out_x, out_y) = match axis {
            Axis::Pointer => (&self.props.point_x_out_scale, &self.props.point_y_out_scale),
            Axis::Scroll => (&self.props.scroll_x_out_scale, &self.props.scroll_y_out_scale),
        };
        Some((ratio * out_x.get(), ratio * out_y.get()))
    }

    fn curve(&mut self, axis: Axis) -> &AccelCurve {
        match axis {
            Axis::Pointer => match self.props.pointer_sensitivity.get() {
                CUSTOM_SENSITIVITY => {
                    self.custom_pointer.resolve(&self.props.pointer_curve)
                }
                level => {
                    let family = if self.props.mouse_curves.get() {
                        CurveFamily::Mouse
                    } else {
                        CurveFamily::Pointer
                    };
                    self.curves.get(family, level)
                }
            },
            Axis::Scroll => match self.props.scroll_sensitivity.get() {
                CUSTOM_SENSITIVITY => self.custom_scroll.resolve(&self.props.scroll_curve),
                level => self.curves.get(CurveFamily::Scroll, level),
            },
        }
    }

    fn magnitude_mm(&self, x: f32, y: f32) -> f64 {
        let to_mm = |v: f32, res: f64| {
            let v = f64::from(v);
            if res > 0.0 { v / res } else { v }
        };
        to_mm(x, self.res_x).hypot(to_mm(y, self.res_y))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scale(value: f32, factor: f64) -> f32 {
    (f64::from(value) * factor) as f32
}

impl Filter for AccelFilter {
    fn name(&self) -> &str {
        "accel"
    }

    fn initialize(&mut self, ctx: &InitContext<'_>) {
        self.set_descriptor(ctx.descriptor);
    }

    fn consume_gesture(&mut self, gesture: &Gesture, out: &mut dyn GestureConsumer) {
        let accelerated = self.accelerate(gesture);
        out.consume_gesture(&accelerated);
    }
}
