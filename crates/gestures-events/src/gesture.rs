//! Gestures produced by the interpreter chain
//!
//! A [`Gesture`] is a start/end timestamp pair plus a closed set of
//! variant payloads. Equality is structural per variant; the replay matcher
//! uses [`Gesture::approx_eq`] to tolerate float noise introduced by text
//! round trips.

use std::fmt;

use crate::Stime;

/// Payload-free discriminant of a [`Gesture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Placeholder for unrecognized gestures
    Null,
    /// A finger touched down
    ContactInitiated,
    /// Pointer motion
    Move,
    /// Two-finger scroll
    Scroll,
    /// Three-finger swipe
    Swipe,
    /// End of a swipe
    SwipeLift,
    /// Pinch zoom
    Pinch,
    /// Physical or tap button change
    ButtonsChange,
    /// Kinetic scroll start or stop
    Fling,
    /// Diagnostic metrics sample
    Metrics,
}

impl GestureKind {
    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            GestureKind::Null => "null",
            GestureKind::ContactInitiated => "contact-initiated",
            GestureKind::Move => "move",
            GestureKind::Scroll => "scroll",
            GestureKind::Swipe => "swipe",
            GestureKind::SwipeLift => "swipe-lift",
            GestureKind::Pinch => "pinch",
            GestureKind::ButtonsChange => "buttons-change",
            GestureKind::Fling => "fling",
            GestureKind::Metrics => "metrics",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accelerated deltas plus the unaccelerated "ordinal" deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    /// Output X delta
    pub dx: f32,
    /// Output Y delta
    pub dy: f32,
    /// X delta before acceleration
    pub ordinal_dx: f32,
    /// Y delta before acceleration
    pub ordinal_dy: f32,
}

impl Motion {
    /// Motion whose ordinal deltas equal its output deltas.
    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            dx,
            dy,
            ordinal_dx: dx,
            ordinal_dy: dy,
        }
    }
}

/// Pinch zoom delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pinch {
    /// Output zoom delta
    pub dz: f32,
    /// Zoom delta before acceleration
    pub ordinal_dz: f32,
}

/// Buttons pressed and released by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    /// Bitmask of buttons going down
    pub down: u32,
    /// Bitmask of buttons going up
    pub up: u32,
}

/// Whether a fling starts kinetic scrolling or stops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlingState {
    /// Begin kinetic scrolling
    #[default]
    Start,
    /// A finger touched down and stops any running fling
    TapDown,
}

impl FlingState {
    /// Integer code used on the wire.
    pub fn code(self) -> i64 {
        match self {
            FlingState::Start => 0,
            FlingState::TapDown => 1,
        }
    }

    /// Decode a wire code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FlingState::Start),
            1 => Some(FlingState::TapDown),
            _ => None,
        }
    }
}

/// Fling velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fling {
    /// Output X velocity
    pub vx: f32,
    /// Output Y velocity
    pub vy: f32,
    /// X velocity before acceleration
    pub ordinal_vx: f32,
    /// Y velocity before acceleration
    pub ordinal_vy: f32,
    /// Start or tap-down
    pub state: FlingState,
}

/// Sub-kind of a metrics gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsKind {
    /// Noisy ground detection sample
    NoisyGround,
    /// Any other sub-kind
    #[default]
    Unknown,
}

impl MetricsKind {
    /// Integer code used on the wire.
    pub fn code(self) -> i64 {
        match self {
            MetricsKind::NoisyGround => 0,
            MetricsKind::Unknown => 1,
        }
    }

    /// Decode a wire code; every unknown value maps to [`MetricsKind::Unknown`].
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            MetricsKind::NoisyGround
        } else {
            MetricsKind::Unknown
        }
    }
}

/// Metrics payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Sub-kind
    pub kind: MetricsKind,
    /// Two numeric samples
    pub data: [f32; 2],
}

/// Variant payload of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureDetails {
    /// Unrecognized gesture placeholder
    #[default]
    Null,
    /// A finger touched down
    ContactInitiated,
    /// Pointer motion
    Move(Motion),
    /// Scroll
    Scroll(Motion),
    /// Swipe
    Swipe(Motion),
    /// Swipe ended
    SwipeLift,
    /// Pinch zoom
    Pinch(Pinch),
    /// Button change
    ButtonsChange(Buttons),
    /// Fling
    Fling(Fling),
    /// Metrics sample
    Metrics(Metrics),
}

/// A semantic gesture with its time span.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gesture {
    /// Time the gesture started
    pub start_time: Stime,
    /// Time the gesture ended
    pub end_time: Stime,
    /// Variant payload
    pub details: GestureDetails,
}

impl Gesture {
    /// Create a gesture from its parts.
    pub fn new(start_time: Stime, end_time: Stime, details: GestureDetails) -> Self {
        Self {
            start_time,
            end_time,
            details,
        }
    }

    /// Pointer motion with ordinal deltas equal to the output deltas.
    pub fn new_move(start_time: Stime, end_time: Stime, dx: f32, dy: f32) -> Self {
        Self::new(start_time, end_time, GestureDetails::Move(Motion::new(dx, dy)))
    }

    /// Scroll with ordinal deltas equal to the output deltas.
    pub fn new_scroll(start_time: Stime, end_time: Stime, dx: f32, dy: f32) -> Self {
        Self::new(start_time, end_time, GestureDetails::Scroll(Motion::new(dx, dy)))
    }

    /// Swipe with ordinal deltas equal to the output deltas.
    pub fn new_swipe(start_time: Stime, end_time: Stime, dx: f32, dy: f32) -> Self {
        Self::new(start_time, end_time, GestureDetails::Swipe(Motion::new(dx, dy)))
    }

    /// Pinch with ordinal delta equal to the output delta.
    pub fn new_pinch(start_time: Stime, end_time: Stime, dz: f32) -> Self {
        Self::new(
            start_time,
            end_time,
            GestureDetails::Pinch(Pinch { dz, ordinal_dz: dz }),
        )
    }

    /// Button change.
    pub fn new_buttons_change(start_time: Stime, end_time: Stime, down: u32, up: u32) -> Self {
        Self::new(
            start_time,
            end_time,
            GestureDetails::ButtonsChange(Buttons { down, up }),
        )
    }

    /// Fling with ordinal velocities equal to the output velocities.
    pub fn new_fling(
        start_time: Stime,
        end_time: Stime,
        vx: f32,
        vy: f32,
        state: FlingState,
    ) -> Self {
        Self::new(
            start_time,
            end_time,
            GestureDetails::Fling(Fling {
                vx,
                vy,
                ordinal_vx: vx,
                ordinal_vy: vy,
                state,
            }),
        )
    }

    /// Metrics sample.
    pub fn new_metrics(
        start_time: Stime,
        end_time: Stime,
        kind: MetricsKind,
        data1: f32,
        data2: f32,
    ) -> Self {
        Self::new(
            start_time,
            end_time,
            GestureDetails::Metrics(Metrics {
                kind,
                data: [data1, data2],
            }),
        )
    }

    /// Payload-free discriminant.
    pub fn kind(&self) -> GestureKind {
        match self.details {
            GestureDetails::Null => GestureKind::Null,
            GestureDetails::ContactInitiated => GestureKind::ContactInitiated,
            GestureDetails::Move(_) => GestureKind::Move,
            GestureDetails::Scroll(_) => GestureKind::Scroll,
            GestureDetails::Swipe(_) => GestureKind::Swipe,
            GestureDetails::SwipeLift => GestureKind::SwipeLift,
            GestureDetails::Pinch(_) => GestureKind::Pinch,
            GestureDetails::ButtonsChange(_) => GestureKind::ButtonsChange,
            GestureDetails::Fling(_) => GestureKind::Fling,
            GestureDetails::Metrics(_) => GestureKind::Metrics,
        }
    }

    /// Structural comparison with an absolute tolerance on every float.
    pub fn approx_eq(&self, other: &Gesture, tolerance: f64) -> bool {
        let t = |a: f64, b: f64| (a - b).abs() <= tolerance;
        let f = |a: f32, b: f32| (f64::from(a) - f64::from(b)).abs() <= tolerance;
        let motion = |a: &Motion, b: &Motion| {
            f(a.dx, b.dx) && f(a.dy, b.dy) && f(a.ordinal_dx, b.ordinal_dx) && f(a.ordinal_dy, b.ordinal_dy)
        };

        if !t(self.start_time, other.start_time) || !t(self.end_time, other.end_time) {
            return false;
        }
        match (&self.details, &other.details) {
            (GestureDetails::Null, GestureDetails::Null)
            | (GestureDetails::ContactInitiated, GestureDetails::ContactInitiated)
            | (GestureDetails::SwipeLift, GestureDetails::SwipeLift) => true,
            (GestureDetails::Move(a), GestureDetails::Move(b))
            | (GestureDetails::Scroll(a), GestureDetails::Scroll(b))
            | (GestureDetails::Swipe(a), GestureDetails::Swipe(b)) => motion(a, b),
            (GestureDetails::Pinch(a), GestureDetails::Pinch(b)) => {
                f(a.dz, b.dz) && f(a.ordinal_dz, b.ordinal_dz)
            }
            (GestureDetails::ButtonsChange(a), GestureDetails::ButtonsChange(b)) => a == b,
            (GestureDetails::Fling(a), GestureDetails::Fling(b)) => {
                a.state == b.state
                    && f(a.vx, b.vx)
                    && f(a.vy, b.vy)
                    && f(a.ordinal_vx, b.ordinal_vx)
                    && f(a.ordinal_vy, b.ordinal_vy)
            }
            (GestureDetails::Metrics(a), GestureDetails::Metrics(b)) => {
                a.kind == b.kind
                    && a.data.iter().zip(b.data.iter()).all(|(x, y)| f(*x, *y))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:.6}, {:.6}]",
            self.kind(),
            self.start_time,
            self.end_time
        )?;
        match &self.details {
            GestureDetails::Null | GestureDetails::ContactInitiated | GestureDetails::SwipeLift => {
                Ok(())
            }
            GestureDetails::Move(m) | GestureDetails::Scroll(m) | GestureDetails::Swipe(m) => {
                write!(
                    f,
                    " dx={} dy={} ordinal=({}, {})",
                    m.dx, m.dy, m.ordinal_dx, m.ordinal_dy
                )
            }
            GestureDetails::Pinch(p) => write!(f, " dz={} ordinal={}", p.dz, p.ordinal_dz),
            GestureDetails::ButtonsChange(b) => write!(f, " down={} up={}", b.down, b.up),
            GestureDetails::Fling(fl) => write!(
                f,
                " vx={} vy={} ordinal=({}, {}) state={:?}",
                fl.vx, fl.vy, fl.ordinal_vx, fl.ordinal_vy, fl.state
            ),
            GestureDetails::Metrics(m) => {
                let [d1, d2] = m.data;
                write!(f, " kind={:?} data=({d1}, {d2})", m.kind)
            }
        }
    }
}
