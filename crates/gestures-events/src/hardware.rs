//! Hardware frames and device descriptors
//!
//! A [`HardwareFrame`] is what the sensor layer hands to the outermost stage
//! of the chain. Finger order is the sensor scan order and is preserved
//! verbatim: downstream stages key state off positional index as well as
//! tracking id.

use crate::Stime;

/// One contact reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FingerTouch {
    /// Major axis of the touch ellipse
    pub touch_major: f32,
    /// Minor axis of the touch ellipse
    pub touch_minor: f32,
    /// Major axis of the approaching tool
    pub width_major: f32,
    /// Minor axis of the approaching tool
    pub width_minor: f32,
    /// Pressure in device units
    pub pressure: f32,
    /// Orientation of the ellipse
    pub orientation: f32,
    /// X position in device units
    pub position_x: f32,
    /// Y position in device units
    pub position_y: f32,
    /// Stable identifier for the lifetime of the contact
    pub tracking_id: i32,
    /// Per-finger flag bitmask
    pub flags: u32,
}

impl FingerTouch {
    /// Create a contact at `(x, y)` with the given tracking id.
    pub fn at(tracking_id: i32, position_x: f32, position_y: f32) -> Self {
        Self {
            position_x,
            position_y,
            tracking_id,
            ..Self::default()
        }
    }

    /// Set the pressure.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = pressure;
        self
    }

    /// Set the flag bitmask.
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }
}

/// One synchronous snapshot of every active touch plus button and wheel state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HardwareFrame {
    /// Capture time in seconds
    pub timestamp: Stime,
    /// Physical button bitmask
    pub buttons_down: u32,
    /// Number of touches the sensor reports, which may exceed `fingers.len()`
    /// on T5R2 hardware
    pub touch_count: u16,
    /// Contacts in sensor scan order
    pub fingers: Vec<FingerTouch>,
    /// Relative pointer X motion (mice, pointing sticks)
    pub rel_x: f32,
    /// Relative pointer Y motion
    pub rel_y: f32,
    /// Vertical wheel delta
    pub rel_wheel: f32,
    /// Horizontal wheel delta
    pub rel_hwheel: f32,
}

impl HardwareFrame {
    /// Maximum number of simultaneous touches a frame may carry.
    pub const MAX_FINGERS: usize = 30;

    /// Create an empty frame at `timestamp`.
    pub fn new(timestamp: Stime) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Create a frame holding `fingers`, with `touch_count` matching.
    pub fn with_fingers(timestamp: Stime, fingers: Vec<FingerTouch>) -> Self {
        let touch_count = u16::try_from(fingers.len()).unwrap_or(u16::MAX);
        Self {
            timestamp,
            touch_count,
            fingers,
            ..Self::default()
        }
    }

    /// Set the button bitmask.
    #[must_use]
    pub fn with_buttons(mut self, buttons_down: u32) -> Self {
        self.buttons_down = buttons_down;
        self
    }

    /// Set relative motion deltas.
    #[must_use]
    pub fn with_relative(mut self, rel_x: f32, rel_y: f32, rel_wheel: f32, rel_hwheel: f32) -> Self {
        self.rel_x = rel_x;
        self.rel_y = rel_y;
        self.rel_wheel = rel_wheel;
        self.rel_hwheel = rel_hwheel;
        self
    }

    /// Find a contact by tracking id.
    pub fn finger_by_tracking_id(&self, tracking_id: i32) -> Option<&FingerTouch> {
        self.fingers.iter().find(|f| f.tracking_id == tracking_id)
    }

    /// Whether the frame respects the finger ceiling.
    pub fn is_within_finger_limit(&self) -> bool {
        self.fingers.len() <= Self::MAX_FINGERS
    }

    /// Drop contacts past [`MAX_FINGERS`](Self::MAX_FINGERS), keeping scan
    /// order. Returns how many were dropped. `touch_count` is left alone.
    pub fn truncate_to_finger_limit(&mut self) -> usize {
        let dropped = self.fingers.len().saturating_sub(Self::MAX_FINGERS);
        self.fingers.truncate(Self::MAX_FINGERS);
        dropped
    }
}

/// Immutable per-device geometry and capability snapshot.
///
/// Set once at pipeline initialization and never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardwareDescriptor {
    /// Left edge of the sensor in device units
    pub left: f32,
    /// Top edge of the sensor
    pub top: f32,
    /// Right edge of the sensor
    pub right: f32,
    /// Bottom edge of the sensor
    pub bottom: f32,
    /// Device units per millimetre along X
    pub res_x: f32,
    /// Device units per millimetre along Y
    pub res_y: f32,
    /// Screen DPI along X
    pub screen_x_dpi: f32,
    /// Screen DPI along Y
    pub screen_y_dpi: f32,
    /// Minimum reported orientation, absent in older logs
    pub orientation_minimum: Option<f32>,
    /// Maximum reported orientation, absent in older logs
    pub orientation_maximum: Option<f32>,
    /// Maximum number of tracked fingers
    pub max_finger_count: u16,
    /// Maximum number of touches the sensor can count
    pub max_touch_count: u16,
    /// Sensor reports more touches than it tracks
    pub supports_t5r2: bool,
    /// Sensor reports a bounding box instead of real contacts
    pub support_semi_mt: bool,
    /// The whole surface is a physical button
    pub is_button_pad: bool,
}

impl HardwareDescriptor {
    /// Width of the sensor in device units.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the sensor in device units.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}
