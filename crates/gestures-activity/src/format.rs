//! Log format vocabulary
//!
//! Keys and discriminator values of the JSON log format. Logs written by
//! older capture tools use the same keys; new keys must stay optional on
//! decode.

/// User-configurable property snapshot
pub const KEY_PROPERTIES: &str = "properties";
/// Hardware descriptor object
pub const KEY_HARDWARE_PROPERTIES: &str = "hardware-properties";
/// Entry list
pub const KEY_ENTRIES: &str = "entries";
/// Layered capture of the wrapped pipeline
pub const KEY_NEXT_LAYER: &str = "next-layer";
/// Entry discriminator
pub const KEY_TYPE: &str = "type";

/// Descriptor keys
pub mod descriptor {
    /// Left edge
    pub const LEFT: &str = "left";
    /// Top edge
    pub const TOP: &str = "top";
    /// Right edge
    pub const RIGHT: &str = "right";
    /// Bottom edge
    pub const BOTTOM: &str = "bottom";
    /// X resolution
    pub const X_RESOLUTION: &str = "x-resolution";
    /// Y resolution
    pub const Y_RESOLUTION: &str = "y-resolution";
    /// Screen X DPI
    pub const X_DPI: &str = "x-dpi";
    /// Screen Y DPI
    pub const Y_DPI: &str = "y-dpi";
    /// Minimum orientation (optional)
    pub const ORIENTATION_MINIMUM: &str = "orientation-minimum";
    /// Maximum orientation (optional)
    pub const ORIENTATION_MAXIMUM: &str = "orientation-maximum";
    /// Maximum tracked fingers
    pub const MAX_FINGER_COUNT: &str = "max-finger-count";
    /// Maximum counted touches
    pub const MAX_TOUCH_COUNT: &str = "max-touch-count";
    /// T5R2 capability
    pub const SUPPORTS_T5R2: &str = "supports-t5r2";
    /// Semi-multitouch capability
    pub const SEMI_MT: &str = "semi-mt";
    /// Button pad capability
    pub const IS_BUTTON_PAD: &str = "is-button-pad";
}

/// Entry discriminator values
pub mod entry {
    /// Hardware frame
    pub const HARDWARE_STATE: &str = "hardware-state";
    /// Timer firing
    pub const TIMER_CALLBACK: &str = "timer-callback";
    /// Timer request
    pub const CALLBACK_REQUEST: &str = "callback-request";
    /// Produced gesture
    pub const GESTURE: &str = "gesture";
    /// Property write
    pub const PROP_CHANGE: &str = "prop-change";
}

/// Hardware-state keys
pub mod hardware {
    /// Button bitmask
    pub const BUTTONS_DOWN: &str = "buttons-down";
    /// Reported touch count
    pub const TOUCH_COUNT: &str = "touch-count";
    /// Capture time
    pub const TIMESTAMP: &str = "timestamp";
    /// Finger list
    pub const FINGERS: &str = "fingers";
    /// Relative X
    pub const REL_X: &str = "rel-x";
    /// Relative Y
    pub const REL_Y: &str = "rel-y";
    /// Vertical wheel
    pub const REL_WHEEL: &str = "rel-wheel";
    /// Horizontal wheel
    pub const REL_HWHEEL: &str = "rel-hwheel";
}

/// Finger keys
pub mod finger {
    /// Touch major axis
    pub const TOUCH_MAJOR: &str = "touch-major";
    /// Touch minor axis
    pub const TOUCH_MINOR: &str = "touch-minor";
    /// Width major axis
    pub const WIDTH_MAJOR: &str = "width-major";
    /// Width minor axis
    pub const WIDTH_MINOR: &str = "width-minor";
    /// Pressure
    pub const PRESSURE: &str = "pressure";
    /// Orientation
    pub const ORIENTATION: &str = "orientation";
    /// X position
    pub const POSITION_X: &str = "position-x";
    /// Y position
    pub const POSITION_Y: &str = "position-y";
    /// Tracking id
    pub const TRACKING_ID: &str = "tracking-id";
    /// Flag bitmask (optional)
    pub const FLAGS: &str = "flags";
}

/// Timer keys
pub mod timer {
    /// Firing time
    pub const NOW: &str = "now";
    /// Requested time
    pub const WHEN: &str = "when";
}

/// Gesture keys
pub mod gesture {
    /// Gesture discriminator
    pub const GESTURE_TYPE: &str = "gesture-type";
    /// Start time
    pub const START_TIME: &str = "start-time";
    /// End time
    pub const END_TIME: &str = "end-time";
    /// Motion X
    pub const DX: &str = "dx";
    /// Motion Y
    pub const DY: &str = "dy";
    /// Unaccelerated motion X
    pub const ORDINAL_DX: &str = "ordinal-dx";
    /// Unaccelerated motion Y
    pub const ORDINAL_DY: &str = "ordinal-dy";
    /// Pinch delta
    pub const DZ: &str = "dz";
    /// Unaccelerated pinch delta
    pub const ORDINAL_DZ: &str = "ordinal-dz";
    /// Buttons down
    pub const DOWN: &str = "down";
    /// Buttons up
    pub const UP: &str = "up";
    /// Fling X velocity
    pub const VX: &str = "vx";
    /// Fling Y velocity
    pub const VY: &str = "vy";
    /// Unaccelerated fling X velocity
    pub const ORDINAL_VX: &str = "ordinal-vx";
    /// Unaccelerated fling Y velocity
    pub const ORDINAL_VY: &str = "ordinal-vy";
    /// Fling state code
    pub const FLING_STATE: &str = "fling-state";
    /// Metrics first sample
    pub const DATA_1: &str = "data-1";
    /// Metrics second sample
    pub const DATA_2: &str = "data-2";
    /// Metrics sub-kind code
    pub const METRICS_TYPE: &str = "metrics-type";
}

/// Property-change keys
pub mod prop_change {
    /// Value type discriminator
    pub const PROP_CHANGE_TYPE: &str = "prop-change-type";
    /// Property name
    pub const NAME: &str = "name";
    /// Written value
    pub const VALUE: &str = "value";
}
