//! Descriptor and frame builders for common test scenarios.

use gestures_events::{FingerTouch, HardwareDescriptor, HardwareFrame, Stime};

/// A 1000x1000 touchpad at 50 units/mm on a 300 DPI screen, five fingers.
pub fn touchpad_descriptor() -> HardwareDescriptor {
    HardwareDescriptor {
        left: 0.0,
        top: 0.0,
        right: 1000.0,
        bottom: 1000.0,
        res_x: 50.0,
        res_y: 50.0,
        screen_x_dpi: 300.0,
        screen_y_dpi: 300.0,
        orientation_minimum: None,
        orientation_maximum: None,
        max_finger_count: 5,
        max_touch_count: 5,
        supports_t5r2: false,
        support_semi_mt: false,
        is_button_pad: false,
    }
}

/// A clickpad with orientation range, for codec coverage.
pub fn button_pad_descriptor() -> HardwareDescriptor {
    HardwareDescriptor {
        right: 1920.0,
        bottom: 1080.0,
        res_x: 12.0,
        res_y: 12.0,
        screen_x_dpi: 133.0,
        screen_y_dpi: 133.0,
        orientation_minimum: Some(-2.0),
        orientation_maximum: Some(2.0),
        max_finger_count: 10,
        max_touch_count: 10,
        is_button_pad: true,
        ..touchpad_descriptor()
    }
}

/// A frame with one finger.
pub fn one_finger(timestamp: Stime, tracking_id: i32, x: f32, y: f32) -> HardwareFrame {
    HardwareFrame::with_fingers(
        timestamp,
        vec![FingerTouch::at(tracking_id, x, y).with_pressure(50.0)],
    )
}

/// A frame with two fingers.
pub fn two_fingers(
    timestamp: Stime,
    first: (i32, f32, f32),
    second: (i32, f32, f32),
) -> HardwareFrame {
    HardwareFrame::with_fingers(
        timestamp,
        vec![
            FingerTouch::at(first.0, first.1, first.2).with_pressure(50.0),
            FingerTouch::at(second.0, second.1, second.2).with_pressure(50.0),
        ],
    )
}

/// One finger sliding through `points`, one frame every `interval` seconds.
pub fn finger_track(
    start: Stime,
    interval: Stime,
    tracking_id: i32,
    points: &[(f32, f32)],
) -> Vec<HardwareFrame> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| one_finger(start + interval * i as Stime, tracking_id, x, y))
        .collect()
}

/// The two-frame single-finger swipe used by end-to-end replay tests:
/// (100, 100) at t=0, then (110, 100) at t=0.01.
pub fn short_swipe() -> Vec<HardwareFrame> {
    finger_track(0.0, 0.01, 1, &[(100.0, 100.0), (110.0, 100.0)])
}
