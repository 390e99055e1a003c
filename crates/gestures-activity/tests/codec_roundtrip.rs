//! Encode/decode behaviour of the log format.

use gestures_activity::prelude::*;
use gestures_events::{
    FingerTouch, FlingState, Gesture, GestureDetails, HardwareDescriptor, HardwareFrame,
    MetricsKind, Motion, Pinch, PropValue, PropertyChangeRecord, TimerEvent,
};
use gestures_test_helpers::prelude::*;
use proptest::prelude::*;
use serde_json::json;

fn coord() -> impl Strategy<Value = f32> {
    -5000.0f32..5000.0
}

fn time() -> impl Strategy<Value = f64> {
    0.0f64..10_000.0
}

fn descriptor() -> impl Strategy<Value = HardwareDescriptor> {
    (
        (coord(), coord(), coord(), coord()),
        (0.0f32..100.0, 0.0f32..100.0, 0.0f32..400.0, 0.0f32..400.0),
        (proptest::option::of(-10.0f32..0.0), proptest::option::of(0.0f32..10.0)),
        (0u16..=30, 0u16..=30),
        (any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(|(bounds, scale, orientation, counts, flags)| HardwareDescriptor {
            left: bounds.0,
            top: bounds.1,
            right: bounds.2,
            bottom: bounds.3,
            res_x: scale.0,
            res_y: scale.1,
            screen_x_dpi: scale.2,
            screen_y_dpi: scale.3,
            orientation_minimum: orientation.0,
            orientation_maximum: orientation.1,
            max_finger_count: counts.0,
            max_touch_count: counts.1,
            supports_t5r2: flags.0,
            support_semi_mt: flags.1,
            is_button_pad: flags.2,
        })
}

fn finger() -> impl Strategy<Value = FingerTouch> {
    (
        (0.0f32..50.0, 0.0f32..50.0, 0.0f32..50.0, 0.0f32..50.0),
        (0.0f32..255.0, -2.0f32..2.0, coord(), coord()),
        (-1i32..1000, any::<u32>()),
    )
        .prop_map(|(axes, rest, ids)| FingerTouch {
            touch_major: axes.0,
            touch_minor: axes.1,
            width_major: axes.2,
            width_minor: axes.3,
            pressure: rest.0,
            orientation: rest.1,
            position_x: rest.2,
            position_y: rest.3,
            tracking_id: ids.0,
            flags: ids.1,
        })
}

fn frame() -> impl Strategy<Value = HardwareFrame> {
    (
        time(),
        any::<u32>(),
        0u16..40,
        prop::collection::vec(finger(), 0..=HardwareFrame::MAX_FINGERS),
        (coord(), coord(), -20.0f32..20.0, -20.0f32..20.0),
    )
        .prop_map(|(timestamp, buttons_down, touch_count, fingers, rel)| HardwareFrame {
            timestamp,
            buttons_down,
            touch_count,
            fingers,
            rel_x: rel.0,
            rel_y: rel.1,
            rel_wheel: rel.2,
            rel_hwheel: rel.3,
        })
}

fn motion() -> impl Strategy<Value = Motion> {
    (coord(), coord(), coord(), coord()).prop_map(|(dx, dy, ordinal_dx, ordinal_dy)| Motion {
        dx,
        dy,
        ordinal_dx,
        ordinal_dy,
    })
}

fn details() -> impl Strategy<Value = GestureDetails> {
    prop_oneof![
        Just(GestureDetails::Null),
        Just(GestureDetails::ContactInitiated),
        Just(GestureDetails::SwipeLift),
        motion().prop_map(GestureDetails::Move),
        motion().prop_map(GestureDetails::Scroll),
        motion().prop_map(GestureDetails::Swipe),
        (coord(), coord()).prop_map(|(dz, ordinal_dz)| GestureDetails::Pinch(Pinch { dz, ordinal_dz })),
        (any::<u32>(), any::<u32>()).prop_map(|(down, up)| {
            Gesture::new_buttons_change(0.0, 0.0, down, up).details
        }),
        (coord(), coord(), any::<bool>()).prop_map(|(vx, vy, tap)| {
            let state = if tap { FlingState::TapDown } else { FlingState::Start };
            Gesture::new_fling(0.0, 0.0, vx, vy, state).details
        }),
        (coord(), coord(), any::<bool>()).prop_map(|(a, b, noisy)| {
            let kind = if noisy { MetricsKind::NoisyGround } else { MetricsKind::Unknown };
            Gesture::new_metrics(0.0, 0.0, kind, a, b).details
        }),
    ]
}

fn gesture() -> impl Strategy<Value = Gesture> {
    (time(), 0.0f64..1.0, details())
        .prop_map(|(start, len, details)| Gesture::new(start, start + len, details))
}

fn prop_change() -> impl Strategy<Value = PropertyChangeRecord> {
    let value = prop_oneof![
        any::<bool>().prop_map(PropValue::Bool),
        any::<i32>().prop_map(PropValue::Int),
        any::<i16>().prop_map(PropValue::Short),
        (-1e9f64..1e9).prop_map(PropValue::Double),
    ];
    ("[A-Z][a-z]{2,8}( [A-Z][a-z]{2,8}){0,3}", value)
        .prop_map(|(name, value)| PropertyChangeRecord::new(name, value))
}

fn entry() -> impl Strategy<Value = LogEntry> {
    prop_oneof![
        frame().prop_map(LogEntry::HardwareFrame),
        time().prop_map(|now| LogEntry::Timer(TimerEvent::Firing { now })),
        time().prop_map(|when| LogEntry::Timer(TimerEvent::Request { when })),
        gesture().prop_map(LogEntry::Gesture),
        prop_change().prop_map(LogEntry::PropChange),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn encode_then_parse_preserves_entries_and_descriptor(
        descriptor in descriptor(),
        entries in prop::collection::vec(entry(), 0..40),
    ) {
        let mut log = ActivityLog::new(descriptor);
        for entry in entries {
            log.push(entry);
        }
        let text = must(log.encode());
        let decoded = must(ActivityReplay::default().parse(&text));
        prop_assert_eq!(decoded.descriptor(), log.descriptor());
        prop_assert_eq!(decoded.entries(), log.entries());
    }
}

#[test]
fn every_entry_kind_survives_a_round_trip() {
    let mut log = ActivityLog::new(button_pad_descriptor());
    log.log_hardware_frame(&one_finger(1.0, 3, 10.5, 20.25).with_relative(1.0, -1.0, 0.5, 0.0));
    log.log_timer_request(1.25);
    log.log_timer_firing(1.25);
    log.log_gesture(&Gesture::new_move(1.0, 1.25, 3.5, -2.0));
    log.log_property_change(&PropertyChangeRecord::new("Smooth Accel", PropValue::Bool(true)));
    log.set_properties([("Smooth Accel".to_string(), json!(true))].into_iter().collect());

    let decoded = must(ActivityReplay::default().parse(&must(log.encode())));
    assert_eq!(decoded, log);
}

fn minimal_log(entries: serde_json::Value) -> String {
    json!({
        "hardware-properties": {
            "left": 0, "top": 0, "right": 1000, "bottom": 1000,
            "x-resolution": 50, "y-resolution": 50, "x-dpi": 300, "y-dpi": 300,
            "max-finger-count": 5, "max-touch-count": 5,
            "supports-t5r2": false, "semi-mt": false, "is-button-pad": false
        },
        "entries": entries
    })
    .to_string()
}

fn finger_json(id: usize) -> serde_json::Value {
    json!({
        "touch-major": 1, "touch-minor": 1, "width-major": 1, "width-minor": 1,
        "pressure": 10, "orientation": 0, "position-x": 5, "position-y": 5,
        "tracking-id": id, "flags": 0
    })
}

#[test]
fn thirty_one_fingers_is_a_sanity_error() {
    let fingers: Vec<_> = (0..31).map(finger_json).collect();
    let text = minimal_log(json!([{
        "type": "hardware-state", "timestamp": 1.0, "buttons-down": 0,
        "touch-count": 31, "fingers": fingers
    }]));
    let err = must_err(ActivityReplay::default().parse(&text));
    assert_eq!(
        err,
        ParseError::Entry {
            index: 0,
            source: Box::new(ParseError::SensorSanity { count: 31, max: 30 }),
        }
    );
}

#[test]
fn thirty_fingers_is_accepted() {
    let fingers: Vec<_> = (0..30).map(finger_json).collect();
    let text = minimal_log(json!([{
        "type": "hardware-state", "timestamp": 1.0, "buttons-down": 0,
        "touch-count": 30, "fingers": fingers
    }]));
    let log = must(ActivityReplay::default().parse(&text));
    assert_eq!(log.len(), 1);
}

#[test]
fn longer_next_layer_replaces_entries() {
    let mut root: serde_json::Value =
        must(serde_json::from_str(&minimal_log(json!([{"type": "timer-callback", "now": 1.0}]))));
    root["next-layer"] = json!({ "entries": [
        {"type": "timer-callback", "now": 2.0},
        {"type": "callback-request", "when": 3.0}
    ]});
    let log = must(ActivityReplay::default().parse(&root.to_string()));
    assert_eq!(
        log.entries(),
        &[
            LogEntry::Timer(TimerEvent::Firing { now: 2.0 }),
            LogEntry::Timer(TimerEvent::Request { when: 3.0 }),
        ]
    );
}

#[test]
fn shorter_or_equal_next_layer_is_ignored() {
    let mut root: serde_json::Value =
        must(serde_json::from_str(&minimal_log(json!([{"type": "timer-callback", "now": 1.0}]))));
    root["next-layer"] = json!({ "entries": [{"type": "timer-callback", "now": 9.0}] });
    let log = must(ActivityReplay::default().parse(&root.to_string()));
    assert_eq!(log.entries(), &[LogEntry::Timer(TimerEvent::Firing { now: 1.0 })]);
}

#[test]
fn missing_descriptor_field_names_the_key() {
    let mut root: serde_json::Value = must(serde_json::from_str(&minimal_log(json!([]))));
    if let Some(desc) = root["hardware-properties"].as_object_mut() {
        desc.remove("x-dpi");
    }
    let err = must_err(ActivityReplay::default().parse(&root.to_string()));
    insta::assert_snapshot!(err.to_string(), @"Missing or invalid hardware-properties field `x-dpi`");
}

#[test]
fn unknown_entry_type_aborts_the_parse() {
    let text = minimal_log(json!([
        {"type": "timer-callback", "now": 1.0},
        {"type": "teleport"}
    ]));
    let err = must_err(ActivityReplay::default().parse(&text));
    insta::assert_snapshot!(err.to_string(), @"Entry 1: Unknown entry type `teleport`");
}

#[test]
fn relative_group_requires_all_four_fields() {
    let text = minimal_log(json!([{
        "type": "hardware-state", "timestamp": 1.0, "buttons-down": 0,
        "touch-count": 0, "fingers": [], "rel-x": 1.0, "rel-y": 2.0
    }]));
    assert!(matches!(
        ActivityReplay::default().parse(&text),
        Err(ParseError::Entry { index: 0, .. })
    ));
}
