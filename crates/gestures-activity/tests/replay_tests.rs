//! Replay of recorded logs through live pipelines.

use std::cell::RefCell;
use std::rc::Rc;

use gestures_activity::prelude::*;
use gestures_events::{
    FlingState, Gesture, GestureDetails, HardwareFrame, Motion, PropValue, PropertyChangeRecord,
};
use gestures_filters::accel::names as accel_names;
use gestures_filters::prelude::*;
use gestures_interpreter::{ChainBuilder, Pipeline};
use gestures_props::PropRegistry;
use gestures_test_helpers::prelude::*;
use serde_json::json;

const SCENARIO: &str = r#"{
  "hardware-properties": {
    "left": 0, "top": 0, "right": 1000, "bottom": 1000,
    "x-resolution": 50, "y-resolution": 50, "x-dpi": 300, "y-dpi": 300,
    "max-finger-count": 5, "max-touch-count": 5,
    "supports-t5r2": false, "semi-mt": false, "is-button-pad": false
  },
  "entries": [
    {"type": "hardware-state", "timestamp": 0.0, "buttons-down": 0, "touch-count": 1,
     "fingers": [{"touch-major": 0, "touch-minor": 0, "width-major": 0, "width-minor": 0,
                  "pressure": 50, "orientation": 0, "position-x": 100, "position-y": 100,
                  "tracking-id": 1, "flags": 0}]},
    {"type": "hardware-state", "timestamp": 0.01, "buttons-down": 0, "touch-count": 1,
     "fingers": [{"touch-major": 0, "touch-minor": 0, "width-major": 0, "width-minor": 0,
                  "pressure": 50, "orientation": 0, "position-x": 110, "position-y": 100,
                  "tracking-id": 1, "flags": 0}]},
    {"type": "gesture", "gesture-type": "move", "start-time": 0.0, "end-time": 0.01,
     "dx": 10, "dy": 0, "ordinal-dx": 10, "ordinal-dy": 0}
  ]
}"#;

/// Accel over the motion base, configured at pointer sensitivity 3.
fn accel_pipeline(registry: &PropRegistry) -> Pipeline {
    ChainBuilder::new(MotionInterpreter::new())
        .wrap(must(AccelFilter::new(registry)))
        .build()
}

fn base_log() -> ActivityLog {
    ActivityLog::new(touchpad_descriptor())
}

#[test]
fn end_to_end_scenario_reproduces_the_move() {
    init_test_tracing();
    let registry = PropRegistry::new();
    let mut pipeline = accel_pipeline(&registry);
    let replay = ActivityReplay::default();
    let log = must(replay.parse(SCENARIO));

    let report = replay.replay(&log, &mut pipeline, Some(&registry));

    assert!(report.passed(), "{report:?}");
    assert_eq!(report.entries_replayed, 3);
    assert_eq!(report.gestures_matched, 1);
    assert_eq!(
        registry.value(accel_names::POINTER_SENSITIVITY),
        Some(PropValue::Int(3))
    );
}

#[test]
fn scenario_without_registry_still_passes() {
    let registry = PropRegistry::new();
    let mut pipeline = accel_pipeline(&registry);
    let replay = ActivityReplay::default();
    let report = replay.replay(&must(replay.parse(SCENARIO)), &mut pipeline, None);
    assert!(report.passed(), "{report:?}");
    assert!(report.warnings.is_empty());
}

#[test]
fn logs_load_from_disk() {
    let dir = must(tempfile::tempdir());
    let path = dir.path().join("touchpad_activity_log.txt");
    must(std::fs::write(&path, SCENARIO));

    let log = must(ActivityReplay::default().load(&path));
    assert_eq!(log.len(), 3);
    assert!(matches!(
        ActivityReplay::default().load(dir.path().join("missing.txt")),
        Err(ActivityError::Io(_))
    ));
}

#[test]
fn replay_is_deterministic() {
    let replay = ActivityReplay::default();
    let log = must(replay.parse(SCENARIO));
    let run = || {
        let registry = PropRegistry::new();
        let mut pipeline = accel_pipeline(&registry);
        replay.replay(&log, &mut pipeline, Some(&registry))
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert!(first.passed());
}

#[test]
fn divergent_gesture_is_reported_then_missing() {
    let mut log = base_log();
    for frame in short_swipe() {
        log.log_hardware_frame(&frame);
    }
    log.log_gesture(&Gesture::new_move(0.0, 0.01, 5.0, 0.0));

    let registry = PropRegistry::new();
    let report = ActivityReplay::default().replay(&log, &mut accel_pipeline(&registry), None);

    assert_eq!(report.gestures_matched, 0);
    assert_eq!(report.mismatches.len(), 2);
    assert!(matches!(
        report.mismatches.first(),
        Some(ReplayMismatch::UnmatchedGesture { index: Some(2), .. })
    ));
    assert!(matches!(
        report.mismatches.get(1),
        Some(ReplayMismatch::MissingGesture { index: 2, .. })
    ));
}

#[test]
fn extra_produced_gesture_is_reported_at_end() {
    let mut log = base_log();
    for frame in short_swipe() {
        log.log_hardware_frame(&frame);
    }

    let registry = PropRegistry::new();
    let report = ActivityReplay::default().replay(&log, &mut accel_pipeline(&registry), None);

    assert_eq!(report.mismatches.len(), 1);
    assert!(matches!(
        report.mismatches.first(),
        Some(ReplayMismatch::UnmatchedGesture { index: None, .. })
    ));
}

#[test]
fn matching_skips_unexpected_gestures_until_a_match() {
    // The base produces a buttons change and a move from the same frame;
    // the log only recorded the move.
    let mut log = base_log();
    log.log_hardware_frame(&one_finger(0.0, 1, 100.0, 100.0));
    log.log_hardware_frame(&one_finger(0.01, 1, 110.0, 100.0).with_buttons(1));
    log.log_gesture(&Gesture::new_move(0.0, 0.01, 10.0, 0.0));

    let registry = PropRegistry::new();
    let report = ActivityReplay::default().replay(&log, &mut accel_pipeline(&registry), None);

    assert_eq!(report.gestures_matched, 1);
    assert_eq!(report.mismatches.len(), 1);
    assert!(matches!(
        report.mismatches.first(),
        Some(ReplayMismatch::UnmatchedGesture { index: Some(2), actual })
            if matches!(actual.details, GestureDetails::ButtonsChange(_))
    ));
}

#[test]
fn timeout_requests_are_compared() {
    let mut log = base_log();
    log.log_hardware_frame(&HardwareFrame::new(1.0));
    log.log_timer_request(1.5);
    log.log_hardware_frame(&HardwareFrame::new(2.0));
    log.log_timer_request(3.0);

    let mut pipeline = ChainBuilder::new(ScriptedInterpreter::new().with_frame_timeout(0.5)).build();
    let report = ActivityReplay::default().replay(&log, &mut pipeline, None);

    assert_eq!(
        report.mismatches,
        vec![ReplayMismatch::TimeoutMismatch {
            index: 3,
            expected: 3.0,
            actual: Some(2.5),
        }]
    );
}

#[test]
fn logged_request_without_live_request_is_a_mismatch() {
    let mut log = base_log();
    log.log_hardware_frame(&HardwareFrame::new(1.0));
    log.log_timer_request(1.5);

    let mut pipeline = ChainBuilder::new(ScriptedInterpreter::new()).build();
    let report = ActivityReplay::default().replay(&log, &mut pipeline, None);

    assert!(matches!(
        report.mismatches.as_slice(),
        [ReplayMismatch::TimeoutMismatch { index: 1, actual: None, .. }]
    ));
}

#[test]
fn timer_firings_drive_the_pipeline() {
    let fling = Gesture::new_fling(0.0, 0.0, 0.0, 300.0, FlingState::Start);
    let mut log = base_log();
    log.log_hardware_frame(&HardwareFrame::new(1.0));
    log.log_timer_request(1.5);
    log.log_timer_firing(1.5);
    log.log_gesture(&Gesture::new_fling(1.5, 1.5, 0.0, 300.0, FlingState::Start));

    let script = ScriptedInterpreter::new()
        .with_frame_timeout(0.5)
        .with_timer_gesture(fling);
    let (_, timers) = script.counters();
    let mut pipeline = ChainBuilder::new(script).build();
    let report = ActivityReplay::default().replay(&log, &mut pipeline, None);

    assert!(report.passed(), "{report:?}");
    assert_eq!(timers.get(), 1);
}

#[test]
fn property_writes_are_replayed_in_place() {
    let mut log = base_log();
    let mut frames = short_swipe().into_iter();
    log.log_hardware_frame(&must_some(frames.next(), "first frame"));
    log.log_property_change(&PropertyChangeRecord::new(
        accel_names::POINT_X_OUT_SCALE,
        PropValue::Double(2.0),
    ));
    log.log_hardware_frame(&must_some(frames.next(), "second frame"));
    log.log_gesture(&Gesture::new(
        0.0,
        0.01,
        GestureDetails::Move(Motion {
            dx: 20.0,
            dy: 0.0,
            ordinal_dx: 10.0,
            ordinal_dy: 0.0,
        }),
    ));

    let registry = PropRegistry::new();
    let mut pipeline = accel_pipeline(&registry);
    let report = ActivityReplay::default().replay(&log, &mut pipeline, Some(&registry));
    assert!(report.passed(), "{report:?}");

    let registry = PropRegistry::new();
    let mut pipeline = accel_pipeline(&registry);
    let report = ActivityReplay::default().replay(&log, &mut pipeline, None);
    assert_eq!(
        report.warnings,
        vec![RestoreWarning::NotRegistered(accel_names::POINT_X_OUT_SCALE.to_string())]
    );
    // Without the write the move comes out unscaled.
    assert!(matches!(
        report.mismatches.first(),
        Some(ReplayMismatch::UnmatchedGesture { index: Some(3), .. })
    ));
}

#[test]
fn refused_property_writes_are_warnings_not_failures() {
    let mut log = base_log();
    log.log_property_change(&PropertyChangeRecord::new(
        accel_names::SMOOTH_ACCEL,
        PropValue::Double(1.0),
    ));
    log.log_property_change(&PropertyChangeRecord::new(
        "Removed Property",
        PropValue::Int(2),
    ));
    log.log_timer_firing(0.5);

    let registry = PropRegistry::new();
    let replay = ActivityReplay::new(
        ReplayConfig::default().with_honor_props([accel_names::SMOOTH_ACCEL]),
    );
    let report = replay.replay(&log, &mut accel_pipeline(&registry), Some(&registry));

    assert!(report.passed(), "{report:?}");
    assert_eq!(report.entries_replayed, 3);
    assert!(matches!(
        report.warnings.as_slice(),
        [
            RestoreWarning::MissingFromLog(missing),
            RestoreWarning::Rejected { name, .. },
            RestoreWarning::NotRegistered(removed),
        ] if missing == accel_names::SMOOTH_ACCEL
            && name == accel_names::SMOOTH_ACCEL
            && removed == "Removed Property"
    ));
    assert_eq!(
        registry.value(accel_names::SMOOTH_ACCEL),
        Some(PropValue::Bool(false))
    );
}

#[test]
fn snapshot_restoration_honors_the_restrict_set() {
    let mut log = must(ActivityReplay::default().parse(SCENARIO));
    log.set_properties(
        [
            (accel_names::SMOOTH_ACCEL.to_string(), json!(true)),
            (accel_names::POINTER_SENSITIVITY.to_string(), json!(3)),
            ("Compute Surface Area from Pressure".to_string(), json!(1)),
        ]
        .into_iter()
        .collect(),
    );

    let registry = PropRegistry::new();
    let mut pipeline = accel_pipeline(&registry);
    let replay = ActivityReplay::new(
        ReplayConfig::default().with_honor_props([accel_names::POINTER_SENSITIVITY]),
    );
    let report = replay.replay(&log, &mut pipeline, Some(&registry));

    assert!(report.passed(), "{report:?}");
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(registry.value(accel_names::SMOOTH_ACCEL), Some(PropValue::Bool(false)));

    let registry = PropRegistry::new();
    let mut pipeline = accel_pipeline(&registry);
    let report = ActivityReplay::default().replay(&log, &mut pipeline, Some(&registry));
    assert_eq!(registry.value(accel_names::SMOOTH_ACCEL), Some(PropValue::Bool(true)));
    assert!(
        report
            .warnings
            .contains(&RestoreWarning::MissingFromLog(accel_names::MIN_DT.to_string()))
    );
}

/// Logging over accel over the motion base.
fn logged_pipeline(registry: &PropRegistry) -> (Pipeline, Rc<RefCell<ActivityLog>>) {
    let logging = must(LoggingFilter::new(registry, LoggingConfig::default()));
    let log = logging.log();
    let pipeline = ChainBuilder::new(MotionInterpreter::new())
        .wrap(must(AccelFilter::new(registry)))
        .wrap(logging)
        .build();
    (pipeline, log)
}

#[test]
fn captured_session_replays_cleanly() {
    init_test_tracing();
    let registry = PropRegistry::new();
    let (mut live, captured) = logged_pipeline(&registry);
    let output = GestureCollector::new();
    live.initialize(touchpad_descriptor(), None, None, output.consumer());

    let points: Vec<(f32, f32)> = (0..12u8)
        .map(|i| (100.0 + 40.0 * f32::from(i), 200.0 + 15.0 * f32::from(i)))
        .collect();
    let mut timeout = None;
    for (i, mut frame) in finger_track(0.0, 0.0125, 1, &points).into_iter().enumerate() {
        if i == 6 {
            must(registry.set(accel_names::POINT_X_OUT_SCALE, PropValue::Double(2.0)));
        }
        must(live.sync_interpret(&mut frame, &mut timeout));
    }
    assert_eq!(output.len(), 11);

    let text = {
        let mut log = captured.borrow().clone();
        log.set_properties(registry.snapshot());
        must(log.encode())
    };

    // The snapshot holds the post-write out scale; restoring it would
    // change the gestures logged before the write.
    let replay = ActivityReplay::new(
        ReplayConfig::default().with_honor_props([accel_names::POINTER_SENSITIVITY]),
    );
    let log = must(replay.parse(&text));
    let registry = PropRegistry::new();
    let (mut pipeline, _) = logged_pipeline(&registry);
    let report = replay.replay(&log, &mut pipeline, Some(&registry));

    assert!(report.passed(), "{report:?}");
    assert_eq!(report.gestures_matched, 11);
    assert_eq!(report.entries_replayed, log.len());
}

#[test]
fn captured_timer_session_replays_cleanly() {
    let fling = Gesture::new_fling(0.0, 0.0, 0.0, 300.0, FlingState::Start);
    let script = || {
        ScriptedInterpreter::new()
            .with_frame_timeout(0.25)
            .with_timer_gesture(fling)
            .with_timer_gesture(fling)
    };
    let pipeline_with_log = |registry: &PropRegistry| {
        let logging = must(LoggingFilter::new(registry, LoggingConfig::default()));
        let log = logging.log();
        let pipeline = ChainBuilder::new(script())
            .wrap(must(AccelFilter::new(registry)))
            .wrap(logging)
            .build();
        (pipeline, log)
    };

    let registry = PropRegistry::new();
    let (mut live, captured) = pipeline_with_log(&registry);
    live.initialize(touchpad_descriptor(), None, None, Box::new(|_: &Gesture| {}));
    let mut timeout = None;
    must(live.sync_interpret(&mut HardwareFrame::new(1.0), &mut timeout));
    let mut firings = 0;
    while let Some(now) = timeout {
        must(live.handle_timer(now, &mut timeout));
        firings += 1;
    }
    assert_eq!(firings, 2);

    let text = must(captured.borrow().encode());
    let replay = ActivityReplay::default();
    let log = must(replay.parse(&text));
    let registry = PropRegistry::new();
    let (mut pipeline, _) = pipeline_with_log(&registry);
    let report = replay.replay(&log, &mut pipeline, Some(&registry));

    assert!(report.passed(), "{report:?}");
    assert_eq!(report.gestures_matched, 2);
}
