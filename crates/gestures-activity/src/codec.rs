//! JSON codec for activity logs
//!
//! The codec walks `serde_json::Value` trees by hand instead of deriving
//! serde impls: the wire format is flat, kebab-cased and discriminated by
//! string tags, and every decode failure must name the entry index and key
//! that caused it.
//!
//! Decoding is tolerant in the places older capture tools differ (missing
//! finger flags, missing relative-motion group, unknown gesture types) and
//! strict everywhere else.

use gestures_events::{
    Buttons, FingerTouch, Fling, FlingState, Gesture, GestureDetails, HardwareDescriptor,
    HardwareFrame, Metrics, MetricsKind, Motion, Pinch, PropValue, PropertyChangeRecord,
    TimerEvent,
};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::error::{ActivityResult, ParseError};
use crate::format::{self, descriptor as dk, entry as ek, finger as fk, gesture as gk};
use crate::format::{hardware as hk, prop_change as pk, timer as tk};
use crate::log::{ActivityLog, LogEntry};

/// Encode a log as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the JSON writer fails.
pub fn encode(log: &ActivityLog) -> ActivityResult<String> {
    Ok(serde_json::to_string_pretty(&to_value(log))?)
}

/// Build the JSON tree for a log.
///
/// Non-finite floats have no JSON form and are written as `null`, which
/// will not decode.
pub fn to_value(log: &ActivityLog) -> Value {
    let properties: Map<String, Value> = log
        .properties()
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let entries: Vec<Value> = log.entries().iter().map(encode_entry).collect();
    json!({
        (format::KEY_PROPERTIES): properties,
        (format::KEY_HARDWARE_PROPERTIES): encode_descriptor(log.descriptor()),
        (format::KEY_ENTRIES): entries,
    })
}

fn encode_descriptor(d: &HardwareDescriptor) -> Value {
    let mut obj = Map::new();
    obj.insert(dk::LEFT.into(), json!(d.left));
    obj.insert(dk::TOP.into(), json!(d.top));
    obj.insert(dk::RIGHT.into(), json!(d.right));
    obj.insert(dk::BOTTOM.into(), json!(d.bottom));
    obj.insert(dk::X_RESOLUTION.into(), json!(d.res_x));
    obj.insert(dk::Y_RESOLUTION.into(), json!(d.res_y));
    obj.insert(dk::X_DPI.into(), json!(d.screen_x_dpi));
    obj.insert(dk::Y_DPI.into(), json!(d.screen_y_dpi));
    if let Some(min) = d.orientation_minimum {
        obj.insert(dk::ORIENTATION_MINIMUM.into(), json!(min));
    }
    if let Some(max) = d.orientation_maximum {
        obj.insert(dk::ORIENTATION_MAXIMUM.into(), json!(max));
    }
    obj.insert(dk::MAX_FINGER_COUNT.into(), json!(d.max_finger_count));
    obj.insert(dk::MAX_TOUCH_COUNT.into(), json!(d.max_touch_count));
    obj.insert(dk::SUPPORTS_T5R2.into(), json!(d.supports_t5r2));
    obj.insert(dk::SEMI_MT.into(), json!(d.support_semi_mt));
    obj.insert(dk::IS_BUTTON_PAD.into(), json!(d.is_button_pad));
    Value::Object(obj)
}

fn encode_finger(f: &FingerTouch) -> Value {
    json!({
        (fk::TOUCH_MAJOR): f.touch_major,
        (fk::TOUCH_MINOR): f.touch_minor,
        (fk::WIDTH_MAJOR): f.width_major,
        (fk::WIDTH_MINOR): f.width_minor,
        (fk::PRESSURE): f.pressure,
        (fk::ORIENTATION): f.orientation,
        (fk::POSITION_X): f.position_x,
        (fk::POSITION_Y): f.position_y,
        (fk::TRACKING_ID): f.tracking_id,
        (fk::FLAGS): f.flags,
    })
}

fn encode_motion(obj: &mut Map<String, Value>, m: &Motion) {
    obj.insert(gk::DX.into(), json!(m.dx));
    obj.insert(gk::DY.into(), json!(m.dy));
    obj.insert(gk::ORDINAL_DX.into(), json!(m.ordinal_dx));
    obj.insert(gk::ORDINAL_DY.into(), json!(m.ordinal_dy));
}

fn encode_gesture(g: &Gesture) -> Value {
    let mut obj = Map::new();
    obj.insert(format::KEY_TYPE.into(), json!(ek::GESTURE));
    obj.insert(gk::GESTURE_TYPE.into(), json!(g.kind().name()));
    obj.insert(gk::START_TIME.into(), json!(g.start_time));
    obj.insert(gk::END_TIME.into(), json!(g.end_time));
    match &g.details {
        GestureDetails::Null | GestureDetails::ContactInitiated | GestureDetails::SwipeLift => {}
        GestureDetails::Move(m) | GestureDetails::Scroll(m) | GestureDetails::Swipe(m) => {
            encode_motion(&mut obj, m);
        }
        GestureDetails::Pinch(p) => {
            obj.insert(gk::DZ.into(), json!(p.dz));
            obj.insert(gk::ORDINAL_DZ.into(), json!(p.ordinal_dz));
        }
        GestureDetails::ButtonsChange(b) => {
            obj.insert(gk::DOWN.into(), json!(b.down));
            obj.insert(gk::UP.into(), json!(b.up));
        }
        GestureDetails::Fling(f) => {
            obj.insert(gk::VX.into(), json!(f.vx));
            obj.insert(gk::VY.into(), json!(f.vy));
            obj.insert(gk::ORDINAL_VX.into(), json!(f.ordinal_vx));
            obj.insert(gk::ORDINAL_VY.into(), json!(f.ordinal_vy));
            obj.insert(gk::FLING_STATE.into(), json!(f.state.code()));
        }
        GestureDetails::Metrics(m) => {
            let [d1, d2] = m.data;
            obj.insert(gk::DATA_1.into(), json!(d1));
            obj.insert(gk::DATA_2.into(), json!(d2));
            obj.insert(gk::METRICS_TYPE.into(), json!(m.kind.code()));
        }
    }
    Value::Object(obj)
}

fn encode_prop_value(value: PropValue) -> Value {
    match value {
        PropValue::Bool(v) => json!(v),
        PropValue::Int(v) => json!(v),
        PropValue::Short(v) => json!(v),
        PropValue::Double(v) => json!(v),
    }
}

fn encode_entry(entry: &LogEntry) -> Value {
    match entry {
        LogEntry::HardwareFrame(frame) => {
            let fingers: Vec<Value> = frame.fingers.iter().map(encode_finger).collect();
            json!({
                (format::KEY_TYPE): ek::HARDWARE_STATE,
                (hk::BUTTONS_DOWN): frame.buttons_down,
                (hk::TOUCH_COUNT): frame.touch_count,
                (hk::TIMESTAMP): frame.timestamp,
                (hk::FINGERS): fingers,
                (hk::REL_X): frame.rel_x,
                (hk::REL_Y): frame.rel_y,
                (hk::REL_WHEEL): frame.rel_wheel,
                (hk::REL_HWHEEL): frame.rel_hwheel,
            })
        }
        LogEntry::Timer(TimerEvent::Firing { now }) => json!({
            (format::KEY_TYPE): ek::TIMER_CALLBACK,
            (tk::NOW): now,
        }),
        LogEntry::Timer(TimerEvent::Request { when }) => json!({
            (format::KEY_TYPE): ek::CALLBACK_REQUEST,
            (tk::WHEN): when,
        }),
        LogEntry::Gesture(g) => encode_gesture(g),
        LogEntry::PropChange(record) => json!({
            (format::KEY_TYPE): ek::PROP_CHANGE,
            (pk::PROP_CHANGE_TYPE): record.value.type_name(),
            (pk::NAME): record.name,
            (pk::VALUE): encode_prop_value(record.value),
        }),
    }
}

/// Typed field access over one JSON object, naming the object in errors.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    context: &'static str,
}

impl<'a> Fields<'a> {
    fn of(value: &'a Value, context: &'static str, key: &'static str) -> Result<Self, ParseError> {
        value
            .as_object()
            .map(|obj| Self { obj, context })
            .ok_or(ParseError::Field { context, key })
    }

    fn missing(&self, key: &'static str) -> ParseError {
        ParseError::Field {
            context: self.context,
            key,
        }
    }

    fn has(&self, key: &str) -> bool {
        self.obj.contains_key(key)
    }

    fn f64(&self, key: &'static str) -> Result<f64, ParseError> {
        self.obj
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.missing(key))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn f32(&self, key: &'static str) -> Result<f32, ParseError> {
        self.f64(key).map(|v| v as f32)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn opt_f32(&self, key: &'static str) -> Option<f32> {
        self.obj.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    fn int<T: TryFrom<i64>>(&self, key: &'static str) -> Result<T, ParseError> {
        self.obj
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| self.missing(key))
    }

    fn bool(&self, key: &'static str) -> Result<bool, ParseError> {
        self.obj
            .get(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.missing(key))
    }

    fn str(&self, key: &'static str) -> Result<&'a str, ParseError> {
        self.obj
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(key))
    }

    fn array(&self, key: &'static str) -> Result<&'a Vec<Value>, ParseError> {
        self.obj
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| self.missing(key))
    }
}

/// Decode a log from text.
///
/// When the log carries a `next-layer` entry list that is strictly longer
/// than the top-level list, the nested list is decoded instead.
///
/// # Errors
///
/// Returns the first decode failure; no partial log is produced.
pub fn decode(text: &str) -> Result<ActivityLog, ParseError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ParseError::Json(e.to_string()))?;
    let root = root.as_object().ok_or(ParseError::RootNotObject)?;
    let top = Fields {
        obj: root,
        context: "log",
    };

    let properties = match root.get(format::KEY_PROPERTIES) {
        None => Default::default(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        Some(_) => return Err(top.missing(format::KEY_PROPERTIES)),
    };

    let descriptor = root
        .get(format::KEY_HARDWARE_PROPERTIES)
        .ok_or_else(|| top.missing(format::KEY_HARDWARE_PROPERTIES))
        .and_then(decode_descriptor)?;

    let mut entries = top.array(format::KEY_ENTRIES)?;
    let next_layer = root
        .get(format::KEY_NEXT_LAYER)
        .and_then(|next| next.get(format::KEY_ENTRIES))
        .and_then(Value::as_array);
    if let Some(next) = next_layer.filter(|next| next.len() > entries.len()) {
        debug!(
            top = entries.len(),
            next_layer = next.len(),
            "using next-layer entries"
        );
        entries = next;
    }

    let mut log = ActivityLog::new(descriptor);
    log.set_properties(properties);
    for (index, value) in entries.iter().enumerate() {
        let entry = decode_entry(value).map_err(|source| ParseError::Entry {
            index,
            source: Box::new(source),
        })?;
        log.push(entry);
    }
    Ok(log)
}

fn decode_descriptor(value: &Value) -> Result<HardwareDescriptor, ParseError> {
    let f = Fields::of(value, "log", format::KEY_HARDWARE_PROPERTIES)?;
    let f = Fields {
        context: "hardware-properties",
        ..f
    };
    Ok(HardwareDescriptor {
        left: f.f32(dk::LEFT)?,
        top: f.f32(dk::TOP)?,
        right: f.f32(dk::RIGHT)?,
        bottom: f.f32(dk::BOTTOM)?,
        res_x: f.f32(dk::X_RESOLUTION)?,
        res_y: f.f32(dk::Y_RESOLUTION)?,
        screen_x_dpi: f.f32(dk::X_DPI)?,
        screen_y_dpi: f.f32(dk::Y_DPI)?,
        orientation_minimum: f.opt_f32(dk::ORIENTATION_MINIMUM),
        orientation_maximum: f.opt_f32(dk::ORIENTATION_MAXIMUM),
        max_finger_count: f.int(dk::MAX_FINGER_COUNT)?,
        max_touch_count: f.int(dk::MAX_TOUCH_COUNT)?,
        supports_t5r2: f.bool(dk::SUPPORTS_T5R2)?,
        support_semi_mt: f.bool(dk::SEMI_MT)?,
        is_button_pad: f.bool(dk::IS_BUTTON_PAD)?,
    })
}

fn decode_entry(value: &Value) -> Result<LogEntry, ParseError> {
    let f = Fields::of(value, "entry", format::KEY_TYPE)?;
    match f.str(format::KEY_TYPE)? {
        ek::HARDWARE_STATE => decode_hardware_state(&f).map(LogEntry::HardwareFrame),
        ek::TIMER_CALLBACK => Ok(LogEntry::Timer(TimerEvent::Firing {
            now: f.f64(tk::NOW)?,
        })),
        ek::CALLBACK_REQUEST => Ok(LogEntry::Timer(TimerEvent::Request {
            when: f.f64(tk::WHEN)?,
        })),
        ek::GESTURE => decode_gesture(&f).map(LogEntry::Gesture),
        ek::PROP_CHANGE => decode_prop_change(&f).map(LogEntry::PropChange),
        other => Err(ParseError::UnknownEntryType(other.to_string())),
    }
}

fn decode_hardware_state(f: &Fields<'_>) -> Result<HardwareFrame, ParseError> {
    let buttons_down = f.int(hk::BUTTONS_DOWN)?;
    let touch_count = f.int(hk::TOUCH_COUNT)?;
    let timestamp = f.f64(hk::TIMESTAMP)?;
    let raw_fingers = f.array(hk::FINGERS)?;
    if raw_fingers.len() > HardwareFrame::MAX_FINGERS {
        return Err(ParseError::SensorSanity {
            count: raw_fingers.len(),
            max: HardwareFrame::MAX_FINGERS,
        });
    }
    let fingers = raw_fingers
        .iter()
        .enumerate()
        .map(|(index, value)| {
            decode_finger(value).map_err(|source| ParseError::Finger {
                index,
                source: Box::new(source),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut frame = HardwareFrame {
        timestamp,
        buttons_down,
        touch_count,
        fingers,
        ..HardwareFrame::default()
    };
    // Older logs predate relative motion; once rel-x is present the group is required.
    if f.has(hk::REL_X) {
        frame.rel_x = f.f32(hk::REL_X)?;
        frame.rel_y = f.f32(hk::REL_Y)?;
        frame.rel_wheel = f.f32(hk::REL_WHEEL)?;
        frame.rel_hwheel = f.f32(hk::REL_HWHEEL)?;
    }
    Ok(frame)
}

fn decode_finger(value: &Value) -> Result<FingerTouch, ParseError> {
    let f = Fields::of(value, "hardware-state", hk::FINGERS)?;
    let f = Fields {
        context: "finger",
        ..f
    };
    let flags = if f.has(fk::FLAGS) {
        f.int(fk::FLAGS)?
    } else {
        warn!("finger has no flags, assuming 0");
        0
    };
    Ok(FingerTouch {
        touch_major: f.f32(fk::TOUCH_MAJOR)?,
        touch_minor: f.f32(fk::TOUCH_MINOR)?,
        width_major: f.f32(fk::WIDTH_MAJOR)?,
        width_minor: f.f32(fk::WIDTH_MINOR)?,
        pressure: f.f32(fk::PRESSURE)?,
        orientation: f.f32(fk::ORIENTATION)?,
        position_x: f.f32(fk::POSITION_X)?,
        position_y: f.f32(fk::POSITION_Y)?,
        tracking_id: f.int(fk::TRACKING_ID)?,
        flags,
    })
}

fn decode_motion(f: &Fields<'_>) -> Result<Motion, ParseError> {
    Ok(Motion {
        dx: f.f32(gk::DX)?,
        dy: f.f32(gk::DY)?,
        ordinal_dx: f.f32(gk::ORDINAL_DX)?,
        ordinal_dy: f.f32(gk::ORDINAL_DY)?,
    })
}

fn decode_gesture(entry: &Fields<'_>) -> Result<Gesture, ParseError> {
    let f = Fields {
        obj: entry.obj,
        context: "gesture",
    };
    let gesture_type = f.str(gk::GESTURE_TYPE)?;
    let start_time = f.f64(gk::START_TIME)?;
    let end_time = f.f64(gk::END_TIME)?;

    let details = match gesture_type {
        "contact-initiated" => GestureDetails::ContactInitiated,
        "move" => GestureDetails::Move(decode_motion(&f)?),
        "scroll" => GestureDetails::Scroll(decode_motion(&f)?),
        "swipe" => GestureDetails::Swipe(decode_motion(&f)?),
        "swipe-lift" => GestureDetails::SwipeLift,
        "pinch" => GestureDetails::Pinch(Pinch {
            dz: f.f32(gk::DZ)?,
            ordinal_dz: f.f32(gk::ORDINAL_DZ)?,
        }),
        "buttons-change" => GestureDetails::ButtonsChange(Buttons {
            down: f.int(gk::DOWN)?,
            up: f.int(gk::UP)?,
        }),
        "fling" => GestureDetails::Fling(Fling {
            vx: f.f32(gk::VX)?,
            vy: f.f32(gk::VY)?,
            ordinal_vx: f.f32(gk::ORDINAL_VX)?,
            ordinal_vy: f.f32(gk::ORDINAL_VY)?,
            state: f
                .int::<i64>(gk::FLING_STATE)
                .ok()
                .and_then(FlingState::from_code)
                .ok_or_else(|| f.missing(gk::FLING_STATE))?,
        }),
        "metrics" => GestureDetails::Metrics(Metrics {
            data: [f.f32(gk::DATA_1)?, f.f32(gk::DATA_2)?],
            kind: MetricsKind::from_code(f.int(gk::METRICS_TYPE)?),
        }),
        other => {
            debug!(gesture_type = other, "unknown gesture type, decoding as null");
            GestureDetails::Null
        }
    };
    Ok(Gesture::new(start_time, end_time, details))
}

fn decode_prop_change(entry: &Fields<'_>) -> Result<PropertyChangeRecord, ParseError> {
    let f = Fields {
        obj: entry.obj,
        context: "prop-change",
    };
    let value = match f.str(pk::PROP_CHANGE_TYPE)? {
        "bool" => PropValue::Bool(f.bool(pk::VALUE)?),
        "double" => PropValue::Double(f.f64(pk::VALUE)?),
        "int" => PropValue::Int(f.int(pk::VALUE)?),
        "short" => PropValue::Short(f.int(pk::VALUE)?),
        other => return Err(ParseError::UnknownPropType(other.to_string())),
    };
    let name = f.str(pk::NAME)?;
    Ok(PropertyChangeRecord::new(name, value))
}
