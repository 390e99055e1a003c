//! Property registry
//!
//! Single-threaded by construction: the registry is an `Rc` handle shared by
//! every stage of one pipeline and by the replay driver.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use gestures_events::{PropValue, PropertyChangeRecord};
use serde_json::Value;
use tracing::debug;

use crate::error::{PropertyError, PropertyResult};
use crate::property::{
    BoolProperty, DoubleArrayProperty, DoubleProperty, IntProperty, Property, ShortProperty,
};

/// Name-to-value snapshot of every registered property, as stored in logs.
pub type PropertySnapshot = BTreeMap<String, Value>;

type Observer = Box<dyn FnMut(&PropValue)>;
type WriteListener = Box<dyn FnMut(&PropertyChangeRecord)>;

#[derive(Clone)]
enum Slot {
    Bool(BoolProperty),
    Int(IntProperty),
    Short(ShortProperty),
    Double(DoubleProperty),
    DoubleArray(DoubleArrayProperty),
}

impl Slot {
    fn type_name(&self) -> &'static str {
        match self {
            Slot::Bool(_) => "bool",
            Slot::Int(_) => "int",
            Slot::Short(_) => "short",
            Slot::Double(_) => "double",
            Slot::DoubleArray(_) => "double-array",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Slot::Bool(p) => Value::from(p.get()),
            Slot::Int(p) => Value::from(p.get()),
            Slot::Short(p) => Value::from(p.get()),
            Slot::Double(p) => Value::from(p.get()),
            Slot::DoubleArray(p) => Value::from(p.get()),
        }
    }

    fn scalar(&self) -> Option<PropValue> {
        match self {
            Slot::Bool(p) => Some(PropValue::Bool(p.get())),
            Slot::Int(p) => Some(PropValue::Int(p.get())),
            Slot::Short(p) => Some(PropValue::Short(p.get())),
            Slot::Double(p) => Some(PropValue::Double(p.get())),
            Slot::DoubleArray(_) => None,
        }
    }

    /// Apply a typed write, widening integers where lossless.
    fn apply(&self, name: &str, value: PropValue) -> PropertyResult<PropValue> {
        let mismatch = || PropertyError::TypeMismatch {
            name: name.to_string(),
            expected: self.type_name(),
            found: format!("{value} ({})", value.type_name()),
        };
        match (self, value) {
            (Slot::Bool(p), PropValue::Bool(v)) => {
                p.store(v);
                Ok(PropValue::Bool(v))
            }
            (Slot::Int(p), PropValue::Int(v)) => {
                p.store(v);
                Ok(PropValue::Int(v))
            }
            (Slot::Int(p), PropValue::Short(v)) => {
                p.store(i32::from(v));
                Ok(PropValue::Int(i32::from(v)))
            }
            (Slot::Short(p), PropValue::Short(v)) => {
                p.store(v);
                Ok(PropValue::Short(v))
            }
            (Slot::Short(p), PropValue::Int(v)) => {
                let Ok(v) = i16::try_from(v) else {
                    return Err(mismatch());
                };
                p.store(v);
                Ok(PropValue::Short(v))
            }
            (Slot::Double(p), PropValue::Double(v)) => {
                p.store(v);
                Ok(PropValue::Double(v))
            }
            (Slot::Double(p), PropValue::Int(v)) => {
                p.store(f64::from(v));
                Ok(PropValue::Double(f64::from(v)))
            }
            (Slot::Double(p), PropValue::Short(v)) => {
                p.store(f64::from(v));
                Ok(PropValue::Double(f64::from(v)))
            }
            _ => Err(mismatch()),
        }
    }

    /// Apply a JSON value as stored in a log's property section.
    fn apply_json(&self, name: &str, value: &Value) -> PropertyResult<()> {
        let mismatch = || PropertyError::TypeMismatch {
            name: name.to_string(),
            expected: self.type_name(),
            found: value.to_string(),
        };
        match self {
            Slot::Bool(p) => {
                let v = match value {
                    Value::Bool(b) => *b,
                    Value::Number(n) => match n.as_i64() {
                        Some(0) => false,
                        Some(1) => true,
                        _ => return Err(mismatch()),
                    },
                    _ => return Err(mismatch()),
                };
                p.store(v);
            }
            Slot::Int(p) => {
                let v = value
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(mismatch)?;
                p.store(v);
            }
            Slot::Short(p) => {
                let v = value
                    .as_i64()
                    .and_then(|v| i16::try_from(v).ok())
                    .ok_or_else(mismatch)?;
                p.store(v);
            }
            Slot::Double(p) => {
                let v = value.as_f64().ok_or_else(mismatch)?;
                p.store(v);
            }
            Slot::DoubleArray(p) => {
                let items = value.as_array().ok_or_else(mismatch)?;
                let values = items
                    .iter()
                    // JSON has no infinity; open curve bounds are written as null.
                    .map(|v| if v.is_null() { Some(f64::INFINITY) } else { v.as_f64() })
                    .collect::<Option<Vec<f64>>>()
                    .ok_or_else(mismatch)?;
                p.store(values);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct RegistryInner {
    slots: BTreeMap<String, Slot>,
    observers: BTreeMap<String, Vec<Observer>>,
    listeners: Vec<WriteListener>,
    // Records written while listeners run, delivered after the current one
    pending: VecDeque<PropertyChangeRecord>,
    dispatching: bool,
}

/// Shared registry of named, typed properties.
///
/// Cloning the registry clones the handle, not the properties.
#[derive(Clone, Default)]
pub struct PropRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

/// Non-owning registry handle for observers that need to read the registry
/// they are registered on.
#[derive(Clone, Default)]
pub struct WeakPropRegistry {
    inner: Weak<RefCell<RegistryInner>>,
}

impl WeakPropRegistry {
    /// Upgrade to a registry handle if it is still alive.
    pub fn upgrade(&self) -> Option<PropRegistry> {
        self.inner.upgrade().map(|inner| PropRegistry { inner })
    }
}

impl fmt::Debug for WeakPropRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPropRegistry")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

macro_rules! register_scalar {
    ($(#[$doc:meta])* $fn_name:ident, $ty:ty, $variant:ident, $type_name:literal) => {
        $(#[$doc])*
        ///
        /// Registering an existing name with the same type returns a handle
        /// to the existing property and keeps its current value.
        ///
        /// # Errors
        ///
        /// Returns [`PropertyError::TypeConflict`] if the name is registered
        /// with another type.
        pub fn $fn_name(&self, name: &str, default: $ty) -> PropertyResult<Property<$ty>> {
            let mut inner = self.inner.borrow_mut();
            match inner.slots.get(name) {
                Some(Slot::$variant(existing)) => Ok(existing.clone()),
                Some(other) => Err(PropertyError::TypeConflict {
                    name: name.to_string(),
                    existing: other.type_name(),
                    requested: $type_name,
                }),
                None => {
                    let prop = Property::new(name, default);
                    inner.slots.insert(name.to_string(), Slot::$variant(prop.clone()));
                    Ok(prop)
                }
            }
        }
    };
}

impl PropRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    register_scalar!(
        /// Register a boolean property.
        register_bool, bool, Bool, "bool"
    );
    register_scalar!(
        /// Register a 32-bit integer property.
        register_int, i32, Int, "int"
    );
    register_scalar!(
        /// Register a 16-bit integer property.
        register_short, i16, Short, "short"
    );
    register_scalar!(
        /// Register a double property.
        register_double, f64, Double, "double"
    );

    /// Register a list-of-doubles property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::TypeConflict`] if the name is registered
    /// with another type.
    pub fn register_double_array(
        &self,
        name: &str,
        default: &[f64],
    ) -> PropertyResult<DoubleArrayProperty> {
        let mut inner = self.inner.borrow_mut();
        match inner.slots.get(name) {
            Some(Slot::DoubleArray(existing)) => Ok(existing.clone()),
            Some(other) => Err(PropertyError::TypeConflict {
                name: name.to_string(),
                existing: other.type_name(),
                requested: "double-array",
            }),
            None => {
                let prop = DoubleArrayProperty::new(name, default);
                inner
                    .slots
                    .insert(name.to_string(), Slot::DoubleArray(prop.clone()));
                Ok(prop)
            }
        }
    }

    /// Non-owning handle to this registry.
    pub fn downgrade(&self) -> WeakPropRegistry {
        WeakPropRegistry {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether a property with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().slots.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.inner.borrow().slots.keys().cloned().collect()
    }

    /// Number of registered properties.
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// Whether no property is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }

    /// Current value of a scalar property.
    pub fn value(&self, name: &str) -> Option<PropValue> {
        self.inner.borrow().slots.get(name).and_then(Slot::scalar)
    }

    /// Snapshot of every property as JSON values.
    pub fn snapshot(&self) -> PropertySnapshot {
        self.inner
            .borrow()
            .slots
            .iter()
            .map(|(name, slot)| (name.clone(), slot.to_json()))
            .collect()
    }

    /// Write a scalar property, then notify write listeners and the
    /// property's observers.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Unknown`] for an unregistered name and
    /// [`PropertyError::TypeMismatch`] when the value does not fit.
    pub fn set(&self, name: &str, value: PropValue) -> PropertyResult<()> {
        let applied = {
            let inner = self.inner.borrow();
            let slot = inner
                .slots
                .get(name)
                .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
            slot.apply(name, value)?
        };
        debug!(property = name, value = %applied, "property written");

        let record = PropertyChangeRecord::new(name, applied);
        self.notify_listeners(&record);
        self.notify_observers(name, &applied);
        Ok(())
    }

    /// Replace the values of a list-of-doubles property.
    ///
    /// List writes have no change-record type and are not reported to
    /// listeners or observers.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Unknown`] or [`PropertyError::TypeMismatch`].
    pub fn set_double_array(&self, name: &str, values: &[f64]) -> PropertyResult<()> {
        let inner = self.inner.borrow();
        match inner.slots.get(name) {
            Some(Slot::DoubleArray(p)) => {
                p.store(values.to_vec());
                debug!(property = name, len = values.len(), "array property written");
                Ok(())
            }
            Some(other) => Err(PropertyError::TypeMismatch {
                name: name.to_string(),
                expected: other.type_name(),
                found: "double-array".to_string(),
            }),
            None => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    /// Silently apply a JSON value from a log's property section.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Unknown`] or [`PropertyError::TypeMismatch`].
    pub fn restore_json(&self, name: &str, value: &Value) -> PropertyResult<()> {
        let inner = self.inner.borrow();
        let slot = inner
            .slots
            .get(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        slot.apply_json(name, value)
    }

    /// Register an observer invoked after every [`set`](Self::set) of `name`.
    ///
    /// Observers must be idempotent: the same write may be replayed.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Unknown`] for an unregistered name.
    pub fn observe(
        &self,
        name: &str,
        observer: impl FnMut(&PropValue) + 'static,
    ) -> PropertyResult<()> {
        let mut inner = self.inner.borrow_mut();
        if !inner.slots.contains_key(name) {
            return Err(PropertyError::Unknown(name.to_string()));
        }
        inner
            .observers
            .entry(name.to_string())
            .or_default()
            .push(Box::new(observer));
        Ok(())
    }

    /// Register a listener invoked with a change record after every scalar write.
    ///
    /// A write made from inside a listener is delivered to every listener
    /// once the current record has been delivered, so records arrive in
    /// write order. A listener that writes on every record never settles.
    pub fn add_write_listener(&self, listener: impl FnMut(&PropertyChangeRecord) + 'static) {
        self.inner.borrow_mut().listeners.push(Box::new(listener));
    }

    fn notify_listeners(&self, record: &PropertyChangeRecord) {
        let mut listeners = {
            let mut inner = self.inner.borrow_mut();
            inner.pending.push_back(record.clone());
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
            std::mem::take(&mut inner.listeners)
        };
        loop {
            let next = self.inner.borrow_mut().pending.pop_front();
            let Some(record) = next else { break };
            for listener in &mut listeners {
                listener(&record);
            }
        }
        let mut inner = self.inner.borrow_mut();
        inner.dispatching = false;
        let added = std::mem::replace(&mut inner.listeners, listeners);
        inner.listeners.extend(added);
    }

    fn notify_observers(&self, name: &str, value: &PropValue) {
        let taken = self.inner.borrow_mut().observers.remove(name);
        let Some(mut observers) = taken else {
            return;
        };
        for observer in &mut observers {
            observer(value);
        }
        let mut inner = self.inner.borrow_mut();
        let slot = inner.observers.entry(name.to_string()).or_default();
        let added = std::mem::replace(slot, observers);
        slot.extend(added);
    }
}

impl fmt::Debug for PropRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PropRegistry")
            .field("properties", &inner.slots.keys().collect::<Vec<_>>())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
