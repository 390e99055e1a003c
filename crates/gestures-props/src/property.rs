//! Typed property handles
//!
//! A handle is a shared view of one registered value. Stages keep their
//! handles and call `get()` whenever they need the current value; writes go
//! through the registry so they are logged and observed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle to a scalar property.
#[derive(Clone)]
pub struct Property<T: Copy> {
    name: Rc<str>,
    value: Rc<Cell<T>>,
}

impl<T: Copy> Property<T> {
    pub(crate) fn new(name: &str, value: T) -> Self {
        Self {
            name: Rc::from(name),
            value: Rc::new(Cell::new(value)),
        }
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub(crate) fn store(&self, value: T) {
        self.value.set(value);
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.value.get())
            .finish()
    }
}

/// Boolean property handle
pub type BoolProperty = Property<bool>;
/// 32-bit integer property handle
pub type IntProperty = Property<i32>;
/// 16-bit integer property handle
pub type ShortProperty = Property<i16>;
/// Double property handle
pub type DoubleProperty = Property<f64>;

/// Handle to a list-of-doubles property (custom curves).
#[derive(Clone)]
pub struct DoubleArrayProperty {
    name: Rc<str>,
    values: Rc<RefCell<Vec<f64>>>,
}

impl DoubleArrayProperty {
    pub(crate) fn new(name: &str, values: &[f64]) -> Self {
        Self {
            name: Rc::from(name),
            values: Rc::new(RefCell::new(values.to_vec())),
        }
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the current values.
    pub fn get(&self) -> Vec<f64> {
        self.values.borrow().clone()
    }

    /// Number of values currently stored.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether the property holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub(crate) fn store(&self, values: Vec<f64>) {
        *self.values.borrow_mut() = values;
    }
}

impl fmt::Debug for DoubleArrayProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleArrayProperty")
            .field("name", &self.name)
            .field("values", &self.values.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let a = Property::new("X", 1i32);
        let b = a.clone();
        a.store(9);
        assert_eq!(b.get(), 9);
        assert_eq!(b.name(), "X");
    }

    #[test]
    fn test_double_array_store() {
        let p = DoubleArrayProperty::new("Curve", &[1.0, 2.0]);
        assert_eq!(p.len(), 2);
        p.store(Vec::new());
        assert!(p.is_empty());
    }
}
