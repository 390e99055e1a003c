//! Typed property values and change records

use std::fmt;

/// A scalar property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropValue {
    /// Boolean property
    Bool(bool),
    /// 32-bit integer property
    Int(i32),
    /// 16-bit integer property
    Short(i16),
    /// Double precision property
    Double(f64),
}

impl PropValue {
    /// Name of the value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Short(_) => "short",
            PropValue::Double(_) => "double",
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(v) => write!(f, "{v}"),
            PropValue::Int(v) => write!(f, "{v}"),
            PropValue::Short(v) => write!(f, "{v}"),
            PropValue::Double(v) => write!(f, "{v}"),
        }
    }
}

/// A named property write, in append order.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChangeRecord {
    /// Property name, unique within the registry
    pub name: String,
    /// Written value
    pub value: PropValue,
}

impl PropertyChangeRecord {
    /// Create a change record.
    pub fn new(name: impl Into<String>, value: PropValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for PropertyChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.name, self.value, self.value.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_record_display() {
        let record = PropertyChangeRecord::new("Pointer Sensitivity", PropValue::Int(4));
        insta::assert_snapshot!(record.to_string(), @"Pointer Sensitivity = 4 (int)");
    }
}
