//! Value data and value metadata.
//!
//! This module provides:
//! - [`ValueData`] - The dynamic datum a value holds
//! - [`Value`] - A typed, addressed setting with its metadata

use serde::{Deserialize, Serialize};

use crate::{ValueError, ValueGenre, ValueId, ValueResult, ValueType};

// ============================================================================
// Value Data
// ============================================================================

/// The datum held by a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueData {
    /// Boolean flag.
    Bool(bool),
    /// 8-bit unsigned integer.
    Byte(u8),
    /// 16-bit signed integer.
    Short(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// Text.
    String(String),
}

impl ValueData {
    /// The type tag matching this datum.
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueData::Bool(_) => ValueType::Bool,
            ValueData::Byte(_) => ValueType::Byte,
            ValueData::Short(_) => ValueType::Short,
            ValueData::Int(_) => ValueType::Int,
            ValueData::String(_) => ValueType::String,
        }
    }

    /// The zero datum for a type.
    pub fn default_for(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Bool => ValueData::Bool(false),
            ValueType::Byte => ValueData::Byte(0),
            ValueType::Short => ValueData::Short(0),
            ValueType::Int => ValueData::Int(0),
            ValueType::String => ValueData::String(String::new()),
        }
    }

    /// Convert to u8 if this is a byte.
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            ValueData::Byte(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to bool if this is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ValueData::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of integer data.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValueData::Byte(v) => Some(i64::from(*v)),
            ValueData::Short(v) => Some(i64::from(*v)),
            ValueData::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Convert to string if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueData::String(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for ValueData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueData::Bool(v) => write!(f, "{}", v),
            ValueData::Byte(v) => write!(f, "{}", v),
            ValueData::Short(v) => write!(f, "{}", v),
            ValueData::Int(v) => write!(f, "{}", v),
            ValueData::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ValueData {
    fn from(v: bool) -> Self {
        ValueData::Bool(v)
    }
}

impl From<u8> for ValueData {
    fn from(v: u8) -> Self {
        ValueData::Byte(v)
    }
}

impl From<i16> for ValueData {
    fn from(v: i16) -> Self {
        ValueData::Short(v)
    }
}

impl From<i32> for ValueData {
    fn from(v: i32) -> Self {
        ValueData::Int(v)
    }
}

impl From<String> for ValueData {
    fn from(v: String) -> Self {
        ValueData::String(v)
    }
}

impl From<&str> for ValueData {
    fn from(v: &str) -> Self {
        ValueData::String(v.to_string())
    }
}

// ============================================================================
// Value
// ============================================================================

/// A typed, addressed, cached setting mirroring device state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    id: ValueId,
    value_type: ValueType,
    genre: ValueGenre,
    label: String,
    units: String,
    read_only: bool,
    write_only: bool,
    min: i64,
    max: i64,
    data: ValueData,
    is_set: bool,
}

impl Value {
    /// Create a value of the given type holding its zero datum.
    pub fn new(id: ValueId, value_type: ValueType, genre: ValueGenre, label: impl Into<String>) -> Self {
        let (min, max) = match value_type {
            ValueType::Bool => (0, 1),
            ValueType::Byte => (0, i64::from(u8::MAX)),
            ValueType::Short => (i64::from(i16::MIN), i64::from(i16::MAX)),
            ValueType::Int => (i64::from(i32::MIN), i64::from(i32::MAX)),
            ValueType::String => (0, 0),
        };
        Self {
            id,
            value_type,
            genre,
            label: label.into(),
            units: String::new(),
            read_only: false,
            write_only: false,
            min,
            max,
            data: ValueData::default_for(value_type),
            is_set: false,
        }
    }

    /// Create an 8-bit unsigned value spanning 0..=255.
    pub fn byte(id: ValueId, genre: ValueGenre, label: impl Into<String>) -> Self {
        Self::new(id, ValueType::Byte, genre, label)
    }

    /// Set the units string.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Mark the value read-only.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Mark the value write-only.
    pub fn with_write_only(mut self, write_only: bool) -> Self {
        self.write_only = write_only;
        self
    }

    /// Narrow the numeric bounds.
    pub fn with_bounds(mut self, min: i64, max: i64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// The value's id.
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// The declared type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The genre.
    pub fn genre(&self) -> ValueGenre {
        self.genre
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Units string (may be empty).
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Whether the application may not write this value.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the device never reports this value.
    pub fn is_write_only(&self) -> bool {
        self.write_only
    }

    /// Lower bound.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// The last known datum.
    pub fn data(&self) -> &ValueData {
        &self.data
    }

    /// Whether a report has ever populated this value.
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    /// Check that `data` has this value's type and fits its bounds.
    pub fn check(&self, data: &ValueData) -> ValueResult<()> {
        if data.value_type() != self.value_type {
            return Err(ValueError::TypeMismatch {
                id: self.id,
                expected: self.value_type,
                actual: data.value_type(),
            });
        }
        if let Some(n) = data.as_i64() {
            if n < self.min || n > self.max {
                return Err(ValueError::OutOfRange {
                    id: self.id,
                    value: n,
                    min: self.min,
                    max: self.max,
                });
            }
        }
        Ok(())
    }

    /// Build the candidate value for an application write.
    ///
    /// The returned copy carries `data`; `self` is left untouched because the
    /// stored datum only changes when the device reports back.
    pub fn prepare_set(&self, data: ValueData) -> ValueResult<Value> {
        if self.read_only {
            return Err(ValueError::ReadOnly(self.id));
        }
        self.check(&data)?;
        let mut candidate = self.clone();
        candidate.data = data;
        Ok(candidate)
    }

    /// Store data reported by the device and mark the value set.
    ///
    /// Returns whether the datum changed.
    pub fn on_value_refreshed(&mut self, data: ValueData) -> ValueResult<bool> {
        if data.value_type() != self.value_type {
            return Err(ValueError::TypeMismatch {
                id: self.id,
                expected: self.value_type,
                actual: data.value_type(),
            });
        }
        let changed = !self.is_set || self.data != data;
        self.data = data;
        self.is_set = true;
        Ok(changed)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_set {
            write!(f, "{} = {}", self.label, self.data)?;
        } else {
            write!(f, "{} = <unset>", self.label)?;
        }
        if !self.units.is_empty() {
            write!(f, " {}", self.units)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_value() -> Value {
        Value::byte(ValueId::new(1, 5, 1, 0x2D, 4), ValueGenre::System, "Button 2 Scene Id")
    }

    #[test]
    fn test_byte_value_defaults() {
        let value = scene_value();
        assert_eq!(value.value_type(), ValueType::Byte);
        assert_eq!(value.data(), &ValueData::Byte(0));
        assert_eq!(value.min(), 0);
        assert_eq!(value.max(), 255);
        assert!(!value.is_set());
        assert!(!value.is_read_only());
    }

    #[test]
    fn test_on_value_refreshed() {
        let mut value = scene_value();
        assert_eq!(value.on_value_refreshed(ValueData::Byte(7)), Ok(true));
        assert!(value.is_set());
        assert_eq!(value.data().as_u8(), Some(7));

        // Same datum again is accepted but is not a change
        assert_eq!(value.on_value_refreshed(ValueData::Byte(7)), Ok(false));
        assert_eq!(value.on_value_refreshed(ValueData::Byte(9)), Ok(true));
    }

    #[test]
    fn test_first_refresh_counts_as_change() {
        let mut value = scene_value();
        // Zero is the default datum but the value was never set
        assert_eq!(value.on_value_refreshed(ValueData::Byte(0)), Ok(true));
    }

    #[test]
    fn test_refresh_rejects_wrong_type() {
        let mut value = scene_value();
        let err = value.on_value_refreshed(ValueData::Bool(true)).unwrap_err();
        assert!(matches!(err, ValueError::TypeMismatch { .. }));
        assert!(!value.is_set());
    }

    #[test]
    fn test_prepare_set_leaves_original() {
        let value = scene_value();
        let candidate = value.prepare_set(ValueData::Byte(12)).unwrap();
        assert_eq!(candidate.data().as_u8(), Some(12));
        assert_eq!(value.data().as_u8(), Some(0));
    }

    #[test]
    fn test_prepare_set_checks() {
        let value = scene_value().with_bounds(1, 10);
        assert!(matches!(
            value.prepare_set(ValueData::Byte(11)),
            Err(ValueError::OutOfRange { value: 11, .. })
        ));
        assert!(matches!(
            value.prepare_set(ValueData::Short(3)),
            Err(ValueError::TypeMismatch { .. })
        ));

        let read_only = scene_value().with_read_only(true);
        assert!(matches!(
            read_only.prepare_set(ValueData::Byte(1)),
            Err(ValueError::ReadOnly(_))
        ));
    }

    #[test]
    fn test_display() {
        let mut value = scene_value().with_units("s");
        assert_eq!(value.to_string(), "Button 2 Scene Id = <unset> s");
        value.on_value_refreshed(ValueData::Byte(3)).unwrap();
        assert_eq!(value.to_string(), "Button 2 Scene Id = 3 s");
    }

    #[test]
    fn test_value_serializes_to_json() {
        let mut value = scene_value();
        value.on_value_refreshed(ValueData::Byte(5)).unwrap();
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["label"], "Button 2 Scene Id");
        assert_eq!(json["value_type"], "byte");
        assert_eq!(json["data"], 5);
        assert_eq!(json["id"]["index"], 4);
    }
}
