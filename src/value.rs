//! Conversions between field values and generic tree values.
//!
//! [`EntryValue`] is the scalar-coercion layer shared by plain fields and
//! entry wrappers: it maps a Rust value to a [`toml::Value`] and back, with
//! fixed narrowing rules for the types a TOML document cannot represent
//! directly (TOML integers are `i64`, TOML floats are `f64`). A tree value
//! whose shape doesn't fit yields `None`, and callers keep the field's prior
//! value instead of failing the whole document.
//!
//! [`ConfigEnum`] is the contract for enumerated field values: a declared
//! variant list, a canonical name per variant, and case-exact lookup.

use std::collections::BTreeMap;

use toml::Value;

/// A value that can live in a config field or entry wrapper and cross the
/// tree boundary in both directions.
pub trait EntryValue: Clone + PartialEq {
    /// Render this value as a generic tree node.
    fn to_tree(&self) -> Value;

    /// Read a value of this type back out of a tree node.
    ///
    /// Returns `None` when the node's shape doesn't match; callers treat that
    /// as "keep the previous value", never as a hard error.
    fn from_tree(raw: &Value) -> Option<Self>;
}

impl EntryValue for bool {
    fn to_tree(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_bool()
    }
}

impl EntryValue for i64 {
    fn to_tree(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_integer()
    }
}

impl EntryValue for i32 {
    fn to_tree(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    // Tree integers are i64; narrow with a truncating cast.
    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_integer().map(|i| i as i32)
    }
}

impl EntryValue for i16 {
    fn to_tree(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_integer().map(|i| i as i16)
    }
}

impl EntryValue for f64 {
    fn to_tree(&self) -> Value {
        Value::Float(*self)
    }

    /// Accepts tree integers too, so `ratio = 1` reads into a float field.
    fn from_tree(raw: &Value) -> Option<Self> {
        match raw {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl EntryValue for f32 {
    fn to_tree(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    // Tree floats are f64; narrow with a truncating cast.
    fn from_tree(raw: &Value) -> Option<Self> {
        f64::from_tree(raw).map(|f| f as f32)
    }
}

impl EntryValue for String {
    fn to_tree(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_str().map(str::to_owned)
    }
}

impl<T: EntryValue> EntryValue for Vec<T> {
    fn to_tree(&self) -> Value {
        Value::Array(self.iter().map(EntryValue::to_tree).collect())
    }

    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_array()?.iter().map(T::from_tree).collect()
    }
}

impl<T: EntryValue> EntryValue for BTreeMap<String, T> {
    fn to_tree(&self) -> Value {
        Value::Table(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_tree()))
                .collect(),
        )
    }

    fn from_tree(raw: &Value) -> Option<Self> {
        raw.as_table()?
            .iter()
            .map(|(key, value)| Some((key.clone(), T::from_tree(value)?)))
            .collect()
    }
}

/// An enumerated config value: declared variants, canonical names, and
/// case-exact lookup by name.
pub trait ConfigEnum: Copy + PartialEq + 'static {
    /// All variants, in declaration order. Must be non-empty.
    fn variants() -> &'static [Self];

    /// The canonical string form of this variant.
    fn name(&self) -> &'static str;

    /// Case-exact lookup. `None` when no variant carries this name.
    fn from_name(name: &str) -> Option<Self> {
        Self::variants().iter().copied().find(|v| v.name() == name)
    }
}
