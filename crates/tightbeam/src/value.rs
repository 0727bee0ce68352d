//! Dynamic values: the decoded form of any message.
//!
//! A [`Value`] is a tagged variant over every declarable wire type,
//! and a [`StructValue`] is an ordered map from field id to value.
//! Together they replace runtime type inspection: callers read decoded
//! data through typed accessors with explicit defaulting instead of
//! downcasting language-native containers.
//!
//! Absence is the format's only "null": a field that is not in the
//! `StructValue` is simply not written, and a field missing on the
//! wire is simply not inserted. There is no way to distinguish
//! omitted-because-unset from omitted-because-null once encoded.

use std::collections::BTreeMap;

use tightbeam_wire::TypeTag;

/// One decoded (or to-be-encoded) value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    I16(i16),
    I32(i32),
    I64(i64),
    Float(f32),
    Double(f64),
    Binary(Vec<u8>),
    String(String),
    List(Vec<Value>),
    Set(Vec<Value>),
    /// Entries in wire order. Keys are not required to be unique or
    /// ordered — `Value` has no total order (floats), so imposing one
    /// here would misrepresent what the wire can carry.
    Map(Vec<(Value, Value)>),
    Struct(StructValue),
}

impl Value {
    /// The wire tag this value encodes under.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Bool(_) => TypeTag::Bool,
            Self::Byte(_) => TypeTag::Byte,
            Self::I16(_) => TypeTag::I16,
            Self::I32(_) => TypeTag::I32,
            Self::I64(_) => TypeTag::I64,
            Self::Float(_) => TypeTag::Float,
            Self::Double(_) => TypeTag::Double,
            Self::Binary(_) => TypeTag::Binary,
            Self::String(_) => TypeTag::String,
            Self::List(_) => TypeTag::List,
            Self::Set(_) => TypeTag::Set,
            Self::Map(_) => TypeTag::Map,
            Self::Struct(_) => TypeTag::Struct,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Binary(_) => "binary",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Self::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Self::I16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) | Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Self::Struct(value)
    }
}

/// A struct's present fields, ordered by ascending field id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    fields: BTreeMap<u32, Value>,
}

impl StructValue {
    /// Creates an empty struct value (every field absent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value. Chainable so
    /// message literals read like declarations.
    pub fn with(mut self, id: u32, value: impl Into<Value>) -> Self {
        self.set(id, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, id: u32, value: impl Into<Value>) {
        self.fields.insert(id, value.into());
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, id: u32) -> Option<Value> {
        self.fields.remove(&id)
    }

    /// Raw access to a field's value.
    pub fn get(&self, id: u32) -> Option<&Value> {
        self.fields.get(&id)
    }

    /// True when the field is present.
    pub fn contains(&self, id: u32) -> bool {
        self.fields.contains_key(&id)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates present fields in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.fields.iter().map(|(id, value)| (*id, value))
    }

    // Typed accessors: `None` means absent *or* a different variant.
    // Callers choose their own defaults: `msg.get_i32(2).unwrap_or(0)`.

    pub fn get_bool(&self, id: u32) -> Option<bool> {
        self.get(id).and_then(Value::as_bool)
    }

    pub fn get_byte(&self, id: u32) -> Option<u8> {
        self.get(id).and_then(Value::as_byte)
    }

    pub fn get_i16(&self, id: u32) -> Option<i16> {
        self.get(id).and_then(Value::as_i16)
    }

    pub fn get_i32(&self, id: u32) -> Option<i32> {
        self.get(id).and_then(Value::as_i32)
    }

    pub fn get_i64(&self, id: u32) -> Option<i64> {
        self.get(id).and_then(Value::as_i64)
    }

    pub fn get_float(&self, id: u32) -> Option<f32> {
        self.get(id).and_then(Value::as_float)
    }

    pub fn get_double(&self, id: u32) -> Option<f64> {
        self.get(id).and_then(Value::as_double)
    }

    pub fn get_binary(&self, id: u32) -> Option<&[u8]> {
        self.get(id).and_then(Value::as_binary)
    }

    pub fn get_str(&self, id: u32) -> Option<&str> {
        self.get(id).and_then(Value::as_str)
    }

    pub fn get_list(&self, id: u32) -> Option<&[Value]> {
        self.get(id).and_then(Value::as_list)
    }

    pub fn get_map(&self, id: u32) -> Option<&[(Value, Value)]> {
        self.get(id).and_then(Value::as_map)
    }

    pub fn get_struct(&self, id: u32) -> Option<&StructValue> {
        self.get(id).and_then(Value::as_struct)
    }
}

// =========================================================================
// Tests
// =========================================================================
