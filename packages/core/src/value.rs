//! The universal object type of the accessor protocol.
//!
//! Every typed accessor method defaults to a `Value` round trip, and every
//! member whose declared type is not a primitive fast path travels as one.

use std::collections::BTreeMap;

/// A dynamically-typed tree exchanged with property sources and sinks.
///
/// Integers are carried as `i64` and floats as `f64`; narrower members are
/// range-checked when read back. A `char` is a one-character `String`.
/// Maps are ordered so that two extracted values compare deterministically.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The absent reference.
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Raw bytes, base64 when crossing JSON.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Name of the variant, as reported by conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// The entry under `key` when this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let Value::Map(map) = self else {
            return None;
        };
        map.get(key)
    }

    /// Insert into a map, promoting `Null` to an empty map first.
    ///
    /// Any other variant hands `value` back untouched.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), Value> {
        if self.is_null() {
            *self = Value::map();
        }
        let Value::Map(map) = self else {
            return Err(value);
        };
        map.insert(key.into(), value);
        Ok(())
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Floats, or integers widened to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

macro_rules! widen {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

widen! {
    bool => |b| Value::Bool(b),
    i8 => |i| Value::Integer(i.into()),
    i16 => |i| Value::Integer(i.into()),
    i32 => |i| Value::Integer(i.into()),
    i64 => |i| Value::Integer(i),
    f32 => |f| Value::Float(f.into()),
    f64 => |f| Value::Float(f),
    char => |c| Value::String(c.to_string()),
    String => |s| Value::String(s),
    &str => |s| Value::String(s.to_owned()),
    Vec<u8> => |bytes| Value::Bytes(bytes),
    Vec<Value> => |items| Value::Array(items),
    BTreeMap<String, Value> => |entries| Value::Map(entries),
}
