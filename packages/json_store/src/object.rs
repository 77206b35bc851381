//! A JSON object map as property source and sink.

use serde_json::{Map, Number, Value as JsonValue};

use beanforge_core::coerce;
use beanforge_core::convert::{json_to_value, value_to_json};
use beanforge_core::{Error, PropertySink, PropertySource, Value};

static NULL: JsonValue = JsonValue::Null;

/// A JSON object read and written by property name.
///
/// Typed reads borrow the stored JSON value and check it in place; only
/// `get_object` converts into a `beanforge_core::Value`. Absent properties
/// read as null unless the object is [`strict`](JsonObject::strict), in
/// which case they fail with `Error::Missing`.
///
/// # Example
///
/// ```rust
/// use beanforge_core::{PropertySink, PropertySource};
/// use beanforge_json::JsonObject;
///
/// let mut object = JsonObject::parse(r#"{"age": 20}"#).unwrap();
/// assert_eq!(object.get_i32("age").unwrap(), 20);
///
/// object.set_string("name", "John").unwrap();
/// assert_eq!(object.to_json_string().unwrap(), r#"{"age":20,"name":"John"}"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonObject {
    map: Map<String, JsonValue>,
    strict: bool,
}

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, JsonValue>) -> Self {
        Self { map, strict: false }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_json(json: JsonValue) -> Result<Self, Error> {
        match json {
            JsonValue::Object(map) => Ok(Self::from_map(map)),
            other => Err(Error::Decode {
                message: format!("expected a JSON object, found {}", kind(&other)),
            }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let json = serde_json::from_str(text).map_err(|e| Error::Decode {
            message: e.to_string(),
        })?;
        Self::from_json(json)
    }

    /// Report absent properties as `Error::Missing` instead of null.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.map
    }

    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.map)
    }

    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.map).map_err(|e| Error::Encode {
            message: e.to_string(),
        })
    }

    fn lookup(&self, property: &str) -> Result<&JsonValue, Error> {
        match self.map.get(property) {
            Some(value) => Ok(value),
            None if self.strict => Err(Error::Missing {
                property: property.to_string(),
            }),
            None => Ok(&NULL),
        }
    }

    fn integer<N: TryFrom<i64>>(&self, property: &str, expected: &str) -> Result<N, Error> {
        let json = self.lookup(property)?;
        let i = json
            .as_i64()
            .ok_or_else(|| Error::conversion(property, expected, kind(json)))?;
        N::try_from(i)
            .map_err(|_| Error::conversion(property, expected, format!("integer {} out of range", i)))
    }

    fn float(&self, property: &str, expected: &str) -> Result<f64, Error> {
        let json = self.lookup(property)?;
        json.as_f64()
            .ok_or_else(|| Error::conversion(property, expected, kind(json)))
    }

    fn put(&mut self, property: &str, json: JsonValue) -> Result<(), Error> {
        self.map.insert(property.to_string(), json);
        Ok(())
    }
}

fn kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn float_json(f: f64) -> JsonValue {
    Number::from_f64(f)
        .map(JsonValue::Number)
        .unwrap_or_else(|| {
            log::warn!("non-finite float {} written as null", f);
            JsonValue::Null
        })
}

impl PropertySource for JsonObject {
    fn get_object(&mut self, property: &str) -> Result<Value, Error> {
        self.lookup(property).cloned().map(json_to_value)
    }

    fn get_i8(&mut self, property: &str) -> Result<i8, Error> {
        self.integer(property, "i8")
    }

    fn get_i16(&mut self, property: &str) -> Result<i16, Error> {
        self.integer(property, "i16")
    }

    fn get_i32(&mut self, property: &str) -> Result<i32, Error> {
        self.integer(property, "i32")
    }

    fn get_i64(&mut self, property: &str) -> Result<i64, Error> {
        self.integer(property, "i64")
    }

    fn get_f32(&mut self, property: &str) -> Result<f32, Error> {
        let f = self.float(property, "f32")?;
        coerce::narrow_f32(property, f)
    }

    fn get_f64(&mut self, property: &str) -> Result<f64, Error> {
        self.float(property, "f64")
    }

    fn get_bool(&mut self, property: &str) -> Result<bool, Error> {
        let json = self.lookup(property)?;
        json.as_bool()
            .ok_or_else(|| Error::conversion(property, "bool", kind(json)))
    }

    fn get_char(&mut self, property: &str) -> Result<char, Error> {
        let json = self.lookup(property)?;
        let s = json
            .as_str()
            .ok_or_else(|| Error::conversion(property, "char", kind(json)))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::conversion(
                property,
                "char",
                format!("string of length {}", s.chars().count()),
            )),
        }
    }

    fn get_string(&mut self, property: &str) -> Result<String, Error> {
        let json = self.lookup(property)?;
        json.as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::conversion(property, "string", kind(json)))
    }
}

impl PropertySink for JsonObject {
    fn set_object(&mut self, property: &str, value: Value) -> Result<(), Error> {
        self.put(property, value_to_json(value))
    }

    fn set_i8(&mut self, property: &str, value: i8) -> Result<(), Error> {
        self.put(property, JsonValue::from(value))
    }

    fn set_i16(&mut self, property: &str, value: i16) -> Result<(), Error> {
        self.put(property, JsonValue::from(value))
    }

    fn set_i32(&mut self, property: &str, value: i32) -> Result<(), Error> {
        self.put(property, JsonValue::from(value))
    }

    fn set_i64(&mut self, property: &str, value: i64) -> Result<(), Error> {
        self.put(property, JsonValue::from(value))
    }

    fn set_f32(&mut self, property: &str, value: f32) -> Result<(), Error> {
        self.put(property, float_json(value as f64))
    }

    fn set_f64(&mut self, property: &str, value: f64) -> Result<(), Error> {
        self.put(property, float_json(value))
    }

    fn set_bool(&mut self, property: &str, value: bool) -> Result<(), Error> {
        self.put(property, JsonValue::Bool(value))
    }

    fn set_char(&mut self, property: &str, value: char) -> Result<(), Error> {
        self.put(property, JsonValue::String(value.to_string()))
    }

    fn set_string(&mut self, property: &str, value: &str) -> Result<(), Error> {
        self.put(property, JsonValue::String(value.to_string()))
    }
}
