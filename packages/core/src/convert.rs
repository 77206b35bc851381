//! Bridging between [`Value`] and serde.
//!
//! Members whose declared type is neither a primitive fast path nor `Value`
//! itself are coerced through JSON: `T -> serde_json::Value -> Value` on
//! extract and the reverse on fill.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Number, Value as Json};

use crate::{Error, Value};

/// Deserialize `T` out of a [`Value`].
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(Json::from(value)).map_err(|e| Error::Decode {
        message: e.to_string(),
    })
}

/// Serialize `data` into a [`Value`].
pub fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value, Error> {
    match serde_json::to_value(data) {
        Ok(json) => Ok(Value::from(json)),
        Err(e) => Err(Error::Encode {
            message: e.to_string(),
        }),
    }
}

pub fn value_to_json(value: Value) -> Json {
    value.into()
}

pub fn json_to_value(json: Json) -> Value {
    json.into()
}

/// Non-finite floats have no JSON form and become `null`.
impl From<Value> for Json {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => b.into(),
            Value::Integer(i) => i.into(),
            Value::Float(f) => Number::from_f64(f).map_or(Json::Null, Json::Number),
            Value::String(s) => s.into(),
            Value::Bytes(bytes) => BASE64.encode(bytes).into(),
            Value::Array(items) => items.into_iter().map(Json::from).collect(),
            Value::Map(entries) => {
                Json::Object(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Numbers outside `i64` and `f64` are kept as their decimal text.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(f)) => Value::Float(f),
                (None, None) => Value::String(n.to_string()),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(entries) => {
                Value::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
