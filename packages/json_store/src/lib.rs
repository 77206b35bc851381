//! JSON objects as beanforge property sources and sinks.
//!
//! [`JsonObject`] wraps a `serde_json` object map and reads or writes
//! properties by name with typed fast paths. [`from_str`] and [`to_string`]
//! combine it with the compiled converter of a type.

mod object;

pub use object::JsonObject;

use beanforge_compiler::compile;
use beanforge_core::{Describe, Error};

/// Parse a JSON object and fill a new `T` from it.
pub fn from_str<T: Describe>(text: &str) -> Result<T, Error> {
    let converter = compile::<T>()?;
    let mut object = JsonObject::parse(text)?;
    converter
        .create_from(&mut object)?
        .ok_or_else(|| Error::other(format!("{} has no constructor", converter.type_name())))
}

/// Extract `value` into a JSON object and serialize it.
pub fn to_string<T: Describe>(value: &T) -> Result<String, Error> {
    let converter = compile::<T>()?;
    let mut object = JsonObject::new();
    converter.extract(value, &mut object)?;
    object.to_json_string()
}
