//! The accessor protocol: PropertySource and PropertySink.
//!
//! A source answers typed by-name reads, a sink accepts typed by-name
//! writes. Only the generic `get_object` / `set_object` methods are
//! mandatory; every typed method defaults to the generic one plus a
//! coercion, so a minimal implementor stays correct, merely slower.
//! Implementors override the typed methods that matter on their hot path.

use std::collections::{BTreeMap, HashMap};

use crate::{coerce, Error, Value};

/// By-name typed reads, used by `fill`.
///
/// # Object Safety
///
/// This trait is object-safe: converters take `&mut dyn PropertySource`.
pub trait PropertySource {
    /// Read a property as a `Value`. Absent properties read as `Value::Null`
    /// unless the source reports `Error::Missing`.
    fn get_object(&mut self, property: &str) -> Result<Value, Error>;

    fn get_i8(&mut self, property: &str) -> Result<i8, Error> {
        coerce::to_i8(property, &self.get_object(property)?)
    }

    fn get_i16(&mut self, property: &str) -> Result<i16, Error> {
        coerce::to_i16(property, &self.get_object(property)?)
    }

    fn get_i32(&mut self, property: &str) -> Result<i32, Error> {
        coerce::to_i32(property, &self.get_object(property)?)
    }

    fn get_i64(&mut self, property: &str) -> Result<i64, Error> {
        coerce::to_i64(property, &self.get_object(property)?)
    }

    fn get_f32(&mut self, property: &str) -> Result<f32, Error> {
        coerce::to_f32(property, &self.get_object(property)?)
    }

    fn get_f64(&mut self, property: &str) -> Result<f64, Error> {
        coerce::to_f64(property, &self.get_object(property)?)
    }

    fn get_bool(&mut self, property: &str) -> Result<bool, Error> {
        coerce::to_bool(property, &self.get_object(property)?)
    }

    fn get_char(&mut self, property: &str) -> Result<char, Error> {
        coerce::to_char(property, &self.get_object(property)?)
    }

    fn get_string(&mut self, property: &str) -> Result<String, Error> {
        coerce::to_string(property, self.get_object(property)?)
    }
}

/// By-name typed writes, used by `extract`.
///
/// # Object Safety
///
/// This trait is object-safe: converters take `&mut dyn PropertySink`.
pub trait PropertySink {
    /// Write a property as a `Value`.
    fn set_object(&mut self, property: &str, value: Value) -> Result<(), Error>;

    fn set_i8(&mut self, property: &str, value: i8) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_i16(&mut self, property: &str, value: i16) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_i32(&mut self, property: &str, value: i32) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_i64(&mut self, property: &str, value: i64) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_f32(&mut self, property: &str, value: f32) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_f64(&mut self, property: &str, value: f64) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_bool(&mut self, property: &str, value: bool) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_char(&mut self, property: &str, value: char) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }

    fn set_string(&mut self, property: &str, value: &str) -> Result<(), Error> {
        self.set_object(property, Value::from(value))
    }
}

// Blanket implementations for references and boxes. Every method is
// forwarded so the inner type's fast paths survive the indirection.

macro_rules! forward_source {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            fn $method(&mut self, property: &str) -> Result<$ty, Error> {
                (**self).$method(property)
            }
        )*
    };
}

macro_rules! forward_sink {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(&mut self, property: &str, value: $ty) -> Result<(), Error> {
                (**self).$method(property, value)
            }
        )*
    };
}

impl<S: PropertySource + ?Sized> PropertySource for &mut S {
    forward_source!(
        get_object -> Value, get_i8 -> i8, get_i16 -> i16, get_i32 -> i32, get_i64 -> i64,
        get_f32 -> f32, get_f64 -> f64, get_bool -> bool, get_char -> char, get_string -> String,
    );
}

impl<S: PropertySource + ?Sized> PropertySource for Box<S> {
    forward_source!(
        get_object -> Value, get_i8 -> i8, get_i16 -> i16, get_i32 -> i32, get_i64 -> i64,
        get_f32 -> f32, get_f64 -> f64, get_bool -> bool, get_char -> char, get_string -> String,
    );
}

impl<S: PropertySink + ?Sized> PropertySink for &mut S {
    forward_sink!(
        set_object(Value), set_i8(i8), set_i16(i16), set_i32(i32), set_i64(i64),
        set_f32(f32), set_f64(f64), set_bool(bool), set_char(char), set_string(&str),
    );
}

impl<S: PropertySink + ?Sized> PropertySink for Box<S> {
    forward_sink!(
        set_object(Value), set_i8(i8), set_i16(i16), set_i32(i32), set_i64(i64),
        set_f32(f32), set_f64(f64), set_bool(bool), set_char(char), set_string(&str),
    );
}

// Maps read by reference: the typed getters coerce the borrowed value and
// only `get_object` / `get_string` clone.

static NULL: Value = Value::Null;

macro_rules! borrowed_source {
    ($map:ty) => {
        impl PropertySource for $map {
            fn get_object(&mut self, property: &str) -> Result<Value, Error> {
                Ok(self.get(property).cloned().unwrap_or_default())
            }

            fn get_i8(&mut self, property: &str) -> Result<i8, Error> {
                coerce::to_i8(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_i16(&mut self, property: &str) -> Result<i16, Error> {
                coerce::to_i16(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_i32(&mut self, property: &str) -> Result<i32, Error> {
                coerce::to_i32(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_i64(&mut self, property: &str) -> Result<i64, Error> {
                coerce::to_i64(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_f32(&mut self, property: &str) -> Result<f32, Error> {
                coerce::to_f32(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_f64(&mut self, property: &str) -> Result<f64, Error> {
                coerce::to_f64(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_bool(&mut self, property: &str) -> Result<bool, Error> {
                coerce::to_bool(property, self.get(property).unwrap_or(&NULL))
            }

            fn get_char(&mut self, property: &str) -> Result<char, Error> {
                coerce::to_char(property, self.get(property).unwrap_or(&NULL))
            }
        }
    };
}

borrowed_source!(BTreeMap<String, Value>);
borrowed_source!(HashMap<String, Value>);

impl PropertySink for BTreeMap<String, Value> {
    fn set_object(&mut self, property: &str, value: Value) -> Result<(), Error> {
        self.insert(property.to_string(), value);
        Ok(())
    }
}

impl PropertySink for HashMap<String, Value> {
    fn set_object(&mut self, property: &str, value: Value) -> Result<(), Error> {
        self.insert(property.to_string(), value);
        Ok(())
    }
}

impl PropertySource for Value {
    fn get_object(&mut self, property: &str) -> Result<Value, Error> {
        match self {
            Value::Map(map) => map.get_object(property),
            Value::Null => Ok(Value::Null),
            other => Err(Error::other(format!(
                "cannot read property '{}' from a {} value",
                property,
                other.kind()
            ))),
        }
    }
}

impl PropertySink for Value {
    fn set_object(&mut self, property: &str, value: Value) -> Result<(), Error> {
        let kind = self.kind();
        self.insert(property, value).map_err(|_| {
            Error::other(format!(
                "cannot write property '{}' into a {} value",
                property, kind
            ))
        })
    }
}

/// A source backed by a closure, see [`source_fn`].
pub struct FnSource<F>(F);

/// Build a source from `FnMut(&str) -> Result<Value, Error>`.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use beanforge_core::{source_fn, PropertySource, Value};
///
/// let data = BTreeMap::from([("age".to_string(), Value::from(20))]);
/// let mut source = source_fn(|p| Ok(data.get(p).cloned().unwrap_or_default()));
/// assert_eq!(source.get_i32("age").unwrap(), 20);
/// ```
pub fn source_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut(&str) -> Result<Value, Error>,
{
    FnSource(f)
}

impl<F> PropertySource for FnSource<F>
where
    F: FnMut(&str) -> Result<Value, Error>,
{
    fn get_object(&mut self, property: &str) -> Result<Value, Error> {
        (self.0)(property)
    }
}

/// A sink backed by a closure, see [`sink_fn`].
pub struct FnSink<F>(F);

/// Build a sink from `FnMut(&str, Value) -> Result<(), Error>`.
pub fn sink_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(&str, Value) -> Result<(), Error>,
{
    FnSink(f)
}

impl<F> PropertySink for FnSink<F>
where
    F: FnMut(&str, Value) -> Result<(), Error>,
{
    fn set_object(&mut self, property: &str, value: Value) -> Result<(), Error> {
        (self.0)(property, value)
    }
}
