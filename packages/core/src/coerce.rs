//! Default coercions from `Value` to the primitive fast-path types.
//!
//! These back the default typed getters of `PropertySource`. Sources that
//! hold values by reference can call them on a borrowed `Value` to skip
//! the clone `get_object` implies.

use crate::{Error, Value};

fn integer<N: TryFrom<i64>>(property: &str, value: &Value, expected: &str) -> Result<N, Error> {
    match value {
        Value::Integer(i) => N::try_from(*i)
            .map_err(|_| Error::conversion(property, expected, format!("integer {} out of range", i))),
        other => Err(Error::conversion(property, expected, other.kind())),
    }
}

pub fn to_i8(property: &str, value: &Value) -> Result<i8, Error> {
    integer(property, value, "i8")
}

pub fn to_i16(property: &str, value: &Value) -> Result<i16, Error> {
    integer(property, value, "i16")
}

pub fn to_i32(property: &str, value: &Value) -> Result<i32, Error> {
    integer(property, value, "i32")
}

pub fn to_i64(property: &str, value: &Value) -> Result<i64, Error> {
    integer(property, value, "i64")
}

/// Integers widen into floats; anything else is rejected.
pub fn to_f64(property: &str, value: &Value) -> Result<f64, Error> {
    value
        .as_f64()
        .ok_or_else(|| Error::conversion(property, "f64", value.kind()))
}

pub fn to_f32(property: &str, value: &Value) -> Result<f32, Error> {
    let f = value
        .as_f64()
        .ok_or_else(|| Error::conversion(property, "f32", value.kind()))?;
    narrow_f32(property, f)
}

/// Narrow an `f64` to `f32`. Finite values beyond the `f32` range are
/// rejected; infinities and NaN pass through unchanged.
pub fn narrow_f32(property: &str, f: f64) -> Result<f32, Error> {
    let narrowed = f as f32;
    if f.is_finite() && narrowed.is_infinite() {
        return Err(Error::conversion(property, "f32", format!("float {} out of range", f)));
    }
    Ok(narrowed)
}

pub fn to_bool(property: &str, value: &Value) -> Result<bool, Error> {
    value
        .as_bool()
        .ok_or_else(|| Error::conversion(property, "bool", value.kind()))
}

/// A char travels as a string of exactly one character.
pub fn to_char(property: &str, value: &Value) -> Result<char, Error> {
    let Value::String(s) = value else {
        return Err(Error::conversion(property, "char", value.kind()));
    };
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

pub fn to_string(property: &str, value: Value) -> Result<String, Error> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::conversion(property, "string", other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(to_i8("p", &Value::Integer(-128)).unwrap(), -128);
        assert!(to_i8("p", &Value::Integer(128)).unwrap_err().is_conversion());
        assert_eq!(to_i16("p", &Value::Integer(300)).unwrap(), 300);
        assert!(to_i32("p", &Value::Integer(i64::MAX)).is_err());
        assert_eq!(to_i64("p", &Value::Integer(i64::MIN)).unwrap(), i64::MIN);
    }

    #[test]
    fn integers_reject_other_kinds() {
        let err = to_i32("age", &Value::from("20")).unwrap_err();
        match err {
            Error::Conversion {
                property,
                expected,
                found,
            } => {
                assert_eq!(property, "age");
                assert_eq!(expected, "i32");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(to_i64("p", &Value::Float(1.0)).is_err());
        assert!(to_i64("p", &Value::Null).is_err());
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(to_f64("p", &Value::Integer(2)).unwrap(), 2.0);
        assert_eq!(to_f32("p", &Value::Float(0.5)).unwrap(), 0.5);
        assert!(to_f64("p", &Value::Bool(true)).is_err());
    }

    #[test]
    fn f32_rejects_finite_values_beyond_its_range() {
        let err = to_f32("ratio", &Value::Float(1e300)).unwrap_err();
        assert!(err.is_conversion());
        assert!(to_f32("ratio", &Value::Float(-1e39)).is_err());
        assert!(to_f32("ratio", &Value::Integer(i64::MAX)).is_ok());
        assert_eq!(to_f32("ratio", &Value::Float(f64::from(f32::MAX))).unwrap(), f32::MAX);
        assert!(to_f32("ratio", &Value::Float(f64::INFINITY)).unwrap().is_infinite());
    }

    #[test]
    fn chars_need_exactly_one_character() {
        assert_eq!(to_char("p", &Value::from("x")).unwrap(), 'x');
        assert_eq!(to_char("p", &Value::from("é")).unwrap(), 'é');
        assert!(to_char("p", &Value::from("")).is_err());
        assert!(to_char("p", &Value::from("xy")).is_err());
        assert!(to_char("p", &Value::Integer(65)).is_err());
    }

    #[test]
    fn strings_and_bools() {
        assert_eq!(to_string("p", Value::from("hi")).unwrap(), "hi");
        assert!(to_string("p", Value::Null).is_err());
        assert!(to_bool("p", &Value::Bool(false)).map(|b| !b).unwrap());
        assert!(to_bool("p", &Value::Integer(0)).is_err());
    }
}
