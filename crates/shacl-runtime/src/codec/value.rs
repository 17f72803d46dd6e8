//! Primitive value codecs.
//!
//! Stateless conversions between JSON values and the scalar kinds a property
//! can hold. Errors carry the path of the value being decoded.

use serde_json::{Number, Value};

use crate::error::{DecodeError, DecodeErrorKind};
use crate::model::{Context, Path};
use crate::util::{is_blank_node, is_iri, parse_datetime, parse_datetime_stamp, DateTime};

/// Name of a JSON value's type, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// DECODING
// =============================================================================

pub fn decode_string(value: &Value, path: &Path) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(DecodeError::new(
            path,
            DecodeErrorKind::ExpectedString {
                found: json_type_name(other),
            },
        )),
    }
}

pub fn decode_boolean(value: &Value, path: &Path) -> Result<bool, DecodeError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(DecodeError::new(
            path,
            DecodeErrorKind::ExpectedBoolean {
                found: json_type_name(other),
            },
        )),
    }
}

/// Decodes an integer. Integral floating-point numbers are accepted.
pub fn decode_integer(value: &Value, path: &Path) -> Result<i64, DecodeError> {
    let number = match value {
        Value::Number(n) => n,
        other => {
            return Err(DecodeError::new(
                path,
                DecodeErrorKind::ExpectedInteger {
                    found: json_type_name(other),
                },
            ));
        }
    };

    if let Some(i) = number.as_i64() {
        return Ok(i);
    }

    let f = number.as_f64().unwrap_or(f64::NAN);
    // The upper bound is exclusive: i64::MAX rounds up to 2^63 as a float.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(DecodeError::new(path, DecodeErrorKind::NotAnInteger { value: f }))
    }
}

/// Decodes a float from a number or from its decimal text form.
pub fn decode_float(value: &Value, path: &Path) -> Result<f64, DecodeError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            DecodeError::new(
                path,
                DecodeErrorKind::InvalidFloat {
                    value: n.to_string(),
                },
            )
        }),
        Value::String(s) => s.parse::<f64>().map_err(|_| {
            DecodeError::new(path, DecodeErrorKind::InvalidFloat { value: s.clone() })
        }),
        other => Err(DecodeError::new(
            path,
            DecodeErrorKind::ExpectedFloat {
                found: json_type_name(other),
            },
        )),
    }
}

/// Decodes an IRI, expanding compact tokens through `context`.
///
/// The result must be IRI- or blank-node-shaped.
pub fn decode_iri(value: &Value, path: &Path, context: &Context) -> Result<String, DecodeError> {
    let s = decode_string(value, path)?;
    let iri = context.expand(&s);
    if is_iri(iri) || is_blank_node(iri) {
        Ok(iri.to_string())
    } else {
        Err(DecodeError::new(
            path,
            DecodeErrorKind::NotIriOrBlank {
                value: iri.to_string(),
            },
        ))
    }
}

fn decode_datetime_with(
    value: &Value,
    path: &Path,
    parse: fn(&str) -> Result<DateTime, crate::util::DateTimeParseError>,
) -> Result<DateTime, DecodeError> {
    let s = decode_string(value, path)?;
    parse(&s).map_err(|e| DecodeError::new(path, DecodeErrorKind::InvalidDateTime { value: e.value }))
}

/// Decodes an `xsd:dateTime` literal.
pub fn decode_datetime(value: &Value, path: &Path) -> Result<DateTime, DecodeError> {
    decode_datetime_with(value, path, parse_datetime)
}

/// Decodes an `xsd:dateTimeStamp` literal.
pub fn decode_datetime_stamp(value: &Value, path: &Path) -> Result<DateTime, DecodeError> {
    decode_datetime_with(value, path, parse_datetime_stamp)
}

/// Decodes every element of a list with `decode`, failing on the first error.
///
/// Element `idx` is decoded at `path.[idx]`.
pub fn decode_list<T>(
    value: &Value,
    path: &Path,
    mut decode: impl FnMut(&Value, &Path) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::new(
                path,
                DecodeErrorKind::ExpectedList {
                    found: json_type_name(other),
                },
            ));
        }
    };

    let mut result = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        result.push(decode(item, &path.push_index(idx))?);
    }
    Ok(result)
}

// =============================================================================
// ENCODING
// =============================================================================

pub fn encode_string(value: &str) -> Value {
    Value::String(value.to_string())
}

pub fn encode_boolean(value: bool) -> Value {
    Value::Bool(value)
}

pub fn encode_integer(value: i64) -> Value {
    Value::Number(Number::from(value))
}

/// Floats are written as decimal text, never in exponent form.
pub fn encode_float(value: f64) -> Value {
    Value::String(format_float(value))
}

/// Shortest decimal text that reads back as the same `f64`.
pub fn format_float(value: f64) -> String {
    format!("{}", value)
}

/// Compacts an IRI through `context`.
pub fn encode_iri(value: &str, context: &Context) -> Value {
    Value::String(context.compact(value).to_string())
}

pub fn encode_datetime(value: &DateTime) -> Value {
    Value::String(value.to_string())
}

pub fn encode_list<T>(values: &[T], mut encode: impl FnMut(&T) -> Value) -> Value {
    Value::Array(values.iter().map(|v| encode(v)).collect())
}
