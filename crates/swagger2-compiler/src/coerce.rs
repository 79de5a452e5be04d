//! String coercion for transport parameters (query, header, path).
//!
//! Transport values arrive as strings. Before schema validation, numeric
//! strings become numbers, `"true"`/`"false"` become booleans and delimited
//! strings become arrays, according to the declared parameter type.

use serde_json::{Number, Value};
use swagger2_spec::{CollectionFormat, Parameter};

/// How a scalar value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarCoercion {
    Number,
    Boolean,
    None,
}

impl ScalarCoercion {
    fn for_type(param_type: Option<&str>) -> Self {
        match param_type {
            Some("number") | Some("integer") => ScalarCoercion::Number,
            Some("boolean") => ScalarCoercion::Boolean,
            _ => ScalarCoercion::None,
        }
    }

    fn apply(self, value: Value) -> Value {
        match (self, value) {
            (ScalarCoercion::Number, Value::String(s)) => match parse_number(&s) {
                Some(n) => Value::Number(n),
                None => Value::String(s),
            },
            (ScalarCoercion::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(s),
            },
            (_, other) => other,
        }
    }
}

/// The coercion applied to a parameter value before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Scalar(ScalarCoercion),
    Array {
        format: CollectionFormat,
        items: ScalarCoercion,
    },
}

impl Coercion {
    /// Derive the coercion from a parameter's `type`, `items` and
    /// `collectionFormat`.
    pub fn for_parameter(parameter: &Parameter) -> Self {
        match parameter.param_type.as_deref() {
            Some("array") => Coercion::Array {
                format: parameter.collection_format(),
                items: ScalarCoercion::for_type(parameter.item_type()),
            },
            other => Coercion::Scalar(ScalarCoercion::for_type(other)),
        }
    }

    pub fn apply(&self, value: &Value) -> Value {
        match *self {
            Coercion::Scalar(scalar) => scalar.apply(value.clone()),
            Coercion::Array { format, items } => {
                let elements = match value {
                    Value::Array(elements) => elements.clone(),
                    Value::String(s) => split(s, format),
                    Value::Number(n) => split(&n.to_string(), format),
                    Value::Bool(b) => split(&b.to_string(), format),
                    other => vec![other.clone()],
                };
                Value::Array(elements.into_iter().map(|e| items.apply(e)).collect())
            }
        }
    }
}

/// Coerce a raw transport value for `parameter`.
pub fn coerce(value: &Value, parameter: &Parameter) -> Value {
    Coercion::for_parameter(parameter).apply(value)
}

fn split(s: &str, format: CollectionFormat) -> Vec<Value> {
    match format.delimiter() {
        Some(delimiter) => s.split(delimiter).map(|part| Value::String(part.to_string())).collect(),
        None => vec![Value::String(s.to_string())],
    }
}

/// Parse a numeric string. A blank string reads as zero; non-finite values are
/// not numbers.
///
/// Integral values that fit an `i64` become JSON integers so that `"5"`
/// satisfies `type: integer`.
fn parse_number(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(Number::from(0));
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    let f = trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if f.fract() == 0.0 && f.abs() < 9.2e18 {
        return Some(Number::from(f as i64));
    }
    Number::from_f64(f)
}
