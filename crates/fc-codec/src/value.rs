//! The tagged value union for record fields.

use std::fmt;

/// A record field value.
///
/// The record format is deliberately restricted: integers, floats,
/// single-line strings, and one-dimensional numeric arrays. Anything
/// else is rejected at encode time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

impl Value {
    /// Human-readable type name, for error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::IntArray(_) => "int array",
            Value::FloatArray(_) => "float array",
        }
    }

    /// The value as a scalar float, if it is numeric and scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Append this value's numeric content to `out`, treating each array
    /// element as an independent scalar observation. Strings contribute
    /// nothing.
    pub fn flatten_into(&self, out: &mut Vec<f64>) {
        match self {
            Value::Int(i) => out.push(*i as f64),
            Value::Float(f) => out.push(*f),
            Value::IntArray(xs) => out.extend(xs.iter().map(|x| *x as f64)),
            Value::FloatArray(xs) => out.extend(xs.iter().copied()),
            Value::Str(_) => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::IntArray(xs) => write!(f, "{xs:?}"),
            Value::FloatArray(xs) => write!(f, "{xs:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<i64>> for Value {
    fn from(xs: Vec<i64>) -> Self {
        Value::IntArray(xs)
    }
}

impl From<Vec<f64>> for Value {
    fn from(xs: Vec<f64>) -> Self {
        Value::FloatArray(xs)
    }
}
