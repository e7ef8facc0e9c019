//! Runtime values and error kinds exchanged with implementations under test
//!
//! Implementations receive a slice of [`Value`]s and either return a
//! [`Value`] or signal an [`ErrorKind`]. Comparison between actual and
//! expected values is type-aware: floats use an absolute tolerance,
//! integers and floats compare numerically, arrays compare element-wise.

use std::fmt;

/// Absolute tolerance used when comparing floats
pub const FLOAT_TOLERANCE: f64 = 1e-9;

// ── Value ─────────────────────────────────────────────────

/// A dynamically typed value passed to or returned from an implementation.
///
/// Serializes as plain JSON. Non-finite floats have no JSON number form and
/// are written as the strings `"inf"`, `"-inf"` and `"nan"`; those strings
/// read back as [`Value::Float`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null / absent
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value (i64)
    Integer(i64),
    /// Float value (f64)
    #[serde(with = "non_finite")]
    Float(f64),
    /// String value
    String(String),
    /// Ordered sequence of values
    Array(Vec<Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Value {
    /// Numeric view of the value, widening integers to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Type-aware equality.
    ///
    /// - Integer/Integer: exact
    /// - any Float involved: `|a - b| <= tolerance`, NaN never equal
    /// - Array: same length, element-wise, order-sensitive
    /// - String: byte-exact
    /// - otherwise: same variant and equal payload
    pub fn matches(&self, other: &Value, tolerance: f64) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(_), Value::Float(_) | Value::Integer(_))
            | (Value::Integer(_), Value::Float(_)) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) if a.is_infinite() || b.is_infinite() => a == b,
                    (Some(a), Some(b)) => (a - b).abs() <= tolerance,
                    _ => false,
                }
            }
            (Value::String(a), Value::String(b)) => a.as_bytes() == b.as_bytes(),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.matches(y, tolerance))
            }
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

mod non_finite {
    use serde::de::{self, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a number, \"inf\", \"-inf\" or \"nan\"",
                )),
            },
        }
    }
}

// ── ErrorKind ─────────────────────────────────────────────

/// A named failure an implementation can signal instead of returning a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Zero denominator
    DivisionByZero,
    /// Operation is undefined on empty input
    EmptyInput,
    /// Input has the wrong shape or type
    InvalidInput,
    /// Result does not fit the numeric type
    Overflow,
    /// Execution exceeded the configured per-case bound
    Timeout,
    /// Implementation panicked
    Panic,
    /// Any other named failure
    Other(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::DivisionByZero => write!(f, "DivisionByZero"),
            ErrorKind::EmptyInput => write!(f, "EmptyInput"),
            ErrorKind::InvalidInput => write!(f, "InvalidInput"),
            ErrorKind::Overflow => write!(f, "Overflow"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::Panic => write!(f, "Panic"),
            ErrorKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// What an implementation produced: a value or a signalled error kind
pub type Outcome = std::result::Result<Value, ErrorKind>;
