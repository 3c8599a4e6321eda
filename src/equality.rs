//! Equality under test semantics.
//!
//! Values captured from a target often cross a string/number boundary (a
//! result read back from output, a numeric id stored as text), so numbers are
//! compared after coercion. Everything that is not a number, an object or a
//! container falls back to strict comparison, which keeps `0` and `"abc"`
//! apart.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{render, Value};

static NUMERIC_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$")
        .expect("numeric pattern is valid")
});

/// A number produced by coercing a numeric-like value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(n) => n,
        }
    }

    /// Numeric equality; integers compare exactly, anything involving a
    /// float compares as `f64`.
    pub fn num_eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

/// Returns true for ints, floats and numeric strings.
///
/// ```rust
/// use verity::equality::is_numeric;
/// use verity::value::Value;
/// assert!(is_numeric(&Value::from(" 1.5e3")));
/// assert!(!is_numeric(&Value::from("0x1A")));
/// assert!(!is_numeric(&Value::Bool(true)));
/// ```
pub fn is_numeric(value: &Value) -> bool {
    coerce_number(value).is_some()
}

/// Coerces a numeric-like value, or `None` if it is not numeric-like.
pub fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Int(i) => Some(Number::Int(*i)),
        Value::Float(n) => Some(Number::Float(*n)),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

fn parse_numeric_str(s: &str) -> Option<Number> {
    if !NUMERIC_STRING.is_match(s) {
        return None;
    }
    let trimmed = s.trim_matches(|c: char| " \t\n\r\x0B\x0C".contains(c));
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::Int(i));
    }
    trimmed.parse::<f64>().ok().map(Number::Float)
}

/// Decides whether `a` and `b` should be considered equal.
///
/// Rules, first match wins: numeric-like pairs compare as numbers; object
/// pairs compare by concrete type; container pairs compare by rendering;
/// everything else compares strictly.
///
/// ```rust
/// use verity::equality::equal;
/// use verity::value::Value;
/// assert!(equal(&Value::from("3"), &Value::Int(3)));
/// assert!(!equal(&Value::from("abc"), &Value::Int(0)));
/// ```
pub fn equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (coerce_number(a), coerce_number(b)) {
        return x.num_eq(y);
    }
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => x.class == y.class,
        (Value::Array(_), Value::Array(_)) => render(a) == render(b),
        _ => a == b,
    }
}
