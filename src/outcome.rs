//! Expected and actual outcome triples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PipeError, VerityError};
use crate::thrown::ErrorDescriptor;
use crate::value::Value;

/// A function applied to an actual result before comparison.
pub type Transform = Box<dyn Fn(&Value) -> Value>;

/// An optional pipe: like a transform, but allowed to fail.
pub type Pipe = Box<dyn Fn(&Value) -> Result<Value, PipeError>>;

/// What the result should be.
pub enum Expect {
    /// Compare against this value.
    Value(Value),
    /// Pass the actual result through the function; its output must be `true`.
    Satisfies(Transform),
}

impl fmt::Debug for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expect::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Expect::Satisfies(_) => f.write_str("Satisfies(<fn>)"),
        }
    }
}

impl Default for Expect {
    fn default() -> Self {
        Expect::Value(Value::Null)
    }
}

/// The expected `{result, thrown, out}` triple.
///
/// Missing fields default to a `Null` result, nothing thrown and no output.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "ExpectationRecord")]
pub struct ExpectedOutcome {
    pub result: Expect,
    pub thrown: Option<ErrorDescriptor>,
    pub out: String,
}

impl ExpectedOutcome {
    pub fn returns(value: impl Into<Value>) -> Self {
        Self {
            result: Expect::Value(value.into()),
            ..Self::default()
        }
    }

    pub fn satisfies(f: impl Fn(&Value) -> Value + 'static) -> Self {
        Self {
            result: Expect::Satisfies(Box::new(f)),
            ..Self::default()
        }
    }

    pub fn throws(thrown: ErrorDescriptor) -> Self {
        Self {
            thrown: Some(thrown),
            ..Self::default()
        }
    }

    pub fn and_throws(mut self, thrown: ErrorDescriptor) -> Self {
        self.thrown = Some(thrown);
        self
    }

    pub fn with_output(mut self, out: impl Into<String>) -> Self {
        self.out = out.into();
        self
    }

    /// Parses an expectation from JSON, e.g.
    /// `{"result": {"Int": 5}, "out": "done\n"}`. Missing fields take their
    /// defaults.
    pub fn from_json(text: &str) -> Result<Self, VerityError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Serialized form of an expectation (transforms cannot be serialized).
#[derive(Debug, Default, Deserialize)]
struct ExpectationRecord {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    thrown: Option<ErrorDescriptor>,
    #[serde(default)]
    out: String,
}

impl From<ExpectationRecord> for ExpectedOutcome {
    fn from(record: ExpectationRecord) -> Self {
        Self {
            result: Expect::Value(record.result),
            thrown: record.thrown,
            out: record.out,
        }
    }
}

/// The actual `{result, thrown, out}` triple produced by one invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActualOutcome {
    pub result: Value,
    pub thrown: Option<ErrorDescriptor>,
    pub out: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_field() {
        let e = ExpectedOutcome::default();
        assert!(matches!(e.result, Expect::Value(Value::Null)));
        assert!(e.thrown.is_none());
        assert_eq!(e.out, "");
    }

    #[test]
    fn loads_from_json() {
        let e = ExpectedOutcome::from_json(
            r#"{"result": {"Int": 5}, "thrown": {"kind": "Domain", "code": 2}}"#,
        )
        .unwrap();
        assert!(matches!(e.result, Expect::Value(Value::Int(5))));
        assert_eq!(e.thrown, Some(ErrorDescriptor::new("Domain", 2)));
        assert_eq!(e.out, "");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ExpectedOutcome::from_json("{"),
            Err(VerityError::Json(_))
        ));
    }

    #[test]
    fn debug_hides_closures() {
        let e = ExpectedOutcome::satisfies(|_| Value::Bool(true));
        assert!(format!("{:?}", e).contains("Satisfies(<fn>)"));
    }
}
