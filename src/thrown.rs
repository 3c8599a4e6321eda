//! Thrown-error descriptors and their comparison.
//!
//! Two errors are the same condition when kind and code agree. Message text
//! is carried for display only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind used for targets that panic instead of returning an error.
pub const PANIC_KIND: &str = "panic";

/// Kind used when an executable target cannot be spawned.
pub const IO_KIND: &str = "io";

/// Structured identity of an error condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorDescriptor {
    pub fn new(kind: impl Into<String>, code: i64) -> Self {
        Self {
            kind: kind.into(),
            code,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// True if `other` describes the same error condition.
    pub fn same_condition(&self, other: &ErrorDescriptor) -> bool {
        self.kind == other.kind && self.code == other.code
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.code)?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Renders an optional descriptor for diagnostics; absence renders as `NULL`.
pub fn render_thrown(thrown: Option<&ErrorDescriptor>) -> String {
    thrown.map_or_else(|| "NULL".to_string(), ToString::to_string)
}

/// Compares an expected and an actual thrown error.
///
/// ```rust
/// use verity::thrown::{throws_match, ErrorDescriptor};
/// let k1 = ErrorDescriptor::new("K", 1);
/// assert!(throws_match(None, None));
/// assert!(!throws_match(Some(&k1), None));
/// assert!(throws_match(Some(&k1), Some(&ErrorDescriptor::new("K", 1))));
/// assert!(!throws_match(Some(&k1), Some(&ErrorDescriptor::new("K", 2))));
/// ```
pub fn throws_match(expected: Option<&ErrorDescriptor>, actual: Option<&ErrorDescriptor>) -> bool {
    match (expected, actual) {
        (None, None) => true,
        (Some(e), Some(a)) => e.same_condition(a),
        _ => false,
    }
}
