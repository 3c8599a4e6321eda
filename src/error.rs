//! Error types for the assertion engine.
//!
//! Comparison mismatches are never errors: they end up as diagnostic
//! messages on the feature. The types here cover programmer mistakes (asking
//! for a field that does not exist, passing a bad pattern to a pipe) and I/O
//! failures while writing a report.

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the engine's public API.
#[derive(Error, Diagnostic, Debug)]
#[diagnostic(url(docsrs))]
pub enum VerityError {
    #[error("Unreadable property {name}")]
    #[diagnostic(
        code(verity::feature::unreadable_property),
        help("readable properties are: name, messages, tested, class")
    )]
    UnreadableProperty { name: String },

    #[error("Invalid pattern '{pattern}'")]
    #[diagnostic(code(verity::pipes::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown pipe '{name}'")]
    #[diagnostic(
        code(verity::pipes::unknown),
        help("known pipes: is_a, is_subclass_of, method_exists, property_exists, matches, count")
    )]
    UnknownPipe { name: String },

    #[error("Pipe '{pipe}' cannot use '{argument}' as its argument")]
    #[diagnostic(code(verity::pipes::invalid_argument))]
    InvalidPipeArgument { pipe: String, argument: String },

    #[error("Invalid expectation JSON")]
    #[diagnostic(code(verity::outcome::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report output")]
    #[diagnostic(code(verity::output::io))]
    Io(#[from] std::io::Error),
}

/// Failure raised by a pipe while transforming an actual result.
///
/// The feature maps it to a `false` result; it never escapes an assertion.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("Pipe failed: {message}")]
#[diagnostic(code(verity::pipe::failed))]
pub struct PipeError {
    pub message: String,
}

impl PipeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
