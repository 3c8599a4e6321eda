//! The thing under test: its descriptor and how to invoke it.

use std::any::Any;
use std::ffi::OsString;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::outcome::ActualOutcome;
use crate::output::{capture, OutputSink};
use crate::thrown::{ErrorDescriptor, IO_KIND, PANIC_KIND};
use crate::value::{render, Value};

/// How a target is exercised. Selects the verbs used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFlavor {
    /// A callable method.
    Method,
    /// A property or state check.
    Property,
    /// A process run, checked by exit code.
    Executable,
}

impl TargetFlavor {
    /// Verb pair for "Expected X to <expect> Y, <found> Z".
    pub fn verbs(self) -> (&'static str, &'static str) {
        match self {
            TargetFlavor::Method => ("return", "got"),
            TargetFlavor::Property => ("contain", "found"),
            TargetFlavor::Executable => ("exit with", "got"),
        }
    }
}

/// Identifies what is being tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub name: String,
    pub class: String,
    /// Index of the argument that is "the thing under test".
    #[serde(default)]
    pub target_index: usize,
    pub flavor: TargetFlavor,
    /// Human-readable description; `{N}` (N = `target_index`) is replaced by
    /// the feature name when it is shown.
    #[serde(default)]
    pub description: Option<String>,
}

impl TargetDescriptor {
    pub fn new(class: impl Into<String>, name: impl Into<String>, flavor: TargetFlavor) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            target_index: 0,
            flavor,
            description: None,
        }
    }

    pub fn method(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(class, name, TargetFlavor::Method)
    }

    pub fn property(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(class, name, TargetFlavor::Property)
    }

    pub fn executable(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(class, name, TargetFlavor::Executable)
    }

    pub fn targeting(mut self, index: usize) -> Self {
        self.target_index = index;
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `Class::name`, or `Class::$name` for properties.
    pub fn feature_name(&self) -> String {
        let sigil = if self.flavor == TargetFlavor::Property {
            "$"
        } else {
            ""
        };
        format!("{}::{}{}", self.class, sigil, self.name)
    }
}

/// Performs the actual call for an assertion.
///
/// Output written to `out` becomes the captured output. Arguments are
/// mutable so a target can hand values back through them.
pub trait Invoker {
    fn invoke(&mut self, args: &mut [Value], out: &mut dyn OutputSink)
        -> Result<Value, ErrorDescriptor>;
}

/// Adapter turning a closure into an [`Invoker`]; see [`from_fn`].
pub struct FnInvoker<F>(F);

impl<F> Invoker for FnInvoker<F>
where
    F: FnMut(&mut [Value], &mut dyn OutputSink) -> Result<Value, ErrorDescriptor>,
{
    fn invoke(
        &mut self,
        args: &mut [Value],
        out: &mut dyn OutputSink,
    ) -> Result<Value, ErrorDescriptor> {
        (self.0)(args, out)
    }
}

/// Wraps a closure as an invoker.
///
/// ```rust
/// use verity::target::{from_fn, Invoker};
/// use verity::output::CaptureBuffer;
/// use verity::value::Value;
/// let mut double = from_fn(|args, _out| match args.first() {
///     Some(Value::Int(i)) => Ok(Value::Int(i * 2)),
///     _ => Ok(Value::Null),
/// });
/// let mut buf = CaptureBuffer::new();
/// assert_eq!(double.invoke(&mut [Value::Int(4)], &mut buf), Ok(Value::Int(8)));
/// ```
pub fn from_fn<F>(f: F) -> FnInvoker<F>
where
    F: FnMut(&mut [Value], &mut dyn OutputSink) -> Result<Value, ErrorDescriptor>,
{
    FnInvoker(f)
}

/// Runs an external program. The result is its exit code and the captured
/// output is its stdout, decoded lossily (invalid UTF-8 becomes U+FFFD).
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: OsString,
    base_args: Vec<OsString>,
}

impl CommandInvoker {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Arguments passed before the rendered assertion arguments.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.base_args.push(arg.into());
        self
    }
}

impl Invoker for CommandInvoker {
    fn invoke(
        &mut self,
        args: &mut [Value],
        out: &mut dyn OutputSink,
    ) -> Result<Value, ErrorDescriptor> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(args.iter().map(render))
            .output()
            .map_err(|e| {
                ErrorDescriptor::new(IO_KIND, i64::from(e.raw_os_error().unwrap_or(0)))
                    .with_message(e.to_string())
            })?;
        out.emit(&String::from_utf8_lossy(&output.stdout));
        // Killed by a signal: no exit code to report.
        Ok(output.status.code().map_or(Value::Null, |c| Value::Int(i64::from(c))))
    }
}

/// Invokes the target inside a scoped capture and collects the outcome.
///
/// Errors become `thrown`; a panic becomes a `panic` descriptor carrying the
/// panic message. Output written before either is kept.
pub fn invoke_captured(invoker: &mut dyn Invoker, args: &mut [Value]) -> ActualOutcome {
    let (result, out) = capture(|sink| invoker.invoke(args, sink));
    match result {
        Ok(Ok(value)) => ActualOutcome {
            result: value,
            thrown: None,
            out,
        },
        Ok(Err(thrown)) => {
            debug!(kind = %thrown.kind, code = thrown.code, "target threw");
            ActualOutcome {
                result: Value::Null,
                thrown: Some(thrown),
                out,
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%message, "target panicked");
            ActualOutcome {
                result: Value::Null,
                thrown: Some(ErrorDescriptor::new(PANIC_KIND, 0).with_message(message)),
                out,
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
