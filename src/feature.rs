//! The assertion orchestrator.
//!
//! A [`Feature`] wraps one target. Each call to [`Feature::assert`] invokes
//! the target inside a scoped output capture, compares the actual
//! `{result, thrown, out}` triple against the expectation and appends
//! human-readable diagnostics. Mismatches are reported, never raised: the
//! return value is the verdict and [`Feature::messages`] holds the why.
//!
//! Diagnostics contain markup tags (`<gray>`, `<darkGray>`, ...) that a sink
//! such as [`crate::output::MarkupWriter`] turns into colors.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::config::ReportConfig;
use crate::diff::TextDiffer;
use crate::equality::equal;
use crate::error::{PipeError, VerityError};
use crate::outcome::{Expect, ExpectedOutcome};
use crate::output::{strip_markup, OutputSink};
use crate::target::{invoke_captured, panic_message, Invoker, TargetDescriptor};
use crate::thrown::{render_thrown, throws_match};
use crate::value::{render, Value};

/// Characters removed from both ends of captured output for the verdict.
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// A read-only view of one of a feature's readable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Text(&'a str),
    Messages(&'a [String]),
    Tested(Option<&'a str>),
}

/// One target under test, plus the diagnostics gathered while testing it.
pub struct Feature {
    descriptor: TargetDescriptor,
    invoker: Box<dyn Invoker>,
    reporter: Box<dyn OutputSink>,
    differ: TextDiffer,
    messages: Vec<String>,
    tested: Option<String>,
    described: bool,
}

impl Feature {
    /// Creates a feature reporting to stdout with the default config.
    pub fn new(descriptor: TargetDescriptor, invoker: impl Invoker + 'static) -> Self {
        let config = ReportConfig::default();
        Self {
            descriptor,
            invoker: Box::new(invoker),
            reporter: config.sink(),
            differ: config.differ(),
            messages: Vec::new(),
            tested: None,
            described: false,
        }
    }

    pub fn with_config(mut self, config: &ReportConfig) -> Self {
        self.reporter = config.sink();
        self.differ = config.differ();
        self
    }

    /// Sends the description line to `reporter` instead of stdout.
    pub fn with_reporter(mut self, reporter: impl OutputSink + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Asserts that invoking the target with `args` yields `expected`,
    /// optionally passing the actual result through `pipe` first.
    ///
    /// Returns the verdict; failing sub-comparisons append diagnostics to
    /// [`Feature::messages`].
    pub fn assert(
        &mut self,
        args: &mut [Value],
        expected: ExpectedOutcome,
        pipe: Option<&dyn Fn(&Value) -> Result<Value, PipeError>>,
    ) -> bool {
        let feature = self.descriptor.feature_name();
        self.describe(&feature);

        debug!(feature = %feature, args = args.len(), "invoking target");
        let mut actual = invoke_captured(self.invoker.as_mut(), args);

        let ExpectedOutcome {
            result: expected_result,
            thrown: expected_thrown,
            out: expected_out,
        } = expected;
        let expected_result = match expected_result {
            Expect::Value(value) => value,
            Expect::Satisfies(transform) => {
                let current = &actual.result;
                actual.result = catch_unwind(AssertUnwindSafe(|| transform(current)))
                    .unwrap_or_else(|payload| {
                        let message = panic_message(payload.as_ref());
                        warn!(feature = %feature, %message, "transform panicked, using false");
                        Value::Bool(false)
                    });
                Value::Bool(true)
            }
        };

        if let Some(pipe) = pipe {
            let current = &actual.result;
            actual.result = match catch_unwind(AssertUnwindSafe(|| pipe(current))) {
                Ok(Ok(value)) => value,
                Ok(Err(e)) => {
                    warn!(feature = %feature, error = %e, "pipe failed, using false");
                    Value::Bool(false)
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(feature = %feature, %message, "pipe panicked, using false");
                    Value::Bool(false)
                }
            };
        }

        self.tested = Some(
            args.get(self.descriptor.target_index)
                .map_or_else(|| render(&Value::Null), render),
        );

        let thrown_ok = throws_match(expected_thrown.as_ref(), actual.thrown.as_ref());
        let result_ok = equal(&expected_result, &actual.result);
        trace!(feature = %feature, thrown_ok, result_ok, "compared result and thrown");

        if !thrown_ok {
            self.messages.push(format!(
                "<gray>Expected {} to throw <darkGray>{}<gray>, caught <darkGray>{}",
                feature,
                render_thrown(expected_thrown.as_ref()),
                render_thrown(actual.thrown.as_ref()),
            ));
        } else if !result_ok {
            let (expect_verb, found_verb) = self.descriptor.flavor.verbs();
            self.messages.push(format!(
                "<gray>Expected <darkGray>{}<gray> to {} <darkGray>{}<gray>, {} <darkGray>{}",
                feature,
                expect_verb,
                render(&expected_result),
                found_verb,
                render(&actual.result),
            ));
        }

        // Raw comparison for the report, trimmed comparison for the verdict:
        // whitespace at the edges shows up in the diff but does not fail.
        if expected_out != actual.out {
            let diff = self.differ.diff(&expected_out, &actual.out);
            self.messages.push(format!(
                "<gray>Expected output for <darkGray>{}<gray>:\n",
                strip_markup(&feature)
            ));
            self.messages.push(format!("{}\n", diff.old));
            self.messages.push("<gray>Actual output:\n".to_string());
            self.messages.push(format!("{}\n", diff.new));
        }
        let out_ok = expected_out.trim_matches(TRIMMED) == actual.out.trim_matches(TRIMMED);

        let verdict = result_ok && thrown_ok && out_ok;
        debug!(feature = %feature, verdict, "assertion finished");
        verdict
    }

    /// Emits the description line the first time the feature is asserted.
    fn describe(&mut self, feature: &str) {
        if self.described {
            return;
        }
        self.described = true;
        if let Some(description) = &self.descriptor.description {
            let placeholder = format!("{{{}}}", self.descriptor.target_index);
            let line = format!("<blue>{}", description).replace(
                &placeholder,
                &format!("<darkBlue>{}<blue>", feature),
            );
            self.reporter.emit(&line);
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn class(&self) -> &str {
        &self.descriptor.class
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Rendering of the argument under test from the most recent assertion.
    pub fn tested(&self) -> Option<&str> {
        self.tested.as_deref()
    }

    pub fn descriptor(&self) -> &TargetDescriptor {
        &self.descriptor
    }

    /// Hands the accumulated diagnostics to a reporter and clears them.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Looks up a readable field by name.
    ///
    /// Only `name`, `messages`, `tested` and `class` are readable; anything
    /// else is an [`VerityError::UnreadableProperty`].
    pub fn field(&self, name: &str) -> Result<Field<'_>, VerityError> {
        match name {
            "name" => Ok(Field::Text(self.name())),
            "class" => Ok(Field::Text(self.class())),
            "messages" => Ok(Field::Messages(self.messages())),
            "tested" => Ok(Field::Tested(self.tested())),
            _ => Err(VerityError::UnreadableProperty {
                name: name.to_string(),
            }),
        }
    }
}
