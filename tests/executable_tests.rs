//! Process targets checked by exit code and stdout.

#![cfg(unix)]

mod common;

use common::init_tracing;
use verity::output::{strip_markup, NullSink};
use verity::target::CommandInvoker;
use verity::{ExpectedOutcome, Feature, TargetDescriptor, Value};

fn shell(script: &str) -> Feature {
    init_tracing();
    Feature::new(
        TargetDescriptor::executable("bin", "sh"),
        CommandInvoker::new("sh").arg("-c").arg(script).arg("sh"),
    )
    .with_reporter(NullSink)
}

#[test]
fn exit_code_and_output() {
    let mut f = shell("printf 'hi %s' \"$1\"; exit 3");
    let mut args = [Value::from("there")];
    let expected = ExpectedOutcome::returns(3).with_output("hi there");
    assert!(f.assert(&mut args, expected, None));
    assert!(f.messages().is_empty());
}

#[test]
fn wrong_exit_code_uses_exit_verb() {
    let mut f = shell("exit 1");
    assert!(!f.assert(&mut [], ExpectedOutcome::returns(0), None));
    assert_eq!(
        strip_markup(&f.messages()[0]),
        "Expected bin::sh to exit with 0, got 1"
    );
}
