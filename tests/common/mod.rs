//! Shared helpers for integration tests.

use std::sync::Once;

use verity::output::NullSink;
use verity::target::from_fn;
use verity::{Feature, TargetDescriptor, Value};

static TRACING: Once = Once::new();

/// Installs a test subscriber; `RUST_LOG=verity=trace` shows engine events.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A method feature that always returns `value` and prints nothing.
#[allow(dead_code)]
pub fn returning(value: impl Into<Value>) -> Feature {
    init_tracing();
    let value = value.into();
    Feature::new(
        TargetDescriptor::method("Fixture", "call"),
        from_fn(move |_args, _out| Ok(value.clone())),
    )
    .with_config(&verity::config::ReportConfig::plain())
    .with_reporter(NullSink)
}
