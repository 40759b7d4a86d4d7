//! Logging for test binaries.

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

const QUIET: &str = "warn";

static SUBSCRIBER: Lazy<()> = Lazy::new(|| {
    let directive = filter_directive(
        std::env::var("TEST_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
    );

    // Another harness may have installed a global subscriber first.
    let _ = fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_test_writer()
        .without_time()
        .with_target(false)
        .try_init();
});

/// Install the test subscriber once per binary; later calls do nothing.
///
/// `TEST_LOG` wins over `RUST_LOG`; with neither set only warnings show.
pub fn init() {
    Lazy::force(&SUBSCRIBER);
}

fn filter_directive(test_log: Option<String>, rust_log: Option<String>) -> String {
    [test_log, rust_log]
        .into_iter()
        .flatten()
        .find(|d| !d.trim().is_empty())
        .unwrap_or_else(|| QUIET.to_string())
}
