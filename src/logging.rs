//! Structured logging setup.
//!
//! Events go to stderr so that harness reports on stdout stay exact. The
//! filter is read from `COMPILER_TEST_LOG` (e.g. `compiler_test=debug`) and
//! defaults to `warn`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "COMPILER_TEST_LOG";

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .without_time()
        .with_target(false)
        .try_init();
}
