//! Subscriber setup from the `[logging]` config section.

use std::io;

use datastore_miner_core::config::LoggingConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output; `RUST_LOG` overrides the configured level.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = fmt().with_writer(io::stderr).with_env_filter(filter);
    // a second call keeps the first subscriber
    let _ = if config.format == "compact" {
        builder.compact().with_target(false).try_init()
    } else {
        builder.pretty().try_init()
    };
}
