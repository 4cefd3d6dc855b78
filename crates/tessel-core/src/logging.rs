//! Logging bootstrap built on `tracing-subscriber`.

use crate::config::{Config, LogFormat};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber using [`Config::from_env`].
pub fn init() {
    init_with_config(&Config::from_env());
}

/// Install the global subscriber with an explicit filter directive.
pub fn init_with_filter(filter: &str) {
    init_with_config(&Config::default().with_log_filter(filter));
}

/// Install the global subscriber.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_with_config(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.log_format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
