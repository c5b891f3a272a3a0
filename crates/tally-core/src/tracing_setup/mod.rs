//! Subscriber initialisation and span helpers.

pub mod spans;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::constants::LOG_ENV_VAR;

/// Install a global `fmt` subscriber.
///
/// The filter comes from `TALLY_LOG` when set, otherwise from the config.
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(config.effective_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.effective_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
