/// Tally version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text payloads longer than this many characters are written to the
/// spill-over `measure_data` table instead of the inline `text_value` column.
pub const DEFAULT_INLINE_TEXT_LIMIT: usize = 96;

/// Width of the `alert_text` column.
pub const DEFAULT_ALERT_TEXT_MAX_LEN: usize = 4000;

/// Number of variation slots carried by a measure.
pub const VARIATION_COUNT: usize = 5;

/// Environment variable read by `tracing_setup::init_tracing`.
pub const LOG_ENV_VAR: &str = "TALLY_LOG";
