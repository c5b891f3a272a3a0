//! Persistence engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALERT_TEXT_MAX_LEN, DEFAULT_INLINE_TEXT_LIMIT};

/// Configuration for the measure persistence engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Buffer writes until an explicit dump. Default: false.
    pub delayed_mode: Option<bool>,
    /// Longest text kept inline before spilling over. Default: 96.
    pub inline_text_limit: Option<usize>,
    /// Width of the alert text column. Default: 4000.
    pub alert_text_max_len: Option<usize>,
    /// Skip measures with no value, no text, and no variation. Default: false.
    pub skip_empty_measures: Option<bool>,
}

impl PersistenceConfig {
    pub fn effective_delayed_mode(&self) -> bool {
        self.delayed_mode.unwrap_or(false)
    }

    pub fn effective_inline_text_limit(&self) -> usize {
        self.inline_text_limit.unwrap_or(DEFAULT_INLINE_TEXT_LIMIT)
    }

    pub fn effective_alert_text_max_len(&self) -> usize {
        self.alert_text_max_len.unwrap_or(DEFAULT_ALERT_TEXT_MAX_LEN)
    }

    pub fn effective_skip_empty_measures(&self) -> bool {
        self.skip_empty_measures.unwrap_or(false)
    }
}
