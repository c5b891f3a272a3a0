//! Top-level Tally configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoggingConfig, PersistenceConfig, StorageConfig};
use crate::errors::ConfigError;

const PROJECT_CONFIG_FILE: &str = "tally.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Overrides supplied by the host pipeline
/// 2. Environment variables (`TALLY_*`)
/// 3. Project config (`tally.toml` in the project root)
/// 4. User config (`~/.tally/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TallyConfig {
    pub persistence: PersistenceConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Overrides the host pipeline applies on top of every file and env layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub delayed_mode: Option<bool>,
    pub storage_path: Option<String>,
    pub log_filter: Option<String>,
}

impl TallyConfig {
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string, with no other layer applied.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &TallyConfig) -> Result<(), ConfigError> {
        if config.persistence.inline_text_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "persistence.inline_text_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.persistence.alert_text_max_len == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "persistence.alert_text_max_len".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(size) = config.storage.read_pool_size {
            if !(1..=8).contains(&size) {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.read_pool_size".to_string(),
                    message: "must be between 1 and 8".to_string(),
                });
            }
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".tally").join("config.toml"))
    }

    fn merge_toml_file(config: &mut TallyConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: TallyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Values set in `other` win; unset values leave `base` alone.
    fn merge(base: &mut TallyConfig, other: &TallyConfig) {
        let p = &other.persistence;
        if p.delayed_mode.is_some() {
            base.persistence.delayed_mode = p.delayed_mode;
        }
        if p.inline_text_limit.is_some() {
            base.persistence.inline_text_limit = p.inline_text_limit;
        }
        if p.alert_text_max_len.is_some() {
            base.persistence.alert_text_max_len = p.alert_text_max_len;
        }
        if p.skip_empty_measures.is_some() {
            base.persistence.skip_empty_measures = p.skip_empty_measures;
        }

        let s = &other.storage;
        if s.path.is_some() {
            base.storage.path = s.path.clone();
        }
        if s.read_pool_size.is_some() {
            base.storage.read_pool_size = s.read_pool_size;
        }
        if s.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = s.busy_timeout_ms;
        }

        let l = &other.logging;
        if l.filter.is_some() {
            base.logging.filter = l.filter.clone();
        }
        if l.json.is_some() {
            base.logging.json = l.json;
        }
    }

    /// Pattern: `TALLY_PERSISTENCE_DELAYED_MODE`, `TALLY_STORAGE_PATH`, ...
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut TallyConfig) {
        if let Some(v) = env_parse::<bool>("TALLY_PERSISTENCE_DELAYED_MODE") {
            config.persistence.delayed_mode = Some(v);
        }
        if let Some(v) = env_parse::<usize>("TALLY_PERSISTENCE_INLINE_TEXT_LIMIT") {
            config.persistence.inline_text_limit = Some(v);
        }
        if let Some(v) = env_parse::<bool>("TALLY_PERSISTENCE_SKIP_EMPTY_MEASURES") {
            config.persistence.skip_empty_measures = Some(v);
        }
        if let Ok(val) = std::env::var("TALLY_STORAGE_PATH") {
            config.storage.path = Some(val);
        }
        if let Some(v) = env_parse::<usize>("TALLY_STORAGE_READ_POOL_SIZE") {
            config.storage.read_pool_size = Some(v);
        }
        if let Ok(val) = std::env::var(crate::constants::LOG_ENV_VAR) {
            config.logging.filter = Some(val);
        }
    }

    fn apply_overrides(config: &mut TallyConfig, o: &ConfigOverrides) {
        if let Some(v) = o.delayed_mode {
            config.persistence.delayed_mode = Some(v);
        }
        if let Some(ref v) = o.storage_path {
            config.storage.path = Some(v.clone());
        }
        if let Some(ref v) = o.log_filter {
            config.logging.filter = Some(v.clone());
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
