//! Environment configuration.

use std::env;

pub const LOG_FILTER_VAR: &str = "PATCH_RELAY_LOG";
pub const LOG_FILE_VAR: &str = "PATCH_RELAY_LOG_FILE";
pub const CLEAR_HISTORY_VAR: &str = "PATCH_RELAY_CLEAR_HISTORY";
pub const WRAP_WIDTH_VAR: &str = "PATCH_RELAY_WRAP_WIDTH";

pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_WRAP_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub log_filter: String,
    pub log_file: Option<String>,
    pub clear_history: bool,
    pub wrap_width: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            clear_history: false,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_filter: env_string_opt(LOG_FILTER_VAR)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: env_string_opt(LOG_FILE_VAR),
            clear_history: env_flag(CLEAR_HISTORY_VAR),
            wrap_width: env_string_opt(WRAP_WIDTH_VAR)
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|width| *width > 0)
                .unwrap_or(DEFAULT_WRAP_WIDTH),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
