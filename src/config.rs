use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::{SummaryLimits, DEFAULT_TOP_USERS, DEFAULT_TOP_WORDS};
use crate::error::ConfigError;

pub const ENV_API_URL: &str = "AD_INSIGHTS_API_URL";
pub const ENV_TOP_USERS: &str = "AD_INSIGHTS_TOP_USERS";
pub const ENV_TOP_WORDS: &str = "AD_INSIGHTS_TOP_WORDS";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "AD_INSIGHTS_SEARCH_DEBOUNCE_MS";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub top_users: u32,
    pub top_words: u32,
    pub search_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            top_users: DEFAULT_TOP_USERS,
            top_words: DEFAULT_TOP_WORDS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file if present, then the environment.
    pub fn load(path: &Path) -> Self {
        let mut config = match Self::from_file(path) {
            Ok(Some(config)) => {
                info!(path = %path.display(), "Loaded config file");
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring config file");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Returns `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Override fields from `lookup`. Unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(v) = parse_env(&lookup, ENV_TOP_USERS) {
            self.top_users = v;
        }
        if let Some(v) = parse_env(&lookup, ENV_TOP_WORDS) {
            self.top_words = v;
        }
        if let Some(v) = parse_env(&lookup, ENV_SEARCH_DEBOUNCE_MS) {
            self.search_debounce_ms = v;
        }
    }

    pub fn summary_limits(&self) -> SummaryLimits {
        SummaryLimits {
            top_users: self.top_users,
            top_words: self.top_words,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring invalid value");
            None
        }
    }
}

pub fn insights_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ad-insights")
}

pub fn config_path() -> PathBuf {
    insights_data_dir().join("config.json")
}
