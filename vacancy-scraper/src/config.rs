use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Page size requested from the search endpoint, the maximum the API allows.
pub const PER_PAGE: u32 = 100;

pub const DEFAULT_BASE_URL: &str = "https://api.hh.ru";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Run configuration, loaded once before any request is made.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Search text
    pub query: String,
    /// Region code, e.g. "1" for Moscow
    #[serde(deserialize_with = "string_or_number")]
    pub area: String,
    /// Lookback window in days
    pub period: u32,
    pub max_pages: u32,
    /// Seconds to wait between requests
    pub request_delay: f64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub processed_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub top_skills: usize,
    pub word_cloud_words: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            processed_dir: PathBuf::from("data/processed"),
            figures_dir: PathBuf::from("results/figures"),
            top_skills: 15,
            word_cloud_words: 100,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("vacancy-analytics/{}", env!("CARGO_PKG_VERSION"))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }
    Ok(match Code::deserialize(deserializer)? {
        Code::Text(text) => text,
        Code::Number(number) => number.to_string(),
    })
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let api = &self.api;
        if Duration::try_from_secs_f64(api.request_delay).is_err() {
            return Err(ConfigError::Invalid {
                field: "request_delay",
                reason: format!("expected a non-negative number of seconds within range, got {}", api.request_delay),
            });
        }
        if api.query.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "query",
                reason: "search text must not be empty".to_owned(),
            });
        }
        if api.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "timeout must be at least one second".to_owned(),
            });
        }
        Ok(self)
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()
    }
}

impl ApiConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
