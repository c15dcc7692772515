//! Dispatcher configuration.
//!
//! Loaded from a JSON file and then overridden from the environment:
//!
//! | Variable                      | Field                |
//! |-------------------------------|----------------------|
//! | `CHATFLOW_SERIALIZE_PER_USER` | `serialize_per_user` |
//! | `CHATFLOW_MAX_IN_FLIGHT`      | `max_in_flight`      |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_SERIALIZE_PER_USER: &str = "CHATFLOW_SERIALIZE_PER_USER";
pub const ENV_MAX_IN_FLIGHT: &str = "CHATFLOW_MAX_IN_FLIGHT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Handle updates for the same user one at a time.
    ///
    /// Off by default: concurrent updates for one user race and the last
    /// state write wins.
    pub serialize_per_user: bool,

    /// Upper bound on updates processed concurrently. `None` or `0` means
    /// unbounded.
    pub max_in_flight: Option<usize>,
}

impl DispatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SERIALIZE_PER_USER) {
            self.serialize_per_user =
                parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
                    key: ENV_SERIALIZE_PER_USER,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_MAX_IN_FLIGHT) {
            let trimmed = value.trim();
            self.max_in_flight = if trimmed.is_empty() {
                None
            } else {
                let limit = trimmed
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidEnv {
                        key: ENV_MAX_IN_FLIGHT,
                        value: value.clone(),
                    })?;
                (limit > 0).then_some(limit)
            };
        }
        Ok(self)
    }

    /// The effective concurrency bound.
    pub fn in_flight_limit(&self) -> Option<usize> {
        self.max_in_flight.filter(|limit| *limit > 0)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" | "" => Some(false),
        _ => None,
    }
}
