//! Server configuration
//!
//! Loaded from a TOML file. Source file paths are resolved relative to the
//! directory containing the config file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ServerConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// A field holds an unusable value
    #[error("Invalid configuration: {field} - {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_participants_csv() -> PathBuf {
    PathBuf::from("participants.csv")
}

fn default_prizes_csv() -> PathBuf {
    PathBuf::from("prizes.csv")
}

fn default_blacklists_json() -> PathBuf {
    PathBuf::from("blacklists.json")
}

fn default_true() -> bool {
    true
}

/// Lottery server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Lottery name; selects the snapshot file
    pub lottery_name: String,

    /// Snapshot directory; defaults to `lottery_core::default_data_dir()`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Participants CSV used on cold start
    #[serde(default = "default_participants_csv")]
    pub participants_csv: PathBuf,

    /// Prizes CSV used on cold start
    #[serde(default = "default_prizes_csv")]
    pub prizes_csv: PathBuf,

    /// Blacklists JSON used on cold start
    #[serde(default = "default_blacklists_json")]
    pub blacklists_json: PathBuf,

    /// Save a snapshot after every successful mutating request
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl ServerConfig {
    /// Minimal config for a named lottery
    pub fn new(lottery_name: impl Into<String>) -> Self {
        Self {
            addr: default_addr(),
            lottery_name: lottery_name.into(),
            data_dir: None,
            participants_csv: default_participants_csv(),
            prizes_csv: default_prizes_csv(),
            blacklists_json: default_blacklists_json(),
            autosave: true,
        }
    }

    /// Parse a TOML document, resolving relative paths against `base_dir`
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(text)?;
        Ok(config.resolved_against(base_dir))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config =
            Self::from_toml_str(&text, base_dir).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lottery_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "lottery_name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "addr",
                reason: format!("{} is not a socket address", self.addr),
            });
        }
        Ok(())
    }

    fn resolved_against(mut self, base_dir: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base_dir.join(p) } else { p };
        self.participants_csv = resolve(self.participants_csv);
        self.prizes_csv = resolve(self.prizes_csv);
        self.blacklists_json = resolve(self.blacklists_json);
        self.data_dir = self.data_dir.map(resolve);
        self
    }
}
