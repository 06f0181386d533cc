//! Configuration file
//!
//! ```json
//! { "schema_dir": "./schemas", "max_depth": 32, "max_nodes": 10000, "log_level": "info" }
//! ```
//!
//! Only `schema_dir` is required. A relative `schema_dir` is resolved
//! against the directory holding the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;
use crate::schema::Limits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding schema documents (required)
    pub schema_dir: PathBuf,

    /// Maximum input nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of values in one input
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Minimum log severity: trace, info, warn, error or fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_depth() -> usize {
    Limits::default().max_depth
}

fn default_max_nodes() -> usize {
    Limits::default().max_nodes
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::parse(&content)?;
        if config.schema_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.schema_dir = parent.join(&config.schema_dir);
            }
        }
        Ok(config)
    }

    /// Parses and validates configuration text
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.schema_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("schema_dir must not be empty".into()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be > 0".into()));
        }
        if self.max_nodes == 0 {
            return Err(ConfigError::Invalid("max_nodes must be > 0".into()));
        }
        self.severity()?;
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }

    pub fn severity(&self) -> ConfigResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::Invalid(format!("unknown log_level '{}'", self.log_level))
        })
    }
}
