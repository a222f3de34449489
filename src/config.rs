//! Runtime configuration.
//!
//! [`StoreConfig`] carries everything the store needs at run time: the
//! backend collection that holds every record kind, the chunk size bound for
//! the splitter, and the connection values handed through to the backend
//! client. Configs are serde-derived, cheap to clone, and loadable from a
//! YAML file:
//!
//! ```yaml
//! collection: documents
//! max_chunk_size: 1024
//! backend:
//!   host: 127.0.0.1
//!   port: 9200
//!   protocol: http
//!   timeout_secs: 30
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Connection values for the backend client. Opaque to the store core and
/// passed through unchanged; the client's `timeout_secs` is the only bound
/// on an individual backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9200,
            protocol: "http".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Store-level configuration, initialized once and reused for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend collection holding chunks, annotations, and structure
    /// records for every document.
    pub collection: String,
    /// Maximum chunk size, in characters, handed to the splitter.
    pub max_chunk_size: usize,
    /// Backend connection values.
    pub backend: BackendConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "documents".to_string(),
            max_chunk_size: 1024,
            backend: BackendConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the store relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.is_empty() {
            return Err(ConfigError::Validation(
                "collection must not be empty".to_string(),
            ));
        }
        if self.max_chunk_size == 0 {
            return Err(ConfigError::Validation(
                "max_chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
