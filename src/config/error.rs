//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a timer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing failed
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing failed
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension names no known format
    #[error("Unsupported configuration format '{0}', expected .toml or .json")]
    UnsupportedFormat(String),
}
