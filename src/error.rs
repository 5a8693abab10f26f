use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path} is invalid. Current value: {value}. Allowed values: {allowed:?}")]
    Invalid {
        path: String,
        value: toml::Value,
        allowed: Vec<String>,
    },

    #[error("Failed to parse document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
