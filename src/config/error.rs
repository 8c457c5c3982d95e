// ABOUTME: Error types for loading and querying application settings
// ABOUTME: Covers unreadable files, malformed YAML and values of the wrong type

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Settings root must be a mapping")]
    NotAMapping,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
