// ABOUTME: Application settings passed explicitly into the view layer
// ABOUTME: Exports the YAML-backed key/value settings tree and logging configuration

pub mod error;
pub mod settings;

pub use error::{ConfigError, Result};
pub use settings::{LoggingConfig, Settings};
