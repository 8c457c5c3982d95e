// ABOUTME: YAML-backed key/value settings with slash-separated lookups
// ABOUTME: Loads settings files, applies environment overrides and exposes typed accessors

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

use super::error::{ConfigError, Result};

/// Environment variables that override settings keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DAYS_VIEW_CACHE_LIFETIME", "cache/lifetime"),
    ("DAYS_VIEW_ENGINE", "view/engine"),
    ("DAYS_VIEW_LOG_LEVEL", "logging/level"),
    ("DAYS_VIEW_LOG_FORMAT", "logging/format"),
];

/// Application settings.
///
/// Built once at startup and then handed to the view layer by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    root: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a YAML file; a missing file gives empty settings
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded settings from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(contents)?;
        match root {
            Value::Null => Ok(Self::default()),
            Value::Mapping(_) => Ok(Self { root }),
            _ => Err(ConfigError::NotAMapping),
        }
    }

    /// Apply overrides from the process environment
    pub fn merge_env(&mut self) -> Result<()> {
        self.merge_vars(std::env::vars())
    }

    /// Apply overrides from `(NAME, value)` pairs; unknown names are ignored
    pub fn merge_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, raw) in vars {
            let Some((_, key)) = ENV_OVERRIDES.iter().find(|(env, _)| *env == name) else {
                continue;
            };

            let value = if *key == "cache/lifetime" {
                let secs: i64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{} ({})", e, raw),
                })?;
                Value::from(secs)
            } else {
                Value::String(raw)
            };

            debug!("Settings override {} from {}", key, name);
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Raw value at a slash-separated key
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.root, |current, segment| current.get(segment))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Typed value at `key`, or `default` when the key is absent or null
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.lookup(key) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => {
                serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Bind `value` at a slash-separated key, creating intermediate sections
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "empty key".to_string(),
            });
        };

        let mut current = &mut self.root;
        for segment in parents {
            current = ensure_mapping(current)
                .entry(Value::String(segment.to_string()))
                .or_insert(Value::Mapping(Mapping::new()));
        }
        ensure_mapping(current).insert(Value::String(last.to_string()), value.into());
        Ok(())
    }

    pub fn logging(&self) -> Result<LoggingConfig> {
        self.get("logging", LoggingConfig::default())
    }
}

fn ensure_mapping(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(mapping) => mapping,
        _ => unreachable!("value was just replaced by a mapping"),
    }
}
