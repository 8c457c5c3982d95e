// ABOUTME: Per-session variable store fed to templates at render time
// ABOUTME: Implements overwrite and delimiter-merge assignment over an insertion-ordered map

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::error::{Result, ViewError};

/// Delimiter used by `SetMode::merge()` when the caller does not pick one
pub const DEFAULT_DELIMITER: &str = "-";

/// How `set` treats a value that is already bound to the name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SetMode {
    /// Replace any previous value
    #[default]
    Overwrite,
    /// Prepend the new value to a non-empty previous value, joined by the delimiter
    Merge { delimiter: String },
}

impl SetMode {
    /// Merge using the default delimiter
    pub fn merge() -> Self {
        Self::merge_with(DEFAULT_DELIMITER)
    }

    pub fn merge_with(delimiter: &str) -> Self {
        SetMode::Merge {
            delimiter: delimiter.to_string(),
        }
    }
}

/// Variables owned by one view instance.
///
/// A name maps to at most one value. Order of insertion is kept so that
/// serialised stores (cache keys, debug output) are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Variables {
    values: IndexMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `name` according to `mode`
    pub fn set(&mut self, name: &str, value: Value, mode: &SetMode) -> Result<()> {
        if name.is_empty() {
            return Err(ViewError::EmptyVariableName);
        }

        let value = match mode {
            SetMode::Overwrite => value,
            SetMode::Merge { delimiter } => match self.values.get(name) {
                Some(previous) if !is_empty_value(previous) => Value::String(format!(
                    "{} {} {}",
                    display_value(&value),
                    delimiter,
                    display_value(previous)
                )),
                _ => value,
            },
        };

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Current value of `name`, or `default` when unbound
    pub fn get_or(&self, name: &str, default: Value) -> Value {
        self.values.get(name).cloned().unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Flat JSON object handed to engines as their render context
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Whether a stored value counts as absent for merging.
///
/// Null, `""`, `"0"`, `false`, numeric zero and empty containers are empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Text form of a value as it appears in merged strings and plain templates
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
