// ABOUTME: View layer contract shared by every template engine adapter
// ABOUTME: Defines the set/get/render trait, engine selection and the supporting types

pub mod cache;
pub mod config;
pub mod error;
pub mod paths;
pub mod variables;

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::config::Settings;
use crate::engines::{HandlebarsView, PlainView, TeraView};

pub use cache::RenderCache;
pub use config::EngineConfig;
pub use error::{Result, ViewError};
pub use paths::TemplatePaths;
pub use variables::{SetMode, Variables, DEFAULT_DELIMITER};

/// Settings key naming the engine `create_view` should build
pub const ENGINE_KEY: &str = "view/engine";

/// Uniform rendering contract over one template engine.
///
/// A view owns its variables for one rendering session. `render` may be
/// called any number of times; the variables carry over between calls.
pub trait View {
    /// Bind `value` to `name`, overwriting or merging per `mode`
    fn set(&mut self, name: &str, value: Value, mode: SetMode) -> Result<()>;

    fn get(&self, name: &str) -> Option<&Value>;

    /// Render the template at `View/<template>` with the current variables.
    ///
    /// Fails with `ViewError::TemplateNotFound` before the engine is touched
    /// when the file does not exist.
    fn render(&mut self, template: &str) -> Result<String>;

    fn variables(&self) -> &Variables;

    fn engine_name(&self) -> &'static str;

    fn get_or(&self, name: &str, default: Value) -> Value {
        self.get(name).cloned().unwrap_or(default)
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        self.set(name, value, SetMode::Overwrite)
    }

    fn merge(&mut self, name: &str, value: Value, delimiter: &str) -> Result<()> {
        self.set(name, value, SetMode::merge_with(delimiter))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Plain,
    Handlebars,
    Tera,
}

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [EngineKind::Plain, EngineKind::Handlebars, EngineKind::Tera];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Plain => "plain",
            EngineKind::Handlebars => "handlebars",
            EngineKind::Tera => "tera",
        }
    }

    /// Engine named by the `view/engine` setting, `plain` when unset
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let name: Option<String> = settings.get(ENGINE_KEY, None)?;
        name.map_or(Ok(EngineKind::default()), |n| n.parse())
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(EngineKind::Plain),
            "handlebars" | "hbs" => Ok(EngineKind::Handlebars),
            "tera" => Ok(EngineKind::Tera),
            other => Err(ViewError::UnknownEngine(other.to_string())),
        }
    }
}

/// Build the adapter for `kind`, preparing its directories
pub fn create_view(kind: EngineKind, config: &EngineConfig) -> Result<Box<dyn View>> {
    let view: Box<dyn View> = match kind {
        EngineKind::Plain => Box::new(PlainView::new(config.clone())?),
        EngineKind::Handlebars => Box::new(HandlebarsView::new(config.clone())?),
        EngineKind::Tera => Box::new(TeraView::new(config.clone())?),
    };

    info!(
        "Created {} view for {}",
        view.engine_name(),
        config.app_root().display()
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_engine_kind_parsing() {
        assert_eq!("plain".parse::<EngineKind>().unwrap(), EngineKind::Plain);
        assert_eq!(" Handlebars ".parse::<EngineKind>().unwrap(), EngineKind::Handlebars);
        assert_eq!("hbs".parse::<EngineKind>().unwrap(), EngineKind::Handlebars);
        assert_eq!("tera".parse::<EngineKind>().unwrap(), EngineKind::Tera);
        assert!(matches!(
            "smarty".parse::<EngineKind>(),
            Err(ViewError::UnknownEngine(name)) if name == "smarty"
        ));
    }

    #[test]
    fn test_engine_kind_display_round_trips() {
        for kind in EngineKind::ALL {
            assert_eq!(kind.to_string().parse::<EngineKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_engine_kind_from_settings() {
        assert_eq!(
            EngineKind::from_settings(&Settings::new()).unwrap(),
            EngineKind::Plain
        );

        let settings = Settings::from_yaml_str("view:\n  engine: tera\n").unwrap();
        assert_eq!(EngineKind::from_settings(&settings).unwrap(), EngineKind::Tera);
    }

    #[test]
    fn test_create_view_for_every_engine() {
        let temp_dir = tempdir().unwrap();
        let config = EngineConfig::new(temp_dir.path());

        for kind in EngineKind::ALL {
            let mut view = create_view(kind, &config).unwrap();
            assert_eq!(view.engine_name(), kind.as_str());

            view.assign("title", json!("Home")).unwrap();
            view.merge("title", json!("Blog"), "|").unwrap();
            assert_eq!(view.get("title"), Some(&json!("Blog | Home")));
            assert_eq!(view.get_or("missing", json!(1)), json!(1));
        }

        assert!(config.compile_dir().is_dir());
        assert!(config.cache_dir().is_dir());
    }
}
