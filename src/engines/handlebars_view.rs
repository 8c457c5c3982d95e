// ABOUTME: View adapter over the Handlebars template engine
// ABOUTME: Registers the View/ tree so partials resolve, and re-registers it when files change

use handlebars::Handlebars;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::helpers;
use super::template_tree::TemplateTree;
use crate::view::cache::render_cached;
use crate::view::{EngineConfig, RenderCache, Result, SetMode, Variables, View};

const ENGINE_NAME: &str = "handlebars";

pub struct HandlebarsView {
    handlebars: Handlebars<'static>,
    registered: TemplateTree,
    config: EngineConfig,
    vars: Variables,
    cache: Option<RenderCache>,
}

impl HandlebarsView {
    /// Create the engine with the built-in helpers and prepare its directories.
    ///
    /// Handlebars compiles in memory, so nothing is written to the compile
    /// directory; it is still created and checked like every other adapter's.
    /// Templates are registered under their path relative to `View/`, which
    /// is also how partials refer to them.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.prepare_directories()?;

        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.set_dev_mode(false);
        helpers::register_helpers(&mut handlebars);

        info!("Handlebars view ready for {}", config.app_root().display());

        Ok(Self {
            handlebars,
            registered: TemplateTree::default(),
            cache: RenderCache::for_config(&config),
            vars: Variables::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `template` is currently compiled into the registry
    pub fn is_registered(&self, template: &str) -> bool {
        self.handlebars.has_template(template)
    }
}

/// Register every file under `view_root` unless the registry already matches it.
///
/// Siblings that fail to compile are skipped with a warning. The requested
/// template must compile.
fn ensure_registered(
    handlebars: &mut Handlebars<'static>,
    registered: &mut TemplateTree,
    view_root: &Path,
    template: &str,
    template_path: &Path,
) -> Result<()> {
    let tree = TemplateTree::scan(view_root)?.with_template(template, template_path)?;
    if *registered == tree && handlebars.has_template(template) {
        debug!("Handlebars templates under {} unchanged", view_root.display());
        return Ok(());
    }

    handlebars.clear_templates();
    *registered = TemplateTree::default();
    for (name, path) in tree.iter() {
        let source = fs::read_to_string(path)?;
        match handlebars.register_template_string(name, source) {
            Ok(()) => {}
            Err(e) if name == template => return Err(e.into()),
            Err(e) => warn!("Skipping handlebars template '{}': {}", name, e),
        }
    }

    debug!("Registered {} handlebars templates", tree.len());
    *registered = tree;
    Ok(())
}

impl View for HandlebarsView {
    fn set(&mut self, name: &str, value: Value, mode: SetMode) -> Result<()> {
        self.vars.set(name, value, &mode)
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn render(&mut self, template: &str) -> Result<String> {
        let template_path = self.config.paths().locate(template)?;
        let view_root = self.config.paths().view_root();
        let handlebars = &mut self.handlebars;
        let registered = &mut self.registered;
        let vars = &self.vars;

        render_cached(self.cache.as_ref(), ENGINE_NAME, &template_path, vars, || {
            ensure_registered(handlebars, registered, &view_root, template, &template_path)?;
            Ok(handlebars.render(template, &vars.to_json())?)
        })
    }

    fn variables(&self) -> &Variables {
        &self.vars
    }

    fn engine_name(&self) -> &'static str {
        ENGINE_NAME
    }
}
