// ABOUTME: View adapter over the Tera template engine
// ABOUTME: Loads the whole View/ tree so layouts and includes resolve, and reloads it on change

use serde_json::Value;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, info};

use super::template_tree::TemplateTree;
use crate::view::cache::render_cached;
use crate::view::{EngineConfig, RenderCache, Result, SetMode, Variables, View};

const ENGINE_NAME: &str = "tera";

pub struct TeraView {
    tera: Tera,
    loaded: TemplateTree,
    config: EngineConfig,
    vars: Variables,
    cache: Option<RenderCache>,
}

impl TeraView {
    /// Create an empty Tera instance and prepare the directories.
    ///
    /// Like Handlebars, Tera keeps compiled templates in memory only. Every file
    /// under `View/` is loaded under its relative path, so `extends` and
    /// `include` refer to siblings by that name.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.prepare_directories()?;
        info!("Tera view ready for {}", config.app_root().display());

        Ok(Self {
            tera: Tera::default(),
            loaded: TemplateTree::default(),
            cache: RenderCache::for_config(&config),
            vars: Variables::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Rebuild `tera` from the files under `view_root` unless nothing changed.
///
/// Loading is all-or-nothing, as with `Tera::new`.
fn ensure_loaded(
    tera: &mut Tera,
    loaded: &mut TemplateTree,
    view_root: &Path,
    template: &str,
    template_path: &Path,
) -> Result<()> {
    let tree = TemplateTree::scan(view_root)?.with_template(template, template_path)?;
    if *loaded == tree {
        debug!("Tera templates under {} unchanged", view_root.display());
        return Ok(());
    }

    let files: Vec<(&Path, Option<&str>)> =
        tree.iter().map(|(name, path)| (path, Some(name))).collect();
    let mut fresh = Tera::default();
    fresh.add_template_files(files)?;
    debug!("Loaded {} tera templates", tree.len());

    *tera = fresh;
    *loaded = tree;
    Ok(())
}

impl View for TeraView {
    fn set(&mut self, name: &str, value: Value, mode: SetMode) -> Result<()> {
        self.vars.set(name, value, &mode)
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn render(&mut self, template: &str) -> Result<String> {
        let template_path = self.config.paths().locate(template)?;
        let view_root = self.config.paths().view_root();
        let tera = &mut self.tera;
        let loaded = &mut self.loaded;
        let vars = &self.vars;

        render_cached(self.cache.as_ref(), ENGINE_NAME, &template_path, vars, || {
            ensure_loaded(tera, loaded, &view_root, template, &template_path)?;
            let context = Context::from_serialize(vars)?;
            Ok(tera.render(template, &context)?)
        })
    }

    fn variables(&self) -> &Variables {
        &self.vars
    }

    fn engine_name(&self) -> &'static str {
        ENGINE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewError;
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn app_with(template: &str, contents: &str) -> (TempDir, TeraView) {
        let temp_dir = tempdir().unwrap();
        let view_dir = temp_dir.path().join("View");
        fs::create_dir_all(&view_dir).unwrap();
        fs::write(view_dir.join(template), contents).unwrap();

        let view = TeraView::new(EngineConfig::new(temp_dir.path())).unwrap();
        (temp_dir, view)
    }

    #[test]
    fn test_render_with_variables() {
        let (_dir, mut view) = app_with(
            "index.tera",
            "<h1>{{ title | upper }}</h1>{% for i in items %}[{{ i }}]{% endfor %}",
        );
        view.assign("title", json!("home")).unwrap();
        view.assign("items", json!([1, 2])).unwrap();

        assert_eq!(view.render("index.tera").unwrap(), "<h1>HOME</h1>[1][2]");
    }

    #[test]
    fn test_changed_template_is_reloaded() {
        let (dir, mut view) = app_with("index.tera", "one");
        assert_eq!(view.render("index.tera").unwrap(), "one");

        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(dir.path().join("View/index.tera"), "two").unwrap();
        assert_eq!(view.render("index.tera").unwrap(), "two");
    }

    #[test]
    fn test_undefined_variable_error_propagates() {
        let (_dir, mut view) = app_with("index.tera", "{{ missing }}");
        assert!(matches!(view.render("index.tera"), Err(ViewError::Tera(_))));
    }

    #[test]
    fn test_extends_sibling_layout() {
        let (dir, mut view) = app_with(
            "page.html",
            "{% extends \"layout.html\" %}{% block body %}<p>{{ title }}</p>{% endblock %}",
        );
        fs::write(
            dir.path().join("View/layout.html"),
            "<main>{% block body %}{% endblock body %}</main>",
        )
        .unwrap();
        view.assign("title", json!("Home")).unwrap();

        assert_eq!(view.render("page.html").unwrap(), "<main><p>Home</p></main>");
    }

    #[test]
    fn test_include_nested_sibling() {
        let (dir, mut view) = app_with(
            "page.html",
            "{% include \"partials/header.html\" %}body",
        );
        fs::create_dir_all(dir.path().join("View/partials")).unwrap();
        fs::write(
            dir.path().join("View/partials/header.html"),
            "<h1>{{ title }}</h1>",
        )
        .unwrap();
        view.assign("title", json!("Home")).unwrap();

        assert_eq!(view.render("page.html").unwrap(), "<h1>Home</h1>body");
    }

    #[test]
    fn test_changed_layout_is_reloaded() {
        let (dir, mut view) = app_with("page.html", "{% extends \"layout.html\" %}");
        fs::write(dir.path().join("View/layout.html"), "one").unwrap();
        assert_eq!(view.render("page.html").unwrap(), "one");

        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(dir.path().join("View/layout.html"), "two").unwrap();
        assert_eq!(view.render("page.html").unwrap(), "two");
    }

    #[test]
    fn test_missing_template() {
        let (_dir, mut view) = app_with("index.tera", "x");
        assert!(matches!(
            view.render("missing.tera"),
            Err(ViewError::TemplateNotFound { .. })
        ));
    }
}
