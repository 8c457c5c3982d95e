// ABOUTME: Implementation of the preview CLI commands
// ABOUTME: Builds a view from settings, applies command line variables and renders or reports paths

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Args;
use crate::config::Settings;
use crate::view::{create_view, EngineConfig, EngineKind, SetMode, View};

/// Options for a single render command
pub struct RenderOptions {
    pub template: String,
    pub engine: Option<String>,
    pub vars: Vec<String>,
    pub merges: Vec<String>,
    pub delimiter: String,
    pub output: Option<PathBuf>,
}

/// Render a template and print or write the result
pub fn render_template(app_root: &Path, settings: &Settings, options: RenderOptions) -> Result<()> {
    let kind = match &options.engine {
        Some(name) => name.parse::<EngineKind>()?,
        None => EngineKind::from_settings(settings)?,
    };
    let config = EngineConfig::resolve(app_root, settings)?;
    let mut view = create_view(kind, &config)?;

    apply_variables(view.as_mut(), &options)?;
    debug!(
        "Rendering '{}' with {} variables",
        options.template,
        view.variables().len()
    );

    let output = view.render(&options.template)?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!(
                "Rendered {} to {} ({} bytes)",
                options.template,
                path.display(),
                output.len()
            );
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Apply `--var` assignments first, then `--merge` assignments, in command line order
pub fn apply_variables(view: &mut dyn View, options: &RenderOptions) -> Result<()> {
    for (name, value) in Args::parse_variables(&options.vars)? {
        view.set(&name, Value::String(value), SetMode::Overwrite)?;
    }

    let merge = SetMode::merge_with(&options.delimiter);
    for (name, value) in Args::parse_variables(&options.merges)? {
        view.set(&name, Value::String(value), merge.clone())?;
    }

    Ok(())
}

/// Print where templates, compiled artifacts and cached output live
pub fn show_paths(app_root: &Path, settings: &Settings) -> Result<()> {
    let config = EngineConfig::resolve(app_root, settings)?;
    let kind = EngineKind::from_settings(settings)?;

    println!("engine:      {}", kind);
    println!("view root:   {}", config.paths().view_root().display());
    println!("compile dir: {}", config.compile_dir().display());
    println!("cache dir:   {}", config.cache_dir().display());
    if config.caching_enabled() {
        println!(
            "caching:     enabled ({}s)",
            config.cache_lifetime().as_secs()
        );
    } else {
        println!("caching:     disabled");
    }

    Ok(())
}
