// ABOUTME: Built-in placeholder template engine and its view adapter
// ABOUTME: Compiles {{ name }} templates to segment lists persisted in the compile directory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::view::cache::render_cached;
use crate::view::variables::display_value;
use crate::view::{EngineConfig, RenderCache, Result, SetMode, Variables, View, ViewError};

const ENGINE_NAME: &str = "plain";
const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    Variable(String),
}

/// A parsed template, as persisted in the compile directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledTemplate {
    pub source: PathBuf,
    pub source_modified: DateTime<Utc>,
    pub segments: Vec<Segment>,
}

/// Split template text into literal and placeholder segments
pub fn parse(template: &str, source: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }

        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or_else(|| ViewError::TemplateSyntax {
                template: template.to_string(),
                message: format!(
                    "unterminated '{}' at byte {}",
                    OPEN,
                    source.len() - rest.len() + start
                ),
            })?;

        let name = after_open[..end].trim();
        if name.is_empty() {
            return Err(ViewError::TemplateSyntax {
                template: template.to_string(),
                message: "empty placeholder".to_string(),
            });
        }
        segments.push(Segment::Variable(name.to_string()));
        rest = &after_open[end + CLOSE.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Ok(segments)
}

/// Walk a dotted name into `context`; numeric segments index arrays
pub fn lookup<'a>(context: &'a Value, name: &str) -> Option<&'a Value> {
    name.split('.').try_fold(context, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

impl CompiledTemplate {
    pub fn render(&self, context: &Value) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Variable(name) => {
                    if let Some(value) = lookup(context, name) {
                        output.push_str(&display_value(value));
                    }
                }
            }
        }
        output
    }
}

/// Location of the compiled artifact for `template_path`
pub fn artifact_path(compile_dir: &Path, template_path: &Path) -> PathBuf {
    let digest = Sha256::digest(template_path.to_string_lossy().as_bytes());
    compile_dir.join(format!("{}.json", hex::encode(digest)))
}

/// Reuse the artifact for `template_path` if it matches the source, otherwise compile and persist
fn load_or_compile(
    compile_dir: &Path,
    template: &str,
    template_path: &Path,
) -> Result<CompiledTemplate> {
    let source_modified: DateTime<Utc> = fs::metadata(template_path)?.modified()?.into();
    let artifact = artifact_path(compile_dir, template_path);

    if let Ok(bytes) = fs::read(&artifact) {
        match serde_json::from_slice::<CompiledTemplate>(&bytes) {
            Ok(compiled) if compiled.source_modified == source_modified => {
                debug!("Reusing compiled template {}", artifact.display());
                return Ok(compiled);
            }
            Ok(_) => debug!("Compiled template for '{}' is stale", template),
            Err(e) => warn!("Discarding unreadable artifact {}: {}", artifact.display(), e),
        }
    }

    let source = fs::read_to_string(template_path)?;
    let compiled = CompiledTemplate {
        source: template_path.to_path_buf(),
        source_modified,
        segments: parse(template, &source)?,
    };

    let encoded = serde_json::to_vec(&compiled)?;
    fs::write(&artifact, encoded).map_err(|e| ViewError::engine_configuration(&artifact, e))?;
    debug!(
        "Compiled '{}' into {} segments at {}",
        template,
        compiled.segments.len(),
        artifact.display()
    );
    Ok(compiled)
}

/// View over the built-in placeholder engine
pub struct PlainView {
    config: EngineConfig,
    vars: Variables,
    cache: Option<RenderCache>,
}

impl PlainView {
    /// Prepare the compile and cache directories and create an empty view
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.prepare_directories()?;
        info!("Plain view ready, compiling into {}", config.compile_dir().display());

        Ok(Self {
            cache: RenderCache::for_config(&config),
            vars: Variables::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl View for PlainView {
    fn set(&mut self, name: &str, value: Value, mode: SetMode) -> Result<()> {
        self.vars.set(name, value, &mode)
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn render(&mut self, template: &str) -> Result<String> {
        let template_path = self.config.paths().locate(template)?;
        let compile_dir = self.config.compile_dir();
        let vars = &self.vars;

        render_cached(self.cache.as_ref(), ENGINE_NAME, &template_path, vars, || {
            let compiled = load_or_compile(compile_dir, template, &template_path)?;
            Ok(compiled.render(&vars.to_json()))
        })
    }

    fn variables(&self) -> &Variables {
        &self.vars
    }

    fn engine_name(&self) -> &'static str {
        ENGINE_NAME
    }
}
