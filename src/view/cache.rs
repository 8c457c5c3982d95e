// ABOUTME: On-disk cache of rendered output keyed by template and variables
// ABOUTME: Serves entries younger than the configured lifetime and newer than their template

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

use super::config::EngineConfig;
use super::error::{Result, ViewError};
use super::variables::Variables;

const ENTRY_EXTENSION: &str = "out";

#[derive(Debug, Clone)]
pub struct RenderCache {
    dir: PathBuf,
    lifetime: Duration,
}

impl RenderCache {
    pub fn new(dir: impl Into<PathBuf>, lifetime: Duration) -> Self {
        Self {
            dir: dir.into(),
            lifetime,
        }
    }

    /// Cache for `config`, or `None` when caching is disabled
    pub fn for_config(config: &EngineConfig) -> Option<Self> {
        config
            .caching_enabled()
            .then(|| Self::new(config.cache_dir(), config.cache_lifetime()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Hex SHA-256 over the engine name, template path and serialised variables
    pub fn key(engine: &str, template_path: &Path, vars: &Variables) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(engine.as_bytes());
        hasher.update([0u8]);
        hasher.update(template_path.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(vars)?);
        Ok(hex::encode(hasher.finalize()))
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ENTRY_EXTENSION))
    }

    /// Cached output for `key`, if fresh
    pub fn lookup(&self, key: &str, template_path: &Path) -> Result<Option<String>> {
        let entry = self.entry_path(key);
        let Ok(metadata) = fs::metadata(&entry) else {
            debug!("Render cache miss for {}", template_path.display());
            return Ok(None);
        };

        let written = metadata.modified()?;
        let age = SystemTime::now()
            .duration_since(written)
            .unwrap_or(Duration::ZERO);
        if age > self.lifetime {
            debug!("Render cache entry for {} expired", template_path.display());
            return Ok(None);
        }

        let template_modified = fs::metadata(template_path)?.modified()?;
        if template_modified > written {
            debug!("Template {} changed since it was cached", template_path.display());
            return Ok(None);
        }

        let output = fs::read_to_string(&entry)?;
        debug!("Render cache hit for {}", template_path.display());
        Ok(Some(output))
    }

    pub fn store(&self, key: &str, output: &str) -> Result<()> {
        let entry = self.entry_path(key);
        fs::write(&entry, output).map_err(|e| ViewError::engine_configuration(&entry, e))
    }
}

/// Serve `template_path` from `cache` when possible, otherwise call `render` and store its output
pub fn render_cached<F>(
    cache: Option<&RenderCache>,
    engine: &str,
    template_path: &Path,
    vars: &Variables,
    render: F,
) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    let Some(cache) = cache else {
        return render();
    };

    let key = RenderCache::key(engine, template_path, vars)?;
    if let Some(output) = cache.lookup(&key, template_path)? {
        return Ok(output);
    }

    let output = render()?;
    cache.store(&key, &output)?;
    Ok(output)
}
