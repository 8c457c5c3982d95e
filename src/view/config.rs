// ABOUTME: Engine configuration resolved once per view construction
// ABOUTME: Derives compile and cache directories from the app root and caching from settings

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::error::{Result, ViewError};
use super::paths::TemplatePaths;
use crate::config::Settings;

/// Compile directory relative to the application root
pub const COMPILE_DIR: &str = "system/view";
/// Cache directory relative to the application root
pub const CACHE_DIR: &str = "system/cache";
/// Settings key holding the render cache lifetime in seconds
pub const CACHE_LIFETIME_KEY: &str = "cache/lifetime";

const WRITE_PROBE: &str = ".days-view-write-probe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    paths: TemplatePaths,
    compile_dir: PathBuf,
    cache_dir: PathBuf,
    cache_lifetime: u64,
}

impl EngineConfig {
    /// Configuration with caching disabled
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        let app_root = app_root.into();
        Self {
            compile_dir: app_root.join(COMPILE_DIR),
            cache_dir: app_root.join(CACHE_DIR),
            paths: TemplatePaths::new(app_root),
            cache_lifetime: 0,
        }
    }

    /// Resolve the configuration for `app_root`, reading the cache lifetime from `settings`
    pub fn resolve(app_root: impl Into<PathBuf>, settings: &Settings) -> Result<Self> {
        let lifetime: i64 = settings.get(CACHE_LIFETIME_KEY, 0)?;
        let config = Self::new(app_root).with_cache_lifetime(lifetime.max(0) as u64);

        debug!(
            "Engine configuration: root={}, caching={}, lifetime={}s",
            config.app_root().display(),
            config.caching_enabled(),
            config.cache_lifetime
        );
        Ok(config)
    }

    pub fn with_cache_lifetime(mut self, seconds: u64) -> Self {
        self.cache_lifetime = seconds;
        self
    }

    pub fn app_root(&self) -> &Path {
        self.paths.app_root()
    }

    pub fn paths(&self) -> &TemplatePaths {
        &self.paths
    }

    pub fn compile_dir(&self) -> &Path {
        &self.compile_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn cache_lifetime(&self) -> Duration {
        Duration::from_secs(self.cache_lifetime)
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache_lifetime > 0
    }

    /// Create the compile and cache directories and check both are writable.
    ///
    /// Every view constructor calls this. Any failure is returned as
    /// `ViewError::EngineConfiguration`; nothing is retried.
    pub fn prepare_directories(&self) -> Result<()> {
        for dir in [&self.compile_dir, &self.cache_dir] {
            fs::create_dir_all(dir).map_err(|e| ViewError::engine_configuration(dir, e))?;

            let probe = dir.join(WRITE_PROBE);
            fs::write(&probe, b"").map_err(|e| ViewError::engine_configuration(dir, e))?;
            fs::remove_file(&probe).map_err(|e| ViewError::engine_configuration(dir, e))?;
        }

        debug!(
            "Prepared compile dir {} and cache dir {}",
            self.compile_dir.display(),
            self.cache_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_directories_are_fixed_subpaths() {
        let config = EngineConfig::new("/app");
        assert_eq!(config.compile_dir(), Path::new("/app/system/view"));
        assert_eq!(config.cache_dir(), Path::new("/app/system/cache"));
        assert_eq!(config.paths().view_root(), PathBuf::from("/app/View"));
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_resolve_reads_cache_lifetime() {
        let settings = Settings::from_yaml_str("cache:\n  lifetime: 120\n").unwrap();
        let config = EngineConfig::resolve("/app", &settings).unwrap();

        assert!(config.caching_enabled());
        assert_eq!(config.cache_lifetime(), Duration::from_secs(120));
    }

    #[test]
    fn test_resolve_defaults_to_disabled() {
        let config = EngineConfig::resolve("/app", &Settings::new()).unwrap();
        assert!(!config.caching_enabled());

        let negative = Settings::from_yaml_str("cache:\n  lifetime: -5\n").unwrap();
        let config = EngineConfig::resolve("/app", &negative).unwrap();
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_resolve_rejects_non_numeric_lifetime() {
        let settings = Settings::from_yaml_str("cache:\n  lifetime: never\n").unwrap();
        let result = EngineConfig::resolve("/app", &settings);
        assert!(matches!(result, Err(ViewError::Config(_))));
    }

    #[test]
    fn test_prepare_directories_creates_both() {
        let temp_dir = tempdir().unwrap();
        let config = EngineConfig::new(temp_dir.path());

        config.prepare_directories().unwrap();

        assert!(config.compile_dir().is_dir());
        assert!(config.cache_dir().is_dir());
        assert!(!config.compile_dir().join(WRITE_PROBE).exists());
    }

    #[test]
    fn test_prepare_directories_fails_fast() {
        let temp_dir = tempdir().unwrap();
        // A regular file where the "system" directory should go
        std::fs::write(temp_dir.path().join("system"), "not a dir").unwrap();
        let config = EngineConfig::new(temp_dir.path());

        match config.prepare_directories() {
            Err(ViewError::EngineConfiguration { path, .. }) => {
                assert!(path.ends_with("system/view"));
            }
            other => panic!("expected EngineConfiguration, got {:?}", other),
        }
    }
}
