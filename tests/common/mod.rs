// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Builds temporary application roots with View/ templates and engine configurations

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use days_view::{create_view, EngineConfig, EngineKind, View};

/// Template that renders identically under every engine
pub const INDEX_TEMPLATE: &str = "<title>{{ title }}</title>";

pub struct TestApp {
    dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("View")).expect("Failed to create View dir");
        Self { dir }
    }

    pub fn with_template(self, name: &str, contents: &str) -> Self {
        self.write_template(name, contents);
        self
    }

    pub fn write_template(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root().join("View").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create template dir");
        }
        fs::write(&path, contents).expect("Failed to write template");
        path
    }

    pub fn remove_template(&self, name: &str) {
        fs::remove_file(self.root().join("View").join(name)).expect("Failed to remove template");
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig::new(self.root())
    }

    pub fn caching_config(&self, lifetime_secs: u64) -> EngineConfig {
        self.config().with_cache_lifetime(lifetime_secs)
    }

    pub fn view(&self, kind: EngineKind) -> Box<dyn View> {
        create_view(kind, &self.config()).expect("Failed to create view")
    }

    pub fn files_in(&self, relative_dir: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.root().join(relative_dir))
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
