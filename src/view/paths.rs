// ABOUTME: Template path resolution relative to the application root
// ABOUTME: Maps template names to files under the View/ directory and checks they exist

use std::ffi::OsString;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::debug;

use super::error::{Result, ViewError};

/// Directory under the application root that holds template files
pub const VIEW_DIR: &str = "View";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    app_root: PathBuf,
}

impl TemplatePaths {
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
        }
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn view_root(&self) -> PathBuf {
        self.app_root.join(VIEW_DIR)
    }

    /// Absolute location of `template`.
    ///
    /// The name is appended verbatim: callers are framework code, not request input.
    pub fn resolve(&self, template: &str) -> PathBuf {
        let mut path: OsString = self.view_root().into_os_string();
        path.push(MAIN_SEPARATOR.to_string());
        path.push(template);
        PathBuf::from(path)
    }

    /// Resolve `template` and fail unless a regular file exists there
    pub fn locate(&self, template: &str) -> Result<PathBuf> {
        let path = self.resolve(template);
        debug!("Resolved template '{}' to {}", template, path.display());

        if !path.is_file() {
            return Err(ViewError::TemplateNotFound {
                template: template.to_string(),
                path,
            });
        }

        Ok(path)
    }
}
