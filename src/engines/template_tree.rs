// ABOUTME: Snapshot of every template file under an application's View/ directory
// ABOUTME: Lets in-memory engines load sibling layouts and partials and notice changes between renders

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

use crate::view::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplateFile {
    path: PathBuf,
    modified: SystemTime,
}

/// Template files keyed by their `/`-separated name relative to `View/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    files: BTreeMap<String, TemplateFile>,
}

impl TemplateTree {
    /// Walk `view_root` and record every regular file with its modification time
    pub fn scan(view_root: &Path) -> Result<Self> {
        let mut files = BTreeMap::new();

        for entry in WalkDir::new(view_root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(name) = template_name(view_root, path) else {
                continue;
            };
            let modified = entry.metadata().map_err(io::Error::from)?.modified()?;
            files.insert(
                name,
                TemplateFile {
                    path: path.to_path_buf(),
                    modified,
                },
            );
        }

        debug!("Scanned {} template files under {}", files.len(), view_root.display());
        Ok(Self { files })
    }

    /// Make sure `name` is present, for names the scan spells differently
    pub fn with_template(mut self, name: &str, path: &Path) -> Result<Self> {
        if !self.files.contains_key(name) {
            let modified = fs::metadata(path)?.modified()?;
            self.files.insert(
                name.to_string(),
                TemplateFile {
                    path: path.to_path_buf(),
                    modified,
                },
            );
        }
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// `(name, path)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .map(|(name, file)| (name.as_str(), file.path.as_path()))
    }
}

fn template_name(view_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(view_root).ok()?;
    let segments: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(segments.join("/"))
}
