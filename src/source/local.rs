use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use super::{check_relative_path, EntryKind, ProjectSource, SourceEntry};
use crate::error::{Result, SyncError};

/// Project tree backed by a directory on disk
#[derive(Debug, Clone)]
pub struct LocalProject {
    root: PathBuf,
    respect_gitignore: bool,
}

impl LocalProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: false,
        }
    }

    /// Apply `.gitignore` and hidden-file filtering when listing
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        if path.is_empty() {
            return Ok(self.root.clone());
        }
        check_relative_path(path)?;
        Ok(path.split('/').fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }

    /// Whether any segment of `path` is a symbolic link
    fn through_symlink(&self, path: &str) -> bool {
        let mut current = self.root.clone();
        path.split('/').filter(|s| !s.is_empty()).any(|segment| {
            current.push(segment);
            std::fs::symlink_metadata(&current).is_ok_and(|m| m.file_type().is_symlink())
        })
    }
}

impl ProjectSource for LocalProject {
    fn list(&self, dir: &str) -> Result<Vec<SourceEntry>> {
        let dir_path = self.resolve(dir)?;
        if !dir_path.is_dir() {
            return Err(SyncError::NotFound(dir_path.display().to_string()));
        }
        // Linked directories are listed but not descended into
        if self.through_symlink(dir) {
            debug!("not following symlinked directory {}", dir);
            return Ok(Vec::new());
        }

        let walker = WalkBuilder::new(&dir_path)
            .max_depth(Some(1))
            .standard_filters(self.respect_gitignore)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut entries = Vec::new();
        for result in walker {
            let entry = result?;
            if entry.depth() == 0 {
                continue;
            }
            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.resolve(path)?)?)
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(target, contents)?)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }
}
