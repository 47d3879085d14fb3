use tracing::warn;

use super::{check_relative_path, split_parent, EntryKind, ProjectSource, SourceEntry};
use crate::error::{Result, SyncError};

/// In-memory project tree.
///
/// Entries list in insertion order, which makes traversal order explicit in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    root: Vec<MemoryEntry>,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    name: String,
    node: MemoryNode,
}

#[derive(Debug, Clone)]
enum MemoryNode {
    File(String),
    Directory(Vec<MemoryEntry>),
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryProject::insert_file`]; invalid paths are logged and skipped
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        if let Err(err) = self.insert_file(path, contents) {
            warn!("skipping memory file {}: {}", path, err);
        }
        self
    }

    /// Builder form of [`MemoryProject::insert_dir`]; invalid paths are logged and skipped
    pub fn with_dir(mut self, path: &str) -> Self {
        if let Err(err) = self.insert_dir(path) {
            warn!("skipping memory directory {}: {}", path, err);
        }
        self
    }

    /// Add or replace a file, creating parent directories
    pub fn insert_file(&mut self, path: &str, contents: &str) -> Result<()> {
        check_relative_path(path)?;
        let (dir, name) = split_parent(path);
        let entries = self.dir_mut(dir)?;

        match entries.iter_mut().find(|e| e.name == name) {
            Some(MemoryEntry { node: MemoryNode::File(existing), .. }) => {
                *existing = contents.to_string();
            }
            Some(MemoryEntry { node: MemoryNode::Directory(_), .. }) => {
                return Err(SyncError::InvalidPath(format!("{path} is a directory")));
            }
            None => entries.push(MemoryEntry {
                name: name.to_string(),
                node: MemoryNode::File(contents.to_string()),
            }),
        }
        Ok(())
    }

    /// Add a (possibly empty) directory and its parents
    pub fn insert_dir(&mut self, path: &str) -> Result<()> {
        check_relative_path(path)?;
        self.dir_mut(path).map(|_| ())
    }

    /// Children of `dir`, creating any missing directory along the way
    fn dir_mut(&mut self, dir: &str) -> Result<&mut Vec<MemoryEntry>> {
        let mut entries = &mut self.root;
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            let pos = match entries.iter().position(|e| e.name == segment) {
                Some(pos) => pos,
                None => {
                    entries.push(MemoryEntry {
                        name: segment.to_string(),
                        node: MemoryNode::Directory(Vec::new()),
                    });
                    entries.len() - 1
                }
            };
            entries = match &mut entries[pos].node {
                MemoryNode::Directory(children) => children,
                MemoryNode::File(_) => {
                    return Err(SyncError::InvalidPath(format!("{segment} is a file")));
                }
            };
        }
        Ok(entries)
    }

    fn dir(&self, dir: &str) -> Option<&[MemoryEntry]> {
        let mut entries = self.root.as_slice();
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            entries = match &entries.iter().find(|e| e.name == segment)?.node {
                MemoryNode::Directory(children) => children,
                MemoryNode::File(_) => return None,
            };
        }
        Some(entries)
    }

    fn node(&self, path: &str) -> Option<&MemoryNode> {
        let (dir, name) = split_parent(path);
        self.dir(dir)?
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.node)
    }
}

impl ProjectSource for MemoryProject {
    fn list(&self, dir: &str) -> Result<Vec<SourceEntry>> {
        let entries = self
            .dir(dir)
            .ok_or_else(|| SyncError::NotFound(dir.to_string()))?;

        Ok(entries
            .iter()
            .map(|e| SourceEntry {
                name: e.name.clone(),
                kind: match e.node {
                    MemoryNode::File(_) => EntryKind::File,
                    MemoryNode::Directory(_) => EntryKind::Directory,
                },
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String> {
        match self.node(path) {
            Some(MemoryNode::File(contents)) => Ok(contents.clone()),
            _ => Err(SyncError::NotFound(path.to_string())),
        }
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        self.insert_file(path, contents)
    }

    fn exists(&self, path: &str) -> bool {
        path.is_empty() || self.node(path).is_some()
    }
}
