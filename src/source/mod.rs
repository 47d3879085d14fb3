//! Directory collaborator: where project trees and file contents come from.
//!
//! Walkers only ever see slash-joined paths relative to the project root
//! (`""` is the root itself). Implementations live in the submodules:
//! - `memory` - an in-memory tree, insertion ordered
//! - `local`  - a directory on disk, listed with `ignore::WalkBuilder`

pub mod local;
pub mod memory;

pub use local::LocalProject;
pub use memory::MemoryProject;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::File }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::Directory }
    }
}

/// Access to a project tree.
///
/// `list` must return entries in a stable order; every walker consumes it
/// sequentially, depth first.
pub trait ProjectSource {
    /// Children of a directory
    fn list(&self, dir: &str) -> Result<Vec<SourceEntry>>;

    /// Full text of a file
    fn read(&self, path: &str) -> Result<String>;

    /// Create or overwrite a file, creating missing parent directories
    fn write(&mut self, path: &str, contents: &str) -> Result<()>;

    fn exists(&self, path: &str) -> bool;
}

// ============ Path Helpers ============

/// Join a directory path and an entry name
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Split `a/b/c` into `("a/b", "c")`
pub fn split_parent(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

/// Reject paths that are empty, absolute or step outside the root
pub fn check_relative_path(path: &str) -> Result<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| matches!(segment, "" | "." | ".."));
    if invalid {
        return Err(SyncError::InvalidPath(path.to_string()));
    }
    Ok(())
}
