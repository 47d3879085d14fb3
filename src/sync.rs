//! Syncing an incoming code block into the project.
//!
//! ```text
//! code block ──► detect_filename ──► locate
//!                                      ├── found, same text  ─► UpToDate
//!                                      ├── found, different  ─► Review (diff)
//!                                      └── not found         ─► Create (candidate paths)
//! ```
//!
//! [`Workspace`] holds the scanned tree and project map and rebuilds both
//! from scratch after every write.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::diff::{diff_with_lookahead, DiffLine, DiffSummary};
use crate::error::Result;
use crate::source::{check_relative_path, ProjectSource};
use crate::walk::{build_project_map, build_tree, collect_directories, locate, FileNode};

/// Used when a code block carries no filename comment
pub const DEFAULT_FILENAME: &str = "generated_file.txt";

static FILENAME_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?://|#|--)\s*([\w.-]+\.\w+)").unwrap());

/// Filename named by a comment on the block's first line (`// index.js`, `# main.py`)
pub fn detect_filename(code: &str) -> String {
    let first_line = code.split('\n').next().unwrap_or_default();
    FILENAME_HINT
        .captures(first_line)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

// ============ Plans ============

/// An update to an existing file, awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub path: String,
    pub filename: String,
    pub original: String,
    pub modified: String,
    pub diff: Vec<DiffLine>,
}

impl Review {
    pub fn summary(&self) -> DiffSummary {
        DiffSummary::of(&self.diff)
    }
}

/// Code for a file that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingFile {
    pub filename: String,
    pub code: String,
    /// Suggested creation paths: the root first, then every directory
    pub candidates: Vec<String>,
}

impl PendingFile {
    pub fn new(filename: &str, code: &str, tree: &[FileNode]) -> Self {
        let candidates = std::iter::once(filename.to_string())
            .chain(
                collect_directories(tree)
                    .into_iter()
                    .map(|dir| format!("{dir}/{filename}")),
            )
            .collect();

        Self {
            filename: filename.to_string(),
            code: code.to_string(),
            candidates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncPlan {
    UpToDate { path: String },
    Review(Review),
    Create(PendingFile),
}

/// Decide what syncing `code` as `filename` would do
pub fn plan_sync<S: ProjectSource + ?Sized>(
    source: &S,
    config: &SyncConfig,
    filename: &str,
    code: &str,
) -> Result<SyncPlan> {
    let Some(path) = locate(source, config, filename) else {
        debug!("{} not found, offering creation paths", filename);
        let tree = build_tree(source, config);
        return Ok(SyncPlan::Create(PendingFile::new(filename, code, &tree)));
    };

    let original = source.read(&path)?;
    if original == code {
        info!("{} is already up to date", filename);
        return Ok(SyncPlan::UpToDate { path });
    }

    let diff = diff_with_lookahead(&original, code, config.diff_lookahead);
    Ok(SyncPlan::Review(Review {
        path,
        filename: filename.to_string(),
        original,
        modified: code.to_string(),
        diff,
    }))
}

// ============ Workspace ============

/// A connected project with its current tree and project map
#[derive(Debug)]
pub struct Workspace<S: ProjectSource> {
    source: S,
    config: SyncConfig,
    tree: Vec<FileNode>,
    project_map: String,
}

impl<S: ProjectSource> Workspace<S> {
    /// Scan the project once
    pub fn open(source: S, config: SyncConfig) -> Self {
        let mut workspace = Self {
            source,
            config,
            tree: Vec::new(),
            project_map: String::new(),
        };
        workspace.refresh();
        workspace
    }

    /// Rescan, replacing the tree and project map
    pub fn refresh(&mut self) {
        self.tree = build_tree(&self.source, &self.config);
        self.project_map = build_project_map(&self.source, &self.config);
        info!(
            "workspace scanned: {} top-level entries, {} bytes of project map",
            self.tree.len(),
            self.project_map.len()
        );
    }

    pub fn tree(&self) -> &[FileNode] {
        &self.tree
    }

    pub fn project_map(&self) -> &str {
        &self.project_map
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn plan(&self, filename: &str, code: &str) -> Result<SyncPlan> {
        plan_sync(&self.source, &self.config, filename, code)
    }

    /// Write the reviewed text over the existing file
    pub fn apply_review(&mut self, review: &Review) -> Result<()> {
        self.source.write(&review.path, &review.modified)?;
        let summary = review.summary();
        info!(
            "updated {} (+{} -{})",
            review.path, summary.added, summary.removed
        );
        self.refresh();
        Ok(())
    }

    /// Write a pending file at `path` (one of its candidates or any custom path)
    pub fn create_file(&mut self, pending: &PendingFile, path: &str) -> Result<()> {
        check_relative_path(path)?;
        self.source.write(path, &pending.code)?;
        info!("created {}", path);
        self.refresh();
        Ok(())
    }
}
