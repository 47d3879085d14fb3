//! Engine configuration shared by every walker and the diff engine.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::LanguageTag;

/// Directory names no walk ever descends into
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    "__pycache__",
    ".pytest_cache",
    ".venv",
    "venv",
];

/// Lookahead window used to resynchronize diffs
pub const DEFAULT_DIFF_LOOKAHEAD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub ignore_dirs: BTreeSet<String>,
    /// Languages whose files go into the project map
    pub skeleton_languages: Vec<LanguageTag>,
    pub diff_lookahead: usize,
    /// Honour `.gitignore` and hidden-file rules when listing on disk
    pub respect_gitignore: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            skeleton_languages: vec![
                LanguageTag::JavaScript,
                LanguageTag::TypeScript,
                LanguageTag::Python,
            ],
            diff_lookahead: DEFAULT_DIFF_LOOKAHEAD,
            respect_gitignore: false,
        }
    }
}

impl SyncConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.contains(name)
    }

    /// Whether a file belongs in the project map
    pub fn is_skeleton_eligible(&self, filename: &str) -> bool {
        self.skeleton_languages
            .contains(&LanguageTag::classify(filename))
    }
}
