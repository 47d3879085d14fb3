//! Skeleton extraction: heuristic code compression for project context
//!
//! A skeleton keeps the structural lines of a file (imports, declarations,
//! signatures, closing braces) and drops comments and implementation bodies.
//! Extraction is pattern based, not a parser: unusual formatting simply leaves
//! a body uncollapsed.
//!
//! ## Architecture
//!
//! ```text
//! skeleton/
//! ├── mod.rs         - SkeletonRuleset trait, entry points
//! ├── common.rs      - Placeholders and line helpers
//! ├── typescript.rs  - JS/TS family rules (also used for html, css, unknown)
//! └── python.rs      - Python rules
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use skeleton::skeletonize;
//!
//! let result = skeletonize("def foo():\n    return 1\n", "main.py");
//! println!("{}", result.skeleton);
//! ```

pub mod common;
pub mod python;
pub mod typescript;

use serde::{Deserialize, Serialize};

use crate::language::LanguageTag;

// ============ Ruleset ============

/// One language family's skeleton heuristics.
///
/// The three steps run in order: comments are stripped, bodies collapsed, and
/// what remains is filtered line by line. A parser-backed implementation can
/// replace a heuristic one without changing callers.
pub trait SkeletonRuleset: Sync {
    /// Remove comments (and blank docstrings) from the source
    fn strip_comments(&self, code: &str) -> String;

    /// Replace recognized declaration bodies with a placeholder, keeping signatures
    fn collapse_bodies(&self, code: &str) -> String;

    /// Whether a line (untrimmed, non-blank) is structural
    fn is_structural(&self, line: &str) -> bool;

    /// Keep the structural lines of collapsed code
    fn filter_structural(&self, code: &str) -> String {
        common::filter_lines(code, |line| self.is_structural(line))
    }

    /// Run the full extraction
    fn extract(&self, code: &str) -> String {
        let stripped = self.strip_comments(code);
        let collapsed = self.collapse_bodies(&stripped);
        self.filter_structural(&collapsed)
    }
}

/// Extract a skeleton with an explicit ruleset
pub fn extract_skeleton(code: &str, ruleset: &dyn SkeletonRuleset) -> String {
    ruleset.extract(code)
}

// ============ Result Type ============

/// Result of skeleton extraction for one file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonResult {
    pub skeleton: String,
    pub language: LanguageTag,
    pub original_lines: usize,
    pub skeleton_lines: usize,
}

impl SkeletonResult {
    /// Calculate compression ratio (0.0 to 1.0)
    pub fn compression_ratio(&self) -> f64 {
        if self.original_lines == 0 {
            return 0.0;
        }
        let diff = self.original_lines as f64 - self.skeleton_lines as f64;
        (diff / self.original_lines as f64).max(0.0)
    }
}

// ============ Main Entry Point ============

/// Skeletonize source code, picking the ruleset from the filename
pub fn skeletonize(content: &str, filename: &str) -> SkeletonResult {
    let language = LanguageTag::classify(filename);
    skeletonize_as(content, language)
}

/// Skeletonize source code with a known language
pub fn skeletonize_as(content: &str, language: LanguageTag) -> SkeletonResult {
    let skeleton = extract_skeleton(content, language.ruleset());
    let skeleton_lines = if skeleton.is_empty() {
        0
    } else {
        skeleton.split('\n').count()
    };

    SkeletonResult {
        original_lines: content.split('\n').count(),
        skeleton_lines,
        skeleton,
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeletonize_dispatches_python() {
        let code = "import os\n\ndef hello():\n    print('hi')\n";
        let result = skeletonize(code, "hello.py");
        assert_eq!(result.language, LanguageTag::Python);
        assert_eq!(result.skeleton, "import os\ndef hello():");
    }

    #[test]
    fn test_unknown_falls_back_to_js_rules() {
        let code = "function foo(a,b) {\n  return a+b;\n}";
        let result = skeletonize(code, "notes.txt");
        assert_eq!(result.language, LanguageTag::Unknown);
        assert_eq!(result.skeleton, "function foo(a,b) { /* ... */ }");
    }

    #[test]
    fn test_empty_input() {
        let result = skeletonize("", "empty.ts");
        assert_eq!(result.skeleton, "");
        assert_eq!(result.skeleton_lines, 0);
        assert_eq!(result.original_lines, 1);
    }

    #[test]
    fn test_compression_ratio() {
        let result = SkeletonResult {
            skeleton: "def foo(): ...".to_string(),
            language: LanguageTag::Python,
            original_lines: 100,
            skeleton_lines: 20,
        };
        assert!((result.compression_ratio() - 0.8).abs() < 0.01);
    }
}
