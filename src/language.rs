//! Filename → language classification.

use serde::{Deserialize, Serialize};

use crate::skeleton::{python::PythonRules, typescript::TypeScriptRules, SkeletonRuleset};

/// Languages the sync engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    JavaScript,
    TypeScript,
    Python,
    Html,
    Css,
    Unknown,
}

impl LanguageTag {
    /// Detect language from a filename by its extension (case-insensitive)
    pub fn classify(filename: &str) -> Self {
        // A dotless name is its own "extension", so `js` alone classifies as JavaScript.
        let ext = filename.rsplit('.').next().unwrap_or_default();
        Self::from_extension(ext)
    }

    /// Map a bare extension (no leading dot) to a language
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "py" => Self::Python,
            "html" | "htm" => Self::Html,
            "css" | "scss" | "sass" => Self::Css,
            _ => Self::Unknown,
        }
    }

    pub fn is_supported(self) -> bool {
        self != Self::Unknown
    }

    /// User-facing language name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Python => "Python",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Unknown => "Unknown",
        }
    }

    /// Info string for a markdown code fence
    pub fn fence(self) -> &'static str {
        match self {
            Self::Python => "python",
            _ => "",
        }
    }

    /// Skeleton ruleset for this language.
    ///
    /// Only Python has its own rules; every other tag, including markup and
    /// `unknown`, goes through the JS/TS rules.
    pub fn ruleset(self) -> &'static dyn SkeletonRuleset {
        match self {
            Self::Python => &PythonRules,
            Self::JavaScript | Self::TypeScript | Self::Html | Self::Css | Self::Unknown => {
                &TypeScriptRules
            }
        }
    }
}
