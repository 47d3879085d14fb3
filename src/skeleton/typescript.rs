//! JavaScript / TypeScript skeleton rules.
//!
//! Also the fallback for html, css and unknown files. Handles:
//! - `/* */` and `//` comment removal
//! - Body collapse for named functions, arrow functions bound to a variable,
//!   class/object methods and constructors
//! - Structural line filter (imports/exports, type declarations, class and
//!   function headers, top-level bindings, closing braces, method signatures)

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::common::{indent_width, BLOCK_PLACEHOLDER, BLOCK_PLACEHOLDER_COMMENT};
use super::SkeletonRuleset;

// ============ Patterns ============

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bfunction\s*\*?\s*[\w$]+\s*(?:<[^>]*>)?\s*\([^)]*\)(?:\s*:\s*[^{]+)?\s*\{\s*$",
    )
    .unwrap()
});

static ARROW_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:const|let|var)\s+[\w$]+\s*(?::\s*[^=]+)?\s*=\s*(?:async\s*)?(?:\([^)]*\)|[\w$]+)(?:\s*:\s*[^={]+?)?\s*=>\s*\{\s*$",
    )
    .unwrap()
});

static CONSTRUCTOR_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bconstructor\s*\([^)]*\)\s*\{\s*$").unwrap());

static METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s+(?:(?:public|private|protected|static|async|readonly|override|get|set)\s+)*\*?([\w$]+)\s*(?:<[^>]*>)?\s*\([^)]*\)(?:\s*:\s*[^{]+)?\s*\{\s*$",
    )
    .unwrap()
});

static METHOD_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s+(?:(?:public|private|protected|static|async|readonly|override|get|set)\s+)*\*?([\w$]+)\s*\(",
    )
    .unwrap()
});

static TOP_LEVEL_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:const|let|var)\s+[\w$]+").unwrap());

/// Words that look like a method name in `word (...) {` but open control flow
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "return", "function",
];

const STRUCTURAL_PREFIXES: &[&str] = &[
    "import ",
    "export ",
    "type ",
    "interface ",
    "enum ",
    "declare ",
    "class ",
    "abstract class ",
    "function ",
    "async function ",
];

// ============ Ruleset ============

/// JS/TS family ruleset
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptRules;

impl SkeletonRuleset for TypeScriptRules {
    fn strip_comments(&self, code: &str) -> String {
        let without_blocks = BLOCK_COMMENT.replace_all(code, |caps: &Captures| {
            let comment = &caps[0];
            if comment.contains(BLOCK_PLACEHOLDER_COMMENT) {
                comment.to_string()
            } else {
                String::new()
            }
        });
        LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
    }

    fn collapse_bodies(&self, code: &str) -> String {
        let lines: Vec<&str> = code.split('\n').collect();
        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            if opens_declaration_body(line) {
                if let Some((close, suffix)) = find_closer(&lines, i) {
                    let brace = line.trim_end().len() - 1;
                    output.push(format!("{}{}{}", &line[..brace], BLOCK_PLACEHOLDER, suffix));
                    i = close + 1;
                    continue;
                }
            }
            output.push(line.to_string());
            i += 1;
        }

        output.join("\n")
    }

    fn is_structural(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }

        STRUCTURAL_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
            || (indent_width(line) == 0 && TOP_LEVEL_BINDING.is_match(trimmed))
            || trimmed == "}"
            || trimmed == "};"
            || is_method_signature(line)
    }
}

// ============ Helpers ============

/// Whether the line is a declaration signature whose body opens at end of line
fn opens_declaration_body(line: &str) -> bool {
    if FUNCTION_DECL.is_match(line) || ARROW_DECL.is_match(line) || CONSTRUCTOR_DECL.is_match(line) {
        return true;
    }
    METHOD_DECL
        .captures(line)
        .is_some_and(|caps| !CONTROL_KEYWORDS.contains(&&caps[1]))
}

fn is_method_signature(line: &str) -> bool {
    METHOD_SIGNATURE
        .captures(line)
        .is_some_and(|caps| !CONTROL_KEYWORDS.contains(&&caps[1]))
}

/// Find the closing line of the body opened on `lines[open]`.
///
/// The closer is the first later line at the same indentation consisting of `}`
/// optionally followed by `;`, `,` or `)`. Nesting is not tracked.
fn find_closer<'a>(lines: &[&'a str], open: usize) -> Option<(usize, &'a str)> {
    let indent = indent_width(lines[open]);
    lines
        .iter()
        .enumerate()
        .skip(open + 1)
        .find_map(|(idx, line)| closer_suffix(line, indent).map(|suffix| (idx, suffix)))
}

fn closer_suffix(line: &str, indent: usize) -> Option<&str> {
    if indent_width(line) != indent {
        return None;
    }
    let rest = line.trim_start().strip_prefix('}')?.trim_end();
    rest.chars()
        .all(|c| matches!(c, ';' | ',' | ')'))
        .then_some(rest)
}
