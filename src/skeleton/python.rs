//! Python skeleton rules.
//!
//! Docstrings are blanked and `#` comments dropped, then block bodies are
//! collapsed by indentation:
//! - `def` / `async def` bodies always collapse to `pass`
//! - `class` bodies collapse only when no direct child is a def, class or
//!   decorator, so method signatures stay visible
//!
//! The line filter is nesting aware: an indented line survives only under a
//! surviving header, so nothing kept under a dropped `if` or `try` is
//! reattached to the block above it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::common::{
    filter_nested_lines, indent_width, indented_block_end, is_blank, PYTHON_BODY_INDENT,
    PYTHON_PLACEHOLDER,
};
use super::SkeletonRuleset;

// ============ Patterns ============

static DOUBLE_DOCSTRING: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)""".*?""""#).unwrap());

static SINGLE_DOCSTRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)'''.*?'''").unwrap());

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"#.*").unwrap());

static DEF_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:async\s+)?def\s+\w+\s*\(").unwrap());

static CLASS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*class\s+\w+\s*(?:\([^)]*\))?\s*:\s*$").unwrap());

static MODULE_CONSTANT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*\s*=").unwrap());

/// Longest `def` header (in lines) we try to match
const MAX_HEADER_LINES: usize = 24;

const STRUCTURAL_PREFIXES: &[&str] = &["import ", "from ", "class ", "def ", "async def ", "@"];

// ============ Ruleset ============

/// Python ruleset
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonRules;

impl SkeletonRuleset for PythonRules {
    fn strip_comments(&self, code: &str) -> String {
        let result = DOUBLE_DOCSTRING.replace_all(code, r#""""""""#);
        let result = SINGLE_DOCSTRING.replace_all(&result, "''''''");
        LINE_COMMENT.replace_all(&result, "").into_owned()
    }

    fn collapse_bodies(&self, code: &str) -> String {
        let lines: Vec<&str> = code.split('\n').collect();
        let without_defs = collapse_functions(&lines);
        let lines: Vec<&str> = without_defs.iter().map(String::as_str).collect();
        collapse_classes(&lines).join("\n")
    }

    fn is_structural(&self, line: &str) -> bool {
        let trimmed = line.trim();
        STRUCTURAL_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
            || MODULE_CONSTANT.is_match(trimmed)
    }

    fn filter_structural(&self, code: &str) -> String {
        filter_nested_lines(code, |line| self.is_structural(line))
    }
}

// ============ Body Collapse ============

fn collapse_functions(lines: &[&str]) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if DEF_START.is_match(line) {
            if let Some(header_end) = def_header_end(lines, i) {
                let indent = indent_width(line);
                let body_end = indented_block_end(lines, header_end + 1, indent);
                output.extend(lines[i..=header_end].iter().map(|l| l.to_string()));
                if body_end > header_end + 1 {
                    output.push(placeholder(indent));
                }
                i = body_end;
                continue;
            }
        }
        output.push(line.to_string());
        i += 1;
    }

    output
}

fn collapse_classes(lines: &[&str]) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        output.push(line.to_string());
        if CLASS_HEADER.is_match(line) {
            let indent = indent_width(line);
            let body_end = indented_block_end(lines, i + 1, indent);
            let body = &lines[i + 1..body_end];
            if !body.is_empty() && !direct_children(body).any(starts_block) {
                output.push(placeholder(indent));
                i = body_end;
                continue;
            }
        }
        i += 1;
    }

    output
}

/// Index of the line that ends the `def` header starting at `start`.
///
/// Parameters may span lines; the header ends where brackets balance and the
/// line ends with `:`. Returns `None` for one-liners and unterminated headers.
fn def_header_end(lines: &[&str], start: usize) -> Option<usize> {
    let mut depth: i32 = 0;

    for (offset, line) in lines[start..].iter().enumerate().take(MAX_HEADER_LINES) {
        if offset > 0 && starts_block(line) {
            return None;
        }
        for c in line.chars() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
        }
        if depth <= 0 {
            return line.trim_end().ends_with(':').then_some(start + offset);
        }
    }

    None
}

/// Body lines at the body's outermost indentation
fn direct_children<'a>(body: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
    let child_indent = body
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);
    body.iter()
        .copied()
        .filter(move |l| !is_blank(l) && indent_width(l) == child_indent)
}

fn starts_block(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("def ")
        || trimmed.starts_with("async def ")
        || trimmed.starts_with("class ")
        || trimmed.starts_with('@')
}

fn placeholder(header_indent: usize) -> String {
    format!("{}{}", " ".repeat(header_indent + PYTHON_BODY_INDENT), PYTHON_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(code: &str) -> String {
        PythonRules.extract(code)
    }

    #[test]
    fn test_class_with_method() {
        let code = "class Foo:\n    def bar(self):\n        return 1\n";
        assert_eq!(extract(code), "class Foo:\n    def bar(self):");
    }

    #[test]
    fn test_collapse_inserts_placeholder() {
        let code = "def f(x):\n    y = x + 1\n\n    return y\n\nTOTAL = 3";
        assert_eq!(
            PythonRules.collapse_bodies(code),
            "def f(x):\n    pass\n\nTOTAL = 3"
        );
    }

    #[test]
    fn test_strip_docstrings_and_comments() {
        let code = "def f():\n    \"\"\"Docs\n    more.\"\"\"\n    x = 1  # note\n    '''alt'''";
        assert_eq!(
            PythonRules.strip_comments(code),
            "def f():\n    \"\"\"\"\"\"\n    x = 1  \n    ''''''"
        );
    }

    #[test]
    fn test_nested_defs_disappear() {
        let code = "def outer():\n    import json\n    def inner():\n        pass\n    return inner\n";
        assert_eq!(extract(code), "def outer():");
    }

    #[test]
    fn test_multiline_signature() {
        let code = "async def fetch(\n    url: str,\n    retries: int = 3,\n) -> Dict[str, int]:\n    return {}\n";
        let collapsed = PythonRules.collapse_bodies(code);
        assert!(collapsed.contains(") -> Dict[str, int]:\n    pass"));
        assert!(!collapsed.contains("return {}"));
        assert_eq!(extract(code), "async def fetch(");
    }

    #[test]
    fn test_one_liner_def_kept() {
        let code = "def f(): return 1\nx = 2";
        assert_eq!(extract(code), "def f(): return 1");
    }

    #[test]
    fn test_data_class_body_collapses() {
        let code = "@dataclass\nclass Point:\n    X_AXIS = 0\n    y: int\n";
        assert_eq!(
            PythonRules.collapse_bodies(code),
            "@dataclass\nclass Point:\n    pass\n"
        );
        assert_eq!(extract(code), "@dataclass\nclass Point:");
    }

    #[test]
    fn test_decorators_imports_and_constants() {
        let code = r#"
from typing import List
import os

MAX_SIZE = 10
counter = 0

class Service:
    @property
    def name(self) -> str:
        return "svc"

    async def run(self, items: List[str]) -> None:
        for item in items:
            print(item)
"#;
        let expected = "from typing import List\nimport os\nMAX_SIZE = 10\nclass Service:\n    @property\n    def name(self) -> str:\n    async def run(self, items: List[str]) -> None:";
        assert_eq!(extract(code), expected);
    }

    #[test]
    fn test_lines_under_dropped_block_stay_out() {
        let code = "import sys\n\ndef helper():\n    return 1\n\nif sys.platform == \"win32\":\n    import winreg\n    REG_PATH = \"x\"\n";
        let once = extract(code);
        assert_eq!(once, "import sys\ndef helper():");
        assert_eq!(extract(&once), once);
    }

    #[test]
    fn test_class_with_method_only_under_if_collapses() {
        let code = "class A:\n    X = 1\n    if y:\n        def g(self):\n            pass\n";
        assert_eq!(
            PythonRules.collapse_bodies(code),
            "class A:\n    pass\n"
        );
        assert_eq!(extract(code), "class A:");
    }

    #[test]
    fn test_unterminated_header_is_left_alone() {
        let lines = vec!["def f(", "def g():", "    pass"];
        assert_eq!(def_header_end(&lines, 0), None);
        assert_eq!(def_header_end(&lines, 1), Some(1));
    }
}
