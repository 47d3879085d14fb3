//! Structural summary of a Python module for AI prompts.
//!
//! A single line scan collects imports, classes (with their method names),
//! top-level functions (with parameters) and UPPER_CASE module constants.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::skeleton::common::indent_width;

static CLASS_DEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"class\s+(\w+)\s*(?:\((.*?)\))?:").unwrap());

static FUNCTION_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:async\s+)?def\s+(\w+)\s*\((.*?)\)").unwrap());

static CONSTANT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*\s*=").unwrap());

// ============ Types ============

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonContext {
    pub imports: Vec<String>,
    pub classes: Vec<PythonClass>,
    pub functions: Vec<PythonFunction>,
    /// Module-level UPPER_CASE names
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonClass {
    pub name: String,
    pub methods: Vec<String>,
    /// 1-based
    pub lineno: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonFunction {
    pub name: String,
    /// Parameters as written, `self` excluded
    pub params: Vec<String>,
    pub lineno: usize,
}

impl PythonContext {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.classes.is_empty()
            && self.functions.is_empty()
            && self.variables.is_empty()
    }
}

// ============ Analysis ============

/// Scan Python source for its module-level structure
pub fn analyze(code: &str) -> PythonContext {
    let mut context = PythonContext::default();
    // Index into `context.classes` plus the class header's indent
    let mut current_class: Option<(usize, usize)> = None;

    for (idx, line) in code.split('\n').enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = indent_width(line);

        if trimmed.starts_with("import ") || trimmed.starts_with("from ") {
            context.imports.push(trimmed.to_string());
            continue;
        }

        if trimmed.starts_with("class ") {
            if let Some(caps) = CLASS_DEF.captures(trimmed) {
                context.classes.push(PythonClass {
                    name: caps[1].to_string(),
                    methods: Vec::new(),
                    lineno: idx + 1,
                });
                current_class = Some((context.classes.len() - 1, indent));
            }
            continue;
        }

        if trimmed.starts_with("def ") || trimmed.starts_with("async def ") {
            if let Some(caps) = FUNCTION_DEF.captures(trimmed) {
                let name = caps[1].to_string();
                match current_class {
                    Some((class_idx, class_indent)) if indent > class_indent => {
                        context.classes[class_idx].methods.push(name);
                    }
                    _ => {
                        context.functions.push(PythonFunction {
                            name,
                            params: split_params(&caps[2]),
                            lineno: idx + 1,
                        });
                        current_class = None;
                    }
                }
            }
            continue;
        }

        // Back at (or above) the class header's indent: the class is over
        if matches!(current_class, Some((_, class_indent)) if indent <= class_indent) {
            current_class = None;
        }

        if current_class.is_none() && CONSTANT.is_match(trimmed) {
            if let Some((name, _)) = trimmed.split_once('=') {
                context.variables.push(name.trim().to_string());
            }
        }
    }

    context
}

fn split_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && *p != "self")
        .map(String::from)
        .collect()
}

// ============ Formatting ============

/// Render the summary as markdown sections separated by blank lines
pub fn format_for_prompt(context: &PythonContext) -> String {
    let mut sections = Vec::new();

    if !context.imports.is_empty() {
        sections.push(format!("**Imports:**\n{}", bullets(&context.imports)));
    }

    if !context.classes.is_empty() {
        let classes: Vec<String> = context
            .classes
            .iter()
            .map(|class| {
                let mut entry = format!("- {} (line {})", class.name, class.lineno);
                if !class.methods.is_empty() {
                    entry.push_str(&format!("\n  Methods: {}", class.methods.join(", ")));
                }
                entry
            })
            .collect();
        sections.push(format!("**Classes:**\n{}", classes.join("\n")));
    }

    if !context.functions.is_empty() {
        let functions: Vec<String> = context
            .functions
            .iter()
            .map(|f| format!("- {}({}) (line {})", f.name, f.params.join(", "), f.lineno))
            .collect();
        sections.push(format!("**Functions:**\n{}", functions.join("\n")));
    }

    if !context.variables.is_empty() {
        sections.push(format!("**Variables:**\n{}", bullets(&context.variables)));
    }

    sections.join("\n\n")
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
