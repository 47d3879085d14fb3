//! Common types and utilities shared across the language rulesets.

// ============ Placeholders ============

/// Marker that replaces a collapsed JS/TS body, signature line kept intact
pub const BLOCK_PLACEHOLDER: &str = "{ /* ... */ }";

/// The comment part of [`BLOCK_PLACEHOLDER`]; the comment stripper must leave it alone
pub const BLOCK_PLACEHOLDER_COMMENT: &str = "/* ... */";

/// Statement that replaces a collapsed Python body
pub const PYTHON_PLACEHOLDER: &str = "pass";

/// Extra indentation given to a Python placeholder relative to its header
pub const PYTHON_BODY_INDENT: usize = 4;

// ============ Line Helpers ============

/// Number of leading whitespace characters
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Keep only the lines accepted by `keep`, preserving order.
///
/// Blank lines never survive.
pub fn filter_lines(code: &str, keep: impl Fn(&str) -> bool) -> String {
    code.split('\n')
        .filter(|line| !is_blank(line) && keep(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Like [`filter_lines`], but an indented line also needs its enclosing line kept.
///
/// The enclosing line is the nearest earlier non-blank line with less
/// indentation. Lines with none count as top level.
pub fn filter_nested_lines(code: &str, keep: impl Fn(&str) -> bool) -> String {
    let mut enclosing: Vec<(usize, bool)> = Vec::new();
    let mut output = Vec::new();

    for line in code.split('\n').filter(|line| !is_blank(line)) {
        let indent = indent_width(line);
        while enclosing.last().is_some_and(|&(outer, _)| outer >= indent) {
            enclosing.pop();
        }
        let parent_kept = enclosing.last().map_or(true, |&(_, kept)| kept);
        let kept = parent_kept && keep(line);
        enclosing.push((indent, kept));
        if kept {
            output.push(line);
        }
    }

    output.join("\n")
}

/// Line index just past the block body starting at `start`.
///
/// The body is every line that is blank or indented deeper than `header_indent`;
/// trailing blank lines are left outside the body.
pub fn indented_block_end(lines: &[&str], start: usize, header_indent: usize) -> usize {
    let mut end = start;
    let mut last_content = start;
    while end < lines.len() {
        let line = lines[end];
        if is_blank(line) {
            end += 1;
            continue;
        }
        if indent_width(line) <= header_indent {
            break;
        }
        end += 1;
        last_content = end;
    }
    last_content
}
