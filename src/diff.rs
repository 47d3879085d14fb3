//! Line diff with bounded-lookahead resynchronization.
//!
//! This is a greedy scan, not an LCS: two cursors walk the inputs and, on a
//! mismatch, look up to `K` lines ahead for a point where the streams realign.
//! At each window size the insertion check runs before the deletion check, so
//! ambiguous windows read as insertions. When nothing realigns, the current
//! pair is reported as a substitution (removed, then added).
//!
//! Line numbers are 1-based: destination index for `Unchanged`/`Added`,
//! source index for `Removed`.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DIFF_LOOKAHEAD;

pub const NO_CHANGES_MESSAGE: &str = "No changes detected between working copy and disk.";

// ============ Types ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Added,
    Removed,
}

impl ChangeKind {
    /// Gutter character shown by renderers
    pub fn gutter(self) -> char {
        match self {
            ChangeKind::Unchanged => ' ',
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
        }
    }
}

/// One row of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    pub kind: ChangeKind,
    pub content: String,
    pub line_number: usize,
}

impl DiffLine {
    fn new(kind: ChangeKind, content: &str, line_number: usize) -> Self {
        Self {
            kind,
            content: content.to_string(),
            line_number,
        }
    }
}

/// Per-kind row counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn of(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut summary, line| {
            match line.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
                ChangeKind::Unchanged => summary.unchanged += 1,
            }
            summary
        })
    }

    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

// ============ Engine ============

/// Diff two texts with the default lookahead window
pub fn diff(original: &str, modified: &str) -> Vec<DiffLine> {
    diff_with_lookahead(original, modified, DEFAULT_DIFF_LOOKAHEAD)
}

/// Diff two texts, resynchronizing within `lookahead` lines
pub fn diff_with_lookahead(original: &str, modified: &str, lookahead: usize) -> Vec<DiffLine> {
    let old: Vec<&str> = original.split('\n').collect();
    let new: Vec<&str> = modified.split('\n').collect();
    let mut result = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);

    while i < old.len() || j < new.len() {
        if i < old.len() && j < new.len() && old[i] == new[j] {
            result.push(DiffLine::new(ChangeKind::Unchanged, new[j], j + 1));
            i += 1;
            j += 1;
            continue;
        }

        if let Some(step) = resync(&old, &new, i, j, lookahead) {
            match step {
                Resync::Insert(k) => {
                    for n in j..j + k {
                        result.push(DiffLine::new(ChangeKind::Added, new[n], n + 1));
                    }
                    j += k;
                }
                Resync::Delete(k) => {
                    for n in i..i + k {
                        result.push(DiffLine::new(ChangeKind::Removed, old[n], n + 1));
                    }
                    i += k;
                }
            }
            continue;
        }

        if i < old.len() {
            result.push(DiffLine::new(ChangeKind::Removed, old[i], i + 1));
            i += 1;
        }
        if j < new.len() {
            result.push(DiffLine::new(ChangeKind::Added, new[j], j + 1));
            j += 1;
        }
    }

    result
}

enum Resync {
    /// `k` modified lines were inserted before the current original line
    Insert(usize),
    /// `k` original lines were deleted before the current modified line
    Delete(usize),
}

fn resync(old: &[&str], new: &[&str], i: usize, j: usize, lookahead: usize) -> Option<Resync> {
    let (current_old, current_new) = (old.get(i)?, new.get(j)?);

    (1..=lookahead).find_map(|k| {
        if new.get(j + k) == Some(current_old) {
            Some(Resync::Insert(k))
        } else if old.get(i + k) == Some(current_new) {
            Some(Resync::Delete(k))
        } else {
            None
        }
    })
}

// ============ Reconstruction ============

/// Rebuild the original text from `Removed` and `Unchanged` rows
pub fn original_text(lines: &[DiffLine]) -> String {
    collect_side(lines, ChangeKind::Removed)
}

/// Rebuild the modified text from `Added` and `Unchanged` rows
pub fn modified_text(lines: &[DiffLine]) -> String {
    collect_side(lines, ChangeKind::Added)
}

fn collect_side(lines: &[DiffLine], side: ChangeKind) -> String {
    lines
        .iter()
        .filter(|line| line.kind == side || line.kind == ChangeKind::Unchanged)
        .map(|line| line.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============ Rendering ============

/// Render rows with a `+`/`-`/blank gutter and right-aligned line numbers
pub fn render_diff(lines: &[DiffLine]) -> String {
    if lines.is_empty() {
        return NO_CHANGES_MESSAGE.to_string();
    }

    let mut output = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        // Writing into a String cannot fail
        let _ = write!(
            output,
            "{} {:>4} {}",
            line.kind.gutter(),
            line.line_number,
            line.content
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar::{Algorithm, ChangeTag, TextDiff};

    fn kinds(lines: &[DiffLine]) -> Vec<(ChangeKind, &str, usize)> {
        lines
            .iter()
            .map(|l| (l.kind, l.content.as_str(), l.line_number))
            .collect()
    }

    #[test]
    fn test_substitution_without_resync() {
        let lines = diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            kinds(&lines),
            vec![
                (ChangeKind::Unchanged, "a", 1),
                (ChangeKind::Removed, "b", 2),
                (ChangeKind::Added, "x", 2),
                (ChangeKind::Unchanged, "c", 3),
            ]
        );
    }

    #[test]
    fn test_insertion_resync() {
        let lines = diff("a\nc", "a\nb1\nb2\nc");
        assert_eq!(
            kinds(&lines),
            vec![
                (ChangeKind::Unchanged, "a", 1),
                (ChangeKind::Added, "b1", 2),
                (ChangeKind::Added, "b2", 3),
                (ChangeKind::Unchanged, "c", 4),
            ]
        );
    }

    #[test]
    fn test_deletion_uses_source_line_numbers() {
        let lines = diff("a\nb\nc\nd", "a\nd");
        assert_eq!(
            kinds(&lines),
            vec![
                (ChangeKind::Unchanged, "a", 1),
                (ChangeKind::Removed, "b", 2),
                (ChangeKind::Removed, "c", 3),
                (ChangeKind::Unchanged, "d", 2),
            ]
        );
    }

    #[test]
    fn test_insertion_wins_ambiguous_window() {
        // Swapped pair: both checks match at k = 1
        let lines = diff("x\ny", "y\nx");
        assert_eq!(
            kinds(&lines),
            vec![
                (ChangeKind::Added, "y", 1),
                (ChangeKind::Unchanged, "x", 2),
                (ChangeKind::Removed, "y", 2),
            ]
        );
    }

    #[test]
    fn test_edit_beyond_window_is_substitution() {
        let original = "keep\nanchor";
        let modified = "keep\n1\n2\n3\n4\n5\n6\nanchor";
        let lines = diff_with_lookahead(original, modified, 5);
        let summary = DiffSummary::of(&lines);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.added, 7);
        assert_eq!(summary.unchanged, 1);

        let wide = diff_with_lookahead(original, modified, 6);
        assert_eq!(DiffSummary::of(&wide).unchanged, 2);
    }

    #[test]
    fn test_drains_remaining_side() {
        let lines = diff("a", "a\nb\nc\nd\ne\nf\ng\nh");
        assert_eq!(lines.len(), 8);
        assert!(lines[1..].iter().all(|l| l.kind == ChangeKind::Added));

        let lines = diff("a\nb\nc\nd\ne\nf\ng\nh", "a");
        assert!(lines[1..].iter().all(|l| l.kind == ChangeKind::Removed));
        assert_eq!(lines.last().unwrap().line_number, 8);
    }

    #[test]
    fn test_identity() {
        let text = "fn main() {\n    println!(\"hi\");\n}\n";
        let lines = diff(text, text);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.kind == ChangeKind::Unchanged));
        assert_eq!(
            lines.iter().map(|l| l.line_number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert!(DiffSummary::of(&lines).is_identical());
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(kinds(&diff("", "")), vec![(ChangeKind::Unchanged, "", 1)]);
        let lines = diff("", "x");
        assert_eq!(original_text(&lines), "");
        assert_eq!(modified_text(&lines), "x");
    }

    #[test]
    fn test_roundtrip_and_totality() {
        // Deterministic pseudo-random line sequences over a small alphabet
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        let alphabet = ["a", "b", "c", "d", "{", "}", ""];

        for _ in 0..200 {
            let make = |next: &mut dyn FnMut() -> u64| {
                let len = (next() % 12) as usize;
                (0..len)
                    .map(|_| alphabet[(next() % alphabet.len() as u64) as usize])
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            let a = make(&mut next);
            let b = make(&mut next);
            let lines = diff(&a, &b);

            assert_eq!(original_text(&lines), a, "source side of {a:?} -> {b:?}");
            assert_eq!(modified_text(&lines), b, "destination side of {a:?} -> {b:?}");

            let summary = DiffSummary::of(&lines);
            assert_eq!(summary.removed + summary.unchanged, a.split('\n').count());
            assert_eq!(summary.added + summary.unchanged, b.split('\n').count());
        }
    }

    #[test]
    fn test_agrees_with_myers_on_localized_edits() {
        let cases = [
            ("a\nb\nc", "a\nx\nc"),
            ("a\nb\nc", "a\nb\nnew\nc"),
            ("a\nb\nc\nd\ne", "a\nd\ne"),
            ("one\ntwo\nthree", "zero\none\ntwo\nthree"),
            ("fn a() {\n}\n", "fn a() {\n    body();\n}\n"),
        ];

        for (old, new) in cases {
            let old_lines: Vec<&str> = old.split('\n').collect();
            let new_lines: Vec<&str> = new.split('\n').collect();
            let oracle = TextDiff::configure()
                .algorithm(Algorithm::Myers)
                .diff_slices(&old_lines[..], &new_lines[..]);

            let mut expected = DiffSummary::default();
            for change in oracle.iter_all_changes() {
                match change.tag() {
                    ChangeTag::Equal => expected.unchanged += 1,
                    ChangeTag::Insert => expected.added += 1,
                    ChangeTag::Delete => expected.removed += 1,
                }
            }

            assert_eq!(DiffSummary::of(&diff(old, new)), expected, "{old:?} -> {new:?}");
        }
    }

    #[test]
    fn test_render_diff() {
        let rendered = render_diff(&diff("a\nb", "a\nc"));
        assert_eq!(rendered, "     1 a\n-    2 b\n+    2 c");
        assert_eq!(render_diff(&[]), NO_CHANGES_MESSAGE);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(&diff("a", "b")[0]).unwrap();
        assert_eq!(json["kind"], "removed");
        assert_eq!(json["lineNumber"], 1);
        assert_eq!(json["content"], "a");
    }
}
