//! Depth-first walks over a [`ProjectSource`].
//!
//! Every walk shares the same contract: entries are consumed in listing order,
//! pre-order, and directories named in `SyncConfig::ignore_dirs` are never
//! descended into. A directory or file that cannot be read is logged and skipped.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::context::file_context;
use crate::skeleton::skeletonize;
use crate::source::{join_path, EntryKind, ProjectSource, SourceEntry};

// ============ File Tree ============

/// A node of the display tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub name: String,
    pub kind: EntryKind,
    /// Slash-joined path from the scan root
    pub path: String,
    /// Present only for directories that were expanded; ignored directories have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Build the sorted node hierarchy: directories first, then files, each group by name
pub fn build_tree<S: ProjectSource + ?Sized>(source: &S, config: &SyncConfig) -> Vec<FileNode> {
    tree_level(source, config, "")
}

fn tree_level<S: ProjectSource + ?Sized>(source: &S, config: &SyncConfig, dir: &str) -> Vec<FileNode> {
    let mut nodes: Vec<FileNode> = list_or_warn(source, dir)
        .into_iter()
        .map(|entry| {
            let path = join_path(dir, &entry.name);
            let expand = entry.kind == EntryKind::Directory && !config.is_ignored(&entry.name);
            let children = expand.then(|| tree_level(source, config, &path));
            FileNode {
                name: entry.name,
                kind: entry.kind,
                path,
                children,
            }
        })
        .collect();

    nodes.sort_by(compare_nodes);
    nodes
}

/// Directories before files; names compared case-insensitively, lowercase first on ties
pub fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(&a.name, &b.name),
    }
}

/// Root-locale collation order of ASCII punctuation and symbols
const PUNCTUATION_ORDER: &str = " _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Locale-style name order: punctuation, then digits, then letters ignoring case.
///
/// `index_test.ts` sorts before `index.ts`. Names that differ only in case put
/// lowercase first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(collation_key)
        .cmp(b.chars().map(collation_key))
        .then_with(|| b.cmp(a))
}

fn collation_key(c: char) -> (u8, u32) {
    if let Some(rank) = PUNCTUATION_ORDER.find(c) {
        (0, rank as u32)
    } else if c.is_ascii_digit() {
        (1, c as u32)
    } else if c.is_alphabetic() {
        (2, c.to_lowercase().next().unwrap_or(c) as u32)
    } else {
        (3, c as u32)
    }
}

/// Every directory path in a tree, sorted
pub fn collect_directories(nodes: &[FileNode]) -> Vec<String> {
    let mut dirs = Vec::new();
    collect_directories_rec(nodes, &mut dirs);
    dirs.sort();
    dirs
}

fn collect_directories_rec(nodes: &[FileNode], dirs: &mut Vec<String>) {
    for node in nodes.iter().filter(|n| n.is_dir()) {
        dirs.push(node.path.clone());
        if let Some(children) = &node.children {
            collect_directories_rec(children, dirs);
        }
    }
}

// ============ Project Map ============

/// Concatenate the skeleton of every eligible file, tagged with its path
pub fn build_project_map<S: ProjectSource + ?Sized>(source: &S, config: &SyncConfig) -> String {
    project_map_level(source, config, "")
}

fn project_map_level<S: ProjectSource + ?Sized>(
    source: &S,
    config: &SyncConfig,
    dir: &str,
) -> String {
    let mut map = String::new();

    for entry in list_or_warn(source, dir) {
        if config.is_ignored(&entry.name) {
            continue;
        }
        let path = join_path(dir, &entry.name);
        match entry.kind {
            EntryKind::File if config.is_skeleton_eligible(&entry.name) => {
                let Some(text) = read_or_warn(source, &path) else {
                    continue;
                };
                let result = skeletonize(&text, &entry.name);
                debug!(
                    "skeleton for {}: {} -> {} lines",
                    path, result.original_lines, result.skeleton_lines
                );
                map.push_str(&format!("\n// --- FILE: {} ---\n{}\n", path, result.skeleton));
            }
            EntryKind::File => {}
            EntryKind::Directory => map.push_str(&project_map_level(source, config, &path)),
        }
    }

    map
}

/// Concatenate the full AI context block of every eligible file
pub fn build_context_dump<S: ProjectSource + ?Sized>(source: &S, config: &SyncConfig) -> String {
    context_dump_level(source, config, "")
}

fn context_dump_level<S: ProjectSource + ?Sized>(
    source: &S,
    config: &SyncConfig,
    dir: &str,
) -> String {
    let mut dump = String::new();

    for entry in list_or_warn(source, dir) {
        let path = join_path(dir, &entry.name);
        match entry.kind {
            EntryKind::File if config.is_skeleton_eligible(&entry.name) => {
                if let Some(text) = read_or_warn(source, &path) {
                    dump.push_str(&file_context(&path, &text));
                    dump.push('\n');
                }
            }
            EntryKind::Directory if !config.is_ignored(&entry.name) => {
                dump.push_str(&context_dump_level(source, config, &path));
            }
            _ => {}
        }
    }

    dump
}

// ============ Outline ============

/// Indented text tree of the project layout
pub fn render_outline<S: ProjectSource + ?Sized>(source: &S, config: &SyncConfig) -> String {
    let mut outline = String::new();
    outline_level(source, config, "", "", &mut outline);
    outline
}

fn outline_level<S: ProjectSource + ?Sized>(
    source: &S,
    config: &SyncConfig,
    dir: &str,
    indent: &str,
    outline: &mut String,
) {
    for entry in list_or_warn(source, dir) {
        if config.is_ignored(&entry.name) {
            continue;
        }
        let is_dir = entry.kind == EntryKind::Directory;
        let icon = if is_dir { "📂" } else { "📄" };
        outline.push_str(&format!("{}{} {}\n", indent, icon, entry.name));
        if is_dir {
            let path = join_path(dir, &entry.name);
            outline_level(source, config, &path, &format!("{indent}  "), outline);
        }
    }
}

// ============ Locator ============

/// First file (pre-order) whose base name equals `filename` exactly
pub fn locate<S: ProjectSource + ?Sized>(
    source: &S,
    config: &SyncConfig,
    filename: &str,
) -> Option<String> {
    locate_in(source, config, "", filename)
}

fn locate_in<S: ProjectSource + ?Sized>(
    source: &S,
    config: &SyncConfig,
    dir: &str,
    filename: &str,
) -> Option<String> {
    for entry in list_or_warn(source, dir) {
        let path = join_path(dir, &entry.name);
        match entry.kind {
            EntryKind::File if entry.name == filename => return Some(path),
            EntryKind::Directory if !config.is_ignored(&entry.name) => {
                if let Some(found) = locate_in(source, config, &path, filename) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

// ============ Helpers ============

fn list_or_warn<S: ProjectSource + ?Sized>(source: &S, dir: &str) -> Vec<SourceEntry> {
    source.list(dir).unwrap_or_else(|err| {
        warn!("error listing '{}': {}", dir, err);
        Vec::new()
    })
}

fn read_or_warn<S: ProjectSource + ?Sized>(source: &S, path: &str) -> Option<String> {
    source
        .read(path)
        .map_err(|err| warn!("error reading '{}': {}", path, err))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryProject;

    fn config() -> SyncConfig {
        SyncConfig::default()
    }

    #[test]
    fn test_tree_ignored_directory_is_unexpanded() {
        let project = MemoryProject::new()
            .with_file("src/a.ts", "export const a = 1;")
            .with_file("src/node_modules/x.ts", "export {}");

        let tree = build_tree(&project, &config());
        assert_eq!(tree.len(), 1);
        let src = &tree[0];
        assert_eq!(src.name, "src");
        assert!(src.is_dir());

        let children = src.children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].path, "src/node_modules");
        assert_eq!(children[0].children, None);
        assert_eq!(children[1].path, "src/a.ts");
        assert_eq!(children[1].kind, EntryKind::File);
        assert_eq!(children[1].children, None);
    }

    #[test]
    fn test_tree_sort_order() {
        let project = MemoryProject::new()
            .with_file("zeta.ts", "")
            .with_file("Beta.ts", "")
            .with_dir("lib")
            .with_file("alpha.ts", "")
            .with_dir("App")
            .with_file("beta.ts", "");

        let names: Vec<String> = build_tree(&project, &config())
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["App", "lib", "alpha.ts", "beta.ts", "Beta.ts", "zeta.ts"]);
    }

    #[test]
    fn test_compare_names_orders_punctuation_before_letters() {
        let mut names = vec![
            "index.ts",
            "Index.ts",
            "ab.ts",
            "index_test.ts",
            "a1.ts",
            "a-b.ts",
            "a_b.ts",
        ];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(
            names,
            vec!["a_b.ts", "a-b.ts", "a1.ts", "ab.ts", "index_test.ts", "index.ts", "Index.ts"]
        );
    }

    #[test]
    fn test_empty_directory_has_empty_children() {
        let project = MemoryProject::new().with_dir("docs");
        let tree = build_tree(&project, &config());
        assert_eq!(tree[0].children, Some(Vec::new()));
    }

    #[test]
    fn test_tree_serializes_without_children_for_files() {
        let project = MemoryProject::new().with_file("src/a.ts", "").with_dir("dist");
        let json = serde_json::to_value(build_tree(&project, &config())).unwrap();
        assert_eq!(json[0]["name"], "dist");
        assert!(json[0].get("children").is_none());
        assert_eq!(json[1]["children"][0]["kind"], "file");
        assert!(json[1]["children"][0].get("children").is_none());
    }

    #[test]
    fn test_collect_directories() {
        let project = MemoryProject::new()
            .with_file("src/utils/x.ts", "")
            .with_file("lib/y.py", "")
            .with_file("node_modules/pkg/z.js", "");
        let dirs = collect_directories(&build_tree(&project, &config()));
        assert_eq!(dirs, vec!["lib", "node_modules", "src", "src/utils"]);
    }

    #[test]
    fn test_project_map_format_and_order() {
        let project = MemoryProject::new()
            .with_file("src/math.ts", "export function add(a, b) {\n  return a + b;\n}")
            .with_file("README.md", "# not code")
            .with_file("app.py", "import os\n\ndef main():\n    os.exit(0)\n");

        let map = build_project_map(&project, &config());
        assert_eq!(
            map,
            "\n// --- FILE: src/math.ts ---\nexport function add(a, b) { /* ... */ }\n\
             \n// --- FILE: app.py ---\nimport os\ndef main():\n"
        );
    }

    #[test]
    fn test_project_map_skips_ignored_and_empty() {
        assert_eq!(build_project_map(&MemoryProject::new(), &config()), "");

        let ignored_only = MemoryProject::new()
            .with_file("node_modules/lib/index.js", "export const x = 1;")
            .with_file(".venv/site.py", "import sys")
            .with_file("build/out.js", "export {}");
        assert_eq!(build_project_map(&ignored_only, &config()), "");
    }

    #[test]
    fn test_custom_ignore_set_is_honoured_everywhere() {
        let mut config = config();
        config.ignore_dirs.insert("generated".to_string());
        let project = MemoryProject::new()
            .with_file("generated/api.ts", "export const api = 1;")
            .with_file("src/api.ts", "export const api = 2;");

        assert_eq!(locate(&project, &config, "api.ts").as_deref(), Some("src/api.ts"));
        assert!(!build_project_map(&project, &config).contains("generated"));
        assert_eq!(render_outline(&project, &config), "📂 src\n  📄 api.ts\n");
        let tree = build_tree(&project, &config);
        assert_eq!(tree[0].name, "generated");
        assert_eq!(tree[0].children, None);
    }

    #[test]
    fn test_locate_first_preorder_match() {
        let project = MemoryProject::new()
            .with_file("a/deep/index.ts", "1")
            .with_file("index.ts", "2")
            .with_file("node_modules/util.ts", "3");

        assert_eq!(locate(&project, &config(), "index.ts").as_deref(), Some("a/deep/index.ts"));
        assert_eq!(locate(&project, &config(), "util.ts"), None);
        assert_eq!(locate(&project, &config(), "missing.ts"), None);
        assert_eq!(locate(&project, &config(), "Index.ts"), None);
        assert_eq!(locate(&project, &config(), "deep"), None);
    }

    #[test]
    fn test_render_outline() {
        let project = MemoryProject::new()
            .with_file("src/main.py", "")
            .with_file("src/__pycache__/main.pyc", "")
            .with_file("setup.py", "");

        assert_eq!(
            render_outline(&project, &config()),
            "📂 src\n  📄 main.py\n📄 setup.py\n"
        );
    }

    #[test]
    fn test_context_dump() {
        let project = MemoryProject::new()
            .with_file("web/app.js", "console.log(1);")
            .with_file("notes.txt", "skip me");

        assert_eq!(
            build_context_dump(&project, &config()),
            "\n# web/app.js\n```\nconsole.log(1);\n```\n"
        );
    }
}
