//! CLI argument definitions and command dispatch.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::diff::{diff_with_lookahead, render_diff};
use crate::error::{Result, SyncError};
use crate::python_context::{analyze, format_for_prompt};
use crate::skeleton::skeletonize;
use crate::source::LocalProject;
use crate::sync::{detect_filename, SyncPlan, Workspace};
use crate::walk::{build_context_dump, build_project_map, build_tree, locate, render_outline, FileNode};

/// Top-level CLI parser for `freesor-sync`.
#[derive(Debug, Parser)]
#[command(
    name = "freesor-sync",
    version,
    about = "Skeletonize, diff and sync AI-generated code into a local project"
)]
pub struct Cli {
    /// JSON config file (ignore dirs, skeleton languages, diff lookahead)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the sorted file tree
    Tree {
        root: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the project map (skeleton of every eligible file)
    Map { root: PathBuf },
    /// Print the folder layout
    Outline { root: PathBuf },
    /// Print the full AI context of every eligible file
    Context { root: PathBuf },
    /// Print the skeleton of one file
    Skeleton { file: PathBuf },
    /// Diff two files
    Diff {
        old: PathBuf,
        new: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Find a file by base name
    Locate { root: PathBuf, name: String },
    /// Sync a code block into the project
    Sync {
        root: PathBuf,
        code_file: PathBuf,
        /// Target file name; detected from the first line when omitted
        #[arg(long)]
        filename: Option<String>,
        /// Write the change instead of only showing it
        #[arg(long)]
        apply: bool,
        /// Where to create a missing file (defaults to the project root)
        #[arg(long)]
        create_at: Option<String>,
    },
    /// Summarize a Python module
    PythonContext { file: PathBuf },
}

// ============ Dispatch ============

/// Run a parsed command, returning what should be printed
pub fn execute(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => {
            debug!("loading config from {}", path.display());
            SyncConfig::load(path)?
        }
        None => SyncConfig::default(),
    };

    match &cli.command {
        Command::Tree { root, json } => {
            let tree = build_tree(&open_project(root, &config), &config);
            if *json {
                Ok(serde_json::to_string_pretty(&tree)?)
            } else {
                let mut out = String::new();
                render_tree(&tree, "", &mut out);
                Ok(out)
            }
        }
        Command::Map { root } => Ok(build_project_map(&open_project(root, &config), &config)),
        Command::Outline { root } => Ok(render_outline(&open_project(root, &config), &config)),
        Command::Context { root } => Ok(build_context_dump(&open_project(root, &config), &config)),
        Command::Skeleton { file } => {
            let content = fs::read_to_string(file)?;
            let result = skeletonize(&content, &file_name(file));
            info!(
                "{}: {} -> {} lines ({:.0}% smaller)",
                result.language.display_name(),
                result.original_lines,
                result.skeleton_lines,
                result.compression_ratio() * 100.0
            );
            Ok(result.skeleton)
        }
        Command::Diff { old, new, json } => {
            let lines = diff_with_lookahead(
                &fs::read_to_string(old)?,
                &fs::read_to_string(new)?,
                config.diff_lookahead,
            );
            if *json {
                Ok(serde_json::to_string_pretty(&lines)?)
            } else {
                Ok(render_diff(&lines))
            }
        }
        Command::Locate { root, name } => locate(&open_project(root, &config), &config, name)
            .ok_or_else(|| SyncError::NotFound(name.clone())),
        Command::Sync {
            root,
            code_file,
            filename,
            apply,
            create_at,
        } => {
            let code = fs::read_to_string(code_file)?;
            let filename = filename.clone().unwrap_or_else(|| detect_filename(&code));
            let project = open_project(root, &config);
            let mut workspace = Workspace::open(project, config);
            sync_code(&mut workspace, &filename, &code, *apply, create_at.as_deref())
        }
        Command::PythonContext { file } => {
            Ok(format_for_prompt(&analyze(&fs::read_to_string(file)?)))
        }
    }
}

fn sync_code(
    workspace: &mut Workspace<LocalProject>,
    filename: &str,
    code: &str,
    apply: bool,
    create_at: Option<&str>,
) -> Result<String> {
    match workspace.plan(filename, code)? {
        SyncPlan::UpToDate { path } => Ok(format!("{filename} is already up to date ({path})")),
        SyncPlan::Review(review) => {
            let rendered = render_diff(&review.diff);
            if !apply {
                return Ok(format!("--- {}\n{}", review.path, rendered));
            }
            workspace.apply_review(&review)?;
            Ok(format!("{}\nUpdated {}", rendered, review.path))
        }
        SyncPlan::Create(pending) => {
            if !apply {
                let mut out = format!("{filename} not found. Create it at one of:");
                for candidate in &pending.candidates {
                    out.push_str("\n  ");
                    out.push_str(candidate);
                }
                return Ok(out);
            }
            let target = create_at.unwrap_or(&pending.filename);
            workspace.create_file(&pending, target)?;
            Ok(format!("Created {target}"))
        }
    }
}

fn open_project(root: &Path, config: &SyncConfig) -> LocalProject {
    LocalProject::new(root).respect_gitignore(config.respect_gitignore)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn render_tree(nodes: &[FileNode], indent: &str, out: &mut String) {
    for node in nodes {
        out.push_str(indent);
        out.push_str(&node.name);
        if node.is_dir() {
            out.push('/');
        }
        out.push('\n');
        if let Some(children) = &node.children {
            render_tree(children, &format!("{indent}  "), out);
        }
    }
}
