//! freesor-sync: project context and code sync for AI-assisted editing.
//!
//! Scans a project into a sorted tree and a compact "project map" of file
//! skeletons, diffs incoming code against what is on disk, and plans how a
//! generated code block lands in the project (update, no-op or new file).
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── language.rs        - Extension -> LanguageTag, ruleset dispatch
//! ├── skeleton/          - Heuristic skeleton extraction (JS/TS, Python)
//! ├── source/            - ProjectSource trait, memory and on-disk trees
//! ├── walk.rs            - Tree, project map, outline, locator
//! ├── diff.rs            - Lookahead line diff
//! ├── python_context.rs  - Python module summary
//! ├── context.rs         - AI context blocks and prompts
//! ├── sync.rs            - Sync planning and the Workspace
//! ├── config.rs          - SyncConfig
//! ├── error.rs           - SyncError
//! └── cli.rs             - `freesor-sync` commands
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod cli;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod language;
pub mod python_context;
pub mod skeleton;
pub mod source;
pub mod sync;
pub mod walk;


pub use config::SyncConfig;
pub use diff::{diff, ChangeKind, DiffLine};
pub use error::{Result, SyncError};
pub use language::LanguageTag;
pub use skeleton::{extract_skeleton, skeletonize, SkeletonResult, SkeletonRuleset};
pub use source::{EntryKind, LocalProject, MemoryProject, ProjectSource};
pub use sync::{plan_sync, SyncPlan, Workspace};
pub use walk::{build_project_map, build_tree, locate, FileNode};

/// Binary entry point: parse arguments, install logging, run the command
pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli::execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end_matches('\n'));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
