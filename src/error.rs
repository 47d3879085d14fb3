use thiserror::Error;

/// Errors raised by the directory collaborator, config loading and workspace actions.
///
/// The text algorithms themselves (skeletons, diffs, prompt composition) are total
/// and never produce one of these.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
