//! Error types for gitsync
//!
//! Each façade step has its own variant so callers can tell which step
//! failed; the message carries the step's context and the engine's text.

use crate::git::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("failed to clone repo, err: {0}")]
    Clone(EngineError),

    #[error("failed to open git repo, err: {0}")]
    Open(EngineError),

    #[error("failed to get the git worktree, err: {0}")]
    Worktree(EngineError),

    #[error("failed to fetch the origin, err: {0}")]
    Pull(EngineError),

    /// Opening a path for inspection failed for a reason other than
    /// "not a repository".
    #[error(transparent)]
    Inspect(EngineError),
}

impl SyncError {
    /// The underlying engine error, whichever step produced it.
    pub fn engine_error(&self) -> &EngineError {
        match self {
            SyncError::Clone(e)
            | SyncError::Open(e)
            | SyncError::Worktree(e)
            | SyncError::Pull(e)
            | SyncError::Inspect(e) => e,
        }
    }
}
