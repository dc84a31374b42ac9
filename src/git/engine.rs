use std::path::Path;
use thiserror::Error;

/// Outcome classification for every engine operation.
///
/// The façade only cares about three specific conditions; everything else
/// is an opaque [`EngineError::Failure`] carrying the engine's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The clone destination already holds a valid working copy.
    #[error("repository already exists")]
    AlreadyExists,

    /// The opened path is not a working copy.
    #[error("repository does not exist")]
    NotExists,

    /// The pull found nothing to bring in.
    #[error("already up-to-date")]
    AlreadyUpToDate,

    #[error("{0}")]
    Failure(String),
}

impl From<git2::Error> for EngineError {
    fn from(e: git2::Error) -> Self {
        EngineError::Failure(e.message().to_string())
    }
}

/// Version-control capability consumed by [`crate::RepoSync`].
///
/// Exactly the four primitives needed to clone, detect and update a working
/// copy. `progress` asks the engine to stream transfer progress to stderr.
pub trait Engine {
    type Repo;
    type Worktree;

    /// Clone `uri` into `dest`.
    ///
    /// # Errors
    /// [`EngineError::AlreadyExists`] when `dest` is already a working copy,
    /// [`EngineError::Failure`] for anything else.
    fn clone_repo(&self, uri: &str, dest: &Path, progress: bool) -> Result<(), EngineError>;

    /// Open an existing working copy at `path`.
    ///
    /// # Errors
    /// [`EngineError::NotExists`] when `path` is not a working copy.
    fn open(&self, path: &Path) -> Result<Self::Repo, EngineError>;

    /// Get the primary worktree of an opened repository.
    fn worktree(&self, repo: Self::Repo) -> Result<Self::Worktree, EngineError>;

    /// Fetch `remote` and fast-forward the current branch.
    ///
    /// A branch that is ahead of its upstream counts as up to date, the
    /// same as `git pull --ff-only`.
    ///
    /// # Errors
    /// [`EngineError::AlreadyUpToDate`] when nothing changed.
    fn pull(
        &self,
        worktree: &Self::Worktree,
        remote: &str,
        progress: bool,
    ) -> Result<(), EngineError>;
}
