//! Crate entry point for **gitsync**.
//!
//! Keeps local working copies of remote git repositories present and
//! current: clone if absent, detect if present, fast-forward if stale.
//! [`RepoSync`] is the library façade; the `gitsync` binary adds a manifest
//! driven batch `sync` on top.

mod config;
mod error;
mod git;
mod logging;
mod paths;
mod repo_sync;
mod settings;
mod sync;

/// Re-export the public surface so it can be reached as `gitsync::*`.
pub use config::{Config, RepoEntry, cmd_list, load_config};
pub use error::SyncError;
pub use git::{Engine, EngineError, Git2Engine, Git2Worktree};
pub use logging::init as init_logging;
pub use paths::{gitsync_home, paths};
pub use repo_sync::{ORIGIN, RepoSync};
pub use settings::{PROGRESS_VERBOSITY, Settings};
pub use sync::cmd_sync;
