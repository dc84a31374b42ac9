//! Git integration layer.
//!
//! [`Engine`] is the narrow capability the façade depends on; `git2_backend`
//! is the libgit2 implementation. Other modules should go through these
//! re-exports instead of depending on `git2_backend` directly, so a test
//! double can stand in for the real engine.

mod engine;
mod git2_backend;
mod progress;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{Engine, EngineError};
pub use git2_backend::{Git2Engine, Git2Worktree};
