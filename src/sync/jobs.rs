use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;

/// Represents a single repository synchronization job.
///
/// Each job corresponds to one `[[repos]]` entry in `config.toml` with its
/// destination already resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncJob {
    pub display: String,
    pub uri: String,
    pub dest: PathBuf,
    pub update: bool,
}

/// Build synchronization jobs from the parsed configuration.
///
/// - Entries with an empty `uri`, or whose destination cannot be derived,
///   are skipped.
/// - Jobs run in parallel and the façade does no locking, so only the first
///   entry claiming a destination is kept; later ones are skipped with a
///   warning.
pub fn build_jobs(cfg: &Config, repos_dir: &Path) -> Vec<SyncJob> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut jobs: Vec<SyncJob> = Vec::new();

    for entry in &cfg.repos {
        if entry.uri.trim().is_empty() {
            continue;
        }
        let Some(dest) = entry.destination(repos_dir) else {
            warn!(uri = %entry.uri, "cannot derive a destination, skipping");
            continue;
        };
        if !claimed.insert(dest.clone()) {
            warn!(uri = %entry.uri, dest = %dest.display(), "destination already claimed, skipping");
            continue;
        }

        jobs.push(SyncJob {
            display: entry.display().to_string(),
            uri: entry.uri.trim().to_string(),
            dest,
            update: entry.update,
        });
    }

    jobs
}
