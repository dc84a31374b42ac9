mod jobs;
mod progress;

use anyhow::{Result, bail};
use indicatif::MultiProgress;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::config::Config;
use crate::git::Git2Engine;
use crate::repo_sync::RepoSync;
use crate::settings::Settings;

use jobs::build_jobs;
use progress::JobLine;

/// Synchronize every repository listed in the manifest.
///
/// High-level flow:
/// 1. Build the job list (see [`jobs::build_jobs`]); duplicate destinations
///    are dropped there so no two jobs share a path.
/// 2. Run clone/update for all jobs **in parallel** with a spinner per job.
///    `update = false` entries only get `ensure_cloned`.
/// 3. A failing job is reported on its own line and the rest keep going.
///
/// With progress enabled, transfer bars are drawn in the same
/// `MultiProgress` as the job spinners.
///
/// # Errors
/// Returns an error if the repos directory cannot be created or if any
/// job failed.
pub fn cmd_sync(cfg: &Config, repos_dir: &Path, settings: Settings) -> Result<()> {
    let jobs = build_jobs(cfg, repos_dir);
    if jobs.is_empty() {
        eprintln!("no repos in config");
        return Ok(());
    }
    fs::create_dir_all(repos_dir)?;

    let mp = MultiProgress::new();
    let rs = RepoSync::with_engine(Git2Engine::with_multi_progress(mp.clone()), settings);
    let lines: Vec<JobLine> = jobs.iter().map(|j| JobLine::start(&mp, &j.display)).collect();

    let failed = jobs
        .par_iter()
        .zip(lines.par_iter())
        .filter(|(job, line)| {
            let res = if job.update {
                rs.ensure_updated(&job.uri, &job.dest)
            } else {
                rs.ensure_cloned(&job.uri, &job.dest)
            };
            match res {
                Ok(()) => {
                    line.succeed();
                    false
                }
                Err(e) => {
                    error!(uri = %job.uri, dest = %job.dest.display(), "{e}");
                    line.fail(&e);
                    true
                }
            }
        })
        .count();

    info!(total = jobs.len(), failed, "sync finished");
    if failed > 0 {
        bail!("{} of {} repositories failed to sync", failed, jobs.len());
    }
    Ok(())
}
