use git2::{
    AutotagOption, Cred, ErrorCode, FetchOptions, RemoteCallbacks, Repository,
    build::{CheckoutBuilder, RepoBuilder},
};
use indicatif::MultiProgress;
use std::path::Path;

use super::engine::{Engine, EngineError};
use super::progress::{TransferProgress, TransferStats};

/// Give up after this many credential callbacks for a single transfer.
///
/// libgit2 keeps asking as long as the server rejects what we hand back,
/// so without a cap a missing SSH key turns into an endless loop.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// [`Engine`] backed by libgit2 through the `git2` crate.
#[derive(Default, Clone)]
pub struct Git2Engine {
    multi: Option<MultiProgress>,
}

/// Primary worktree of a non-bare repository.
pub struct Git2Worktree {
    repo: Repository,
}

impl Git2Worktree {
    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

impl Git2Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw transfer bars inside an existing `MultiProgress` instead of
    /// straight to stderr.
    pub fn with_multi_progress(mp: MultiProgress) -> Self {
        Self { multi: Some(mp) }
    }

    fn transfer_progress(&self, enabled: bool, label: &str) -> Option<TransferProgress> {
        enabled.then(|| TransferProgress::start(label, self.multi.as_ref()))
    }
}

/// Build a `FetchOptions` with SSH-agent credentials enabled.
///
/// Falls back to default credentials when no SSH key is available.
/// When `progress` is given, transfer and sideband callbacks feed it.
fn fetch_opts_with_creds(progress: Option<&TransferProgress>) -> FetchOptions<'static> {
    let mut cb = RemoteCallbacks::new();
    let mut attempts = 0;
    cb.credentials(move |_url, username_from_url, _allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }
        Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")).or_else(|_| Cred::default())
    });

    if let Some(p) = progress {
        let transfer = p.clone();
        cb.transfer_progress(move |stats| {
            transfer.on_transfer(TransferStats::from(&stats));
            true
        });
        let sideband = p.clone();
        cb.sideband_progress(move |data| {
            sideband.on_sideband(data);
            true
        });
    }

    let mut fo = FetchOptions::new();
    fo.remote_callbacks(cb);
    fo
}

impl Engine for Git2Engine {
    type Repo = Repository;
    type Worktree = Git2Worktree;

    /// Clone `uri` into `dest`.
    ///
    /// A destination that already opens as a repository is reported as
    /// [`EngineError::AlreadyExists`] before any network traffic happens.
    /// On failure libgit2 removes whatever it created, so `dest` is not left
    /// behind as a half-populated working copy.
    fn clone_repo(&self, uri: &str, dest: &Path, progress: bool) -> Result<(), EngineError> {
        if Repository::open(dest).is_ok() {
            return Err(EngineError::AlreadyExists);
        }

        let tp = self.transfer_progress(progress, uri);
        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_opts_with_creds(tp.as_ref()));
        let res = builder.clone(uri, dest);
        if let Some(tp) = &tp {
            tp.finish();
        }

        res.map(|_| ()).map_err(EngineError::from)
    }

    fn open(&self, path: &Path) -> Result<Repository, EngineError> {
        Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => EngineError::NotExists,
            _ => e.into(),
        })
    }

    fn worktree(&self, repo: Repository) -> Result<Git2Worktree, EngineError> {
        if repo.workdir().is_none() {
            return Err(EngineError::Failure("repository has no worktree".into()));
        }
        Ok(Git2Worktree { repo })
    }

    /// Fetch `remote` and fast-forward the checked-out branch to its upstream.
    ///
    /// - HEAD must point at a branch (possibly unborn); detached HEAD fails.
    /// - The upstream comes from `branch.<name>.merge`, falling back to
    ///   `refs/remotes/<remote>/<name>`.
    /// - Local modifications that would be overwritten make the checkout fail;
    ///   diverged histories are never merged.
    fn pull(
        &self,
        worktree: &Git2Worktree,
        remote_name: &str,
        progress: bool,
    ) -> Result<(), EngineError> {
        let repo = &worktree.repo;

        let head = repo.find_reference("HEAD")?;
        let branch_ref = head
            .symbolic_target()
            .map(str::to_string)
            .ok_or_else(|| EngineError::Failure("HEAD is detached".into()))?;
        let branch = branch_ref
            .strip_prefix("refs/heads/")
            .ok_or_else(|| EngineError::Failure(format!("unexpected HEAD target: {branch_ref}")))?;

        let mut remote = repo.find_remote(remote_name)?;
        let label = remote.url().unwrap_or(remote_name).to_string();
        let tp = self.transfer_progress(progress, &label);
        let mut fo = fetch_opts_with_creds(tp.as_ref());
        fo.download_tags(AutotagOption::Auto);
        let fetched = remote.fetch(&[] as &[&str], Some(&mut fo), None);
        if let Some(tp) = &tp {
            tp.finish();
        }
        fetched?;

        let upstream = match repo.branch_upstream_name(&branch_ref) {
            Ok(buf) => buf
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| EngineError::Failure("upstream name is not valid UTF-8".into()))?,
            Err(e) if e.code() == ErrorCode::NotFound => {
                format!("refs/remotes/{remote_name}/{branch}")
            }
            Err(e) => return Err(e.into()),
        };

        // An unborn branch tracking an empty remote has nothing to pull yet.
        let unborn = matches!(repo.head(), Err(e) if e.code() == ErrorCode::UnbornBranch);
        let upstream_ref = repo.find_reference(&upstream).map_err(|e| match e.code() {
            ErrorCode::NotFound if unborn => EngineError::AlreadyUpToDate,
            ErrorCode::NotFound => {
                EngineError::Failure(format!("couldn't find remote ref {upstream}"))
            }
            _ => e.into(),
        })?;
        let fetch_commit = repo.reference_to_annotated_commit(&upstream_ref)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            return Err(EngineError::AlreadyUpToDate);
        }

        let target = fetch_commit.id();
        let msg = format!("pull: fast-forward {branch} to {target}");
        if analysis.is_unborn() {
            let obj = repo.find_object(target, None)?;
            repo.checkout_tree(&obj, Some(CheckoutBuilder::new().safe()))?;
            repo.reference(&branch_ref, target, false, &msg)?;
        } else if analysis.is_fast_forward() {
            let obj = repo.find_object(target, None)?;
            repo.checkout_tree(&obj, Some(CheckoutBuilder::new().safe()))?;
            repo.find_reference(&branch_ref)?.set_target(target, &msg)?;
        } else {
            return Err(EngineError::Failure("non-fast-forward update".into()));
        }

        tracing::debug!(branch, %target, "fast-forwarded");
        Ok(())
    }
}
