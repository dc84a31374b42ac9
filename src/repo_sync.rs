use std::path::Path;
use tracing::{debug, info};

use crate::error::SyncError;
use crate::git::{Engine, EngineError, Git2Engine};
use crate::settings::Settings;

/// Remote pulled from by [`RepoSync::ensure_updated`].
pub const ORIGIN: &str = "origin";

/// Keep a local working copy of a remote repository present and current.
///
/// Every call is a blocking one-shot operation against the filesystem; no
/// locking is done, so two calls targeting the same destination at once
/// race each other.
pub struct RepoSync<E: Engine = Git2Engine> {
    engine: E,
    settings: Settings,
}

impl RepoSync<Git2Engine> {
    pub fn new(settings: Settings) -> Self {
        Self::with_engine(Git2Engine::new(), settings)
    }
}

impl Default for RepoSync<Git2Engine> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl<E: Engine> RepoSync<E> {
    pub fn with_engine(engine: E, settings: Settings) -> Self {
        Self { engine, settings }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Clone `uri` into `dest` unless a working copy is already there.
    ///
    /// # Errors
    /// [`SyncError::Clone`] for any clone failure other than "already exists".
    pub fn ensure_cloned(&self, uri: &str, dest: impl AsRef<Path>) -> Result<(), SyncError> {
        let dest = dest.as_ref();
        match self
            .engine
            .clone_repo(uri, dest, self.settings.progress_enabled())
        {
            Ok(()) => {
                info!(uri, dest = %dest.display(), "cloned");
                Ok(())
            }
            Err(EngineError::AlreadyExists) => {
                debug!(dest = %dest.display(), "already cloned");
                Ok(())
            }
            Err(e) => Err(SyncError::Clone(e)),
        }
    }

    /// Whether `path` holds a working copy.
    ///
    /// A path that is not a repository yields `Ok(false)`. Any other failure
    /// to open it is an error rather than a `false`, so the answer is never
    /// ambiguous.
    ///
    /// # Errors
    /// [`SyncError::Inspect`] when the engine cannot tell.
    pub fn is_git_cloned(&self, path: impl AsRef<Path>) -> Result<bool, SyncError> {
        match self.engine.open(path.as_ref()) {
            Ok(_) => Ok(true),
            Err(EngineError::NotExists) => Ok(false),
            Err(e) => Err(SyncError::Inspect(e)),
        }
    }

    /// Fetch `origin` into the working copy at `dest` and fast-forward it.
    fn update(&self, dest: &Path) -> Result<(), SyncError> {
        let repo = self.engine.open(dest).map_err(SyncError::Open)?;
        let worktree = self.engine.worktree(repo).map_err(SyncError::Worktree)?;

        match self
            .engine
            .pull(&worktree, ORIGIN, self.settings.progress_enabled())
        {
            Ok(()) => {
                info!(dest = %dest.display(), "updated");
                Ok(())
            }
            Err(EngineError::AlreadyUpToDate) => {
                debug!(dest = %dest.display(), "already up to date");
                Ok(())
            }
            Err(e) => Err(SyncError::Pull(e)),
        }
    }

    /// Make sure `dest` exists as a clone of `uri` and is up to date with
    /// the remote's default branch.
    ///
    /// A failed clone short-circuits; no update is attempted.
    ///
    /// # Errors
    /// Whatever [`Self::ensure_cloned`] returns, then [`SyncError::Open`],
    /// [`SyncError::Worktree`] or [`SyncError::Pull`] from the update step.
    pub fn ensure_updated(&self, uri: &str, dest: impl AsRef<Path>) -> Result<(), SyncError> {
        let dest = dest.as_ref();
        self.ensure_cloned(uri, dest)?;
        self.update(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::{clone_url, commit_file, init_upstream};
    use git2::Repository;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    /// Engine double: each operation returns its scripted error, or succeeds
    /// when none is set. Calls are recorded with the progress flag they got.
    #[derive(Default)]
    struct FakeEngine {
        clone: Option<EngineError>,
        open: Option<EngineError>,
        worktree: Option<EngineError>,
        pull: Option<EngineError>,
        calls: RefCell<Vec<(&'static str, bool)>>,
    }

    impl FakeEngine {
        fn scripted(
            &self,
            op: &'static str,
            progress: bool,
            e: &Option<EngineError>,
        ) -> Result<(), EngineError> {
            self.calls.borrow_mut().push((op, progress));
            match e {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        fn ops(&self) -> Vec<&'static str> {
            self.calls.borrow().iter().map(|(op, _)| *op).collect()
        }
    }

    impl Engine for FakeEngine {
        type Repo = ();
        type Worktree = ();

        fn clone_repo(&self, _uri: &str, _dest: &Path, progress: bool) -> Result<(), EngineError> {
            self.scripted("clone", progress, &self.clone)
        }

        fn open(&self, _path: &Path) -> Result<(), EngineError> {
            self.scripted("open", false, &self.open)
        }

        fn worktree(&self, _repo: ()) -> Result<(), EngineError> {
            self.scripted("worktree", false, &self.worktree)
        }

        fn pull(&self, _wt: &(), remote: &str, progress: bool) -> Result<(), EngineError> {
            assert_eq!(remote, ORIGIN);
            self.scripted("pull", progress, &self.pull)
        }
    }

    fn fake(engine: FakeEngine) -> RepoSync<FakeEngine> {
        RepoSync::with_engine(engine, Settings::default())
    }

    fn failure(msg: &str) -> EngineError {
        EngineError::Failure(msg.to_string())
    }

    #[test]
    fn ensure_cloned_treats_already_exists_as_success() {
        let rs = fake(FakeEngine {
            clone: Some(EngineError::AlreadyExists),
            ..Default::default()
        });
        assert_eq!(rs.ensure_cloned("u", "/d"), Ok(()));
    }

    #[test]
    fn ensure_cloned_wraps_other_failures() {
        let rs = fake(FakeEngine {
            clone: Some(failure("host unreachable")),
            ..Default::default()
        });
        let err = rs.ensure_cloned("u", "/d").unwrap_err();
        assert_eq!(err, SyncError::Clone(failure("host unreachable")));
        assert!(err.to_string().contains("failed to clone repo"));
        assert!(err.to_string().contains("host unreachable"));
    }

    #[test]
    fn progress_follows_verbosity() {
        let quiet = RepoSync::with_engine(FakeEngine::default(), Settings::new(1));
        quiet.ensure_updated("u", "/d").unwrap();
        assert_eq!(
            *quiet.engine().calls.borrow(),
            vec![("clone", false), ("open", false), ("worktree", false), ("pull", false)]
        );

        let loud = RepoSync::with_engine(FakeEngine::default(), Settings::new(2));
        loud.ensure_updated("u", "/d").unwrap();
        assert_eq!(
            *loud.engine().calls.borrow(),
            vec![("clone", true), ("open", false), ("worktree", false), ("pull", true)]
        );
    }

    #[test]
    fn is_git_cloned_maps_open_outcomes() {
        assert_eq!(fake(FakeEngine::default()).is_git_cloned("/d"), Ok(true));

        let missing = fake(FakeEngine {
            open: Some(EngineError::NotExists),
            ..Default::default()
        });
        assert_eq!(missing.is_git_cloned("/d"), Ok(false));

        // Any other open failure is not a "no": the caller gets the error.
        let broken = fake(FakeEngine {
            open: Some(failure("corrupt index")),
            ..Default::default()
        });
        assert_eq!(
            broken.is_git_cloned("/d"),
            Err(SyncError::Inspect(failure("corrupt index")))
        );
    }

    #[test]
    fn ensure_updated_stops_after_failed_clone() {
        let rs = fake(FakeEngine {
            clone: Some(failure("no route")),
            ..Default::default()
        });
        let err = rs.ensure_updated("u", "/d").unwrap_err();
        assert!(matches!(err, SyncError::Clone(_)));
        assert_eq!(rs.engine().ops(), vec!["clone"]);
    }

    #[test]
    fn ensure_updated_updates_existing_clone() {
        let rs = fake(FakeEngine {
            clone: Some(EngineError::AlreadyExists),
            ..Default::default()
        });
        rs.ensure_updated("u", "/d").unwrap();
        assert_eq!(rs.engine().ops(), vec!["clone", "open", "worktree", "pull"]);
    }

    #[test]
    fn ensure_updated_accepts_already_up_to_date() {
        let rs = fake(FakeEngine {
            pull: Some(EngineError::AlreadyUpToDate),
            ..Default::default()
        });
        assert_eq!(rs.ensure_updated("u", "/d"), Ok(()));
    }

    #[test]
    fn update_failures_name_their_step() {
        let open = fake(FakeEngine {
            open: Some(failure("gone")),
            ..Default::default()
        });
        let err = open.ensure_updated("u", "/d").unwrap_err();
        assert!(err.to_string().starts_with("failed to open git repo"));
        assert_eq!(open.engine().ops(), vec!["clone", "open"]);

        let wt = fake(FakeEngine {
            worktree: Some(failure("bare")),
            ..Default::default()
        });
        let err = wt.ensure_updated("u", "/d").unwrap_err();
        assert!(err.to_string().starts_with("failed to get the git worktree"));

        let pull = fake(FakeEngine {
            pull: Some(failure("non-fast-forward update")),
            ..Default::default()
        });
        let err = pull.ensure_updated("u", "/d").unwrap_err();
        assert_eq!(err, SyncError::Pull(failure("non-fast-forward update")));
        assert!(err.to_string().starts_with("failed to fetch the origin"));
    }

    #[test]
    fn is_git_cloned_on_real_paths() {
        let td = tempdir().unwrap();
        let rs = RepoSync::new(Settings::default());

        assert_eq!(rs.is_git_cloned(td.path()), Ok(false));
        assert_eq!(rs.is_git_cloned(td.path().join("missing")), Ok(false));

        let upstream = init_upstream(&td.path().join("upstream"));
        assert_eq!(rs.is_git_cloned(upstream.workdir().unwrap()), Ok(true));
    }

    #[test]
    fn ensure_cloned_twice_is_ok() {
        let td = tempdir().unwrap();
        let upstream = init_upstream(&td.path().join("upstream"));
        let dest = td.path().join("work");
        let rs = RepoSync::new(Settings::default());

        rs.ensure_cloned(&clone_url(&upstream), &dest).unwrap();
        rs.ensure_cloned(&clone_url(&upstream), &dest).unwrap();
        assert_eq!(rs.is_git_cloned(&dest), Ok(true));
    }

    #[test]
    fn ensure_updated_clones_then_tracks_upstream() {
        let td = tempdir().unwrap();
        let upstream = init_upstream(&td.path().join("upstream"));
        let dest = td.path().join("work");
        let url = clone_url(&upstream);
        let rs = RepoSync::new(Settings::default());

        rs.ensure_updated(&url, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "upstream");

        // Nothing new upstream: still fine.
        rs.ensure_updated(&url, &dest).unwrap();

        let tip = commit_file(&upstream, "CHANGELOG.md", "v2");
        rs.ensure_updated(&url, &dest).unwrap();

        let local = Repository::open(&dest).unwrap();
        assert_eq!(local.head().unwrap().peel_to_commit().unwrap().id(), tip);
        assert_eq!(fs::read_to_string(dest.join("CHANGELOG.md")).unwrap(), "v2");
    }

    #[test]
    fn unreachable_source_reports_clone_step() {
        let td = tempdir().unwrap();
        let dest = td.path().join("x");
        let missing = td.path().join("nowhere").join("repo.git");
        let rs = RepoSync::new(Settings::default());

        let err = rs
            .ensure_updated(&missing.to_string_lossy(), &dest)
            .unwrap_err();
        assert!(err.to_string().contains("failed to clone repo"));
        assert_eq!(rs.is_git_cloned(&dest), Ok(false));
    }

    #[test]
    fn ensure_updated_on_empty_upstream_succeeds() {
        let td = tempdir().unwrap();
        let upstream = Repository::init(td.path().join("upstream")).unwrap();
        let dest = td.path().join("work");
        let rs = RepoSync::new(Settings::default());

        rs.ensure_updated(&clone_url(&upstream), &dest).unwrap();
        assert_eq!(rs.is_git_cloned(&dest), Ok(true));
    }
}
