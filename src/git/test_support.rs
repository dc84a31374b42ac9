//! Helpers for building throwaway repositories in tests.

use git2::{Commit, Oid, Repository, Signature};
use std::fs;
use std::path::Path;

/// Commit `name` with `contents` on top of HEAD (or as the root commit).
pub fn commit_file(repo: &Repository, name: &str, contents: &str) -> Oid {
    let workdir = repo.workdir().expect("non-bare repository");
    fs::write(workdir.join(name), contents).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let sig = Signature::now("gitsync", "gitsync@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, name, &tree, &parents)
        .unwrap()
}

/// Create a non-bare repository at `path` holding a single commit.
pub fn init_upstream(path: &Path) -> Repository {
    let repo = Repository::init(path).unwrap();
    commit_file(&repo, "README.md", "upstream");
    repo
}

/// Local path usable as a clone source for `repo`.
pub fn clone_url(repo: &Repository) -> String {
    repo.workdir()
        .expect("non-bare repository")
        .to_string_lossy()
        .into_owned()
}
