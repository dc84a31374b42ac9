use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level manifest loaded from `config.toml`.
///
/// Example TOML:
/// ```toml
/// verbosity = 1
///
/// [[repos]]
/// uri  = "https://github.com/rust-lang/log.git"
///
/// [[repos]]
/// uri    = "git@github.com:org/deploy-scripts.git"
/// path   = "/srv/deploy-scripts"
/// name   = "deploy"
/// update = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub verbosity: Option<u8>,
    #[serde(default)]
    pub repos: Vec<RepoEntry>,
}

/// One repository to keep in sync.
///
/// - `path`: absolute, or relative to the repos directory. When omitted the
///   last segment of `uri` (minus `.git`) is used.
/// - `update`: `false` only ensures the clone exists and never pulls.
#[derive(Debug, Deserialize, Clone)]
pub struct RepoEntry {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_update")]
    pub update: bool,
}

fn default_update() -> bool {
    true
}

impl RepoEntry {
    /// Directory name derived from the URI: `https://host/org/tool.git` → `tool`.
    pub fn slug(&self) -> Option<&str> {
        let s = self
            .uri
            .trim()
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()?
            .trim_end_matches(".git");
        (!s.is_empty()).then_some(s)
    }

    /// Where this entry's working copy lives.
    pub fn destination(&self, repos_dir: &Path) -> Option<PathBuf> {
        match &self.path {
            Some(p) if p.is_absolute() => Some(p.clone()),
            Some(p) => Some(repos_dir.join(p)),
            None => self.slug().map(|s| repos_dir.join(s)),
        }
    }

    pub fn display(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.uri)
    }
}

/// Parse manifest text.
///
/// # Errors
/// Returns an error if the TOML is malformed.
pub fn parse_config(txt: &str) -> Result<Config> {
    toml::from_str(txt).context("failed to parse config.toml")
}

/// Load and parse the manifest at `path`.
///
/// # Errors
/// - Returns an error naming `path` if it cannot be read.
/// - Returns an error if parsing the TOML fails.
pub fn load_config(path: &Path) -> Result<Config> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("config not found: {}", path.display()))?;
    parse_config(&txt)
}

/// CLI command: print each manifest entry with its resolved destination.
///
/// Example output:
/// ```text
/// - log -> /home/u/.config/gitsync/repos/log [update]
/// - deploy -> /srv/deploy-scripts [clone-only]
/// ```
pub fn cmd_list(cfg: &Config, repos_dir: &Path) -> Result<()> {
    for entry in &cfg.repos {
        let mode = if entry.update { "update" } else { "clone-only" };
        match entry.destination(repos_dir) {
            Some(dest) => println!("- {} -> {} [{}]", entry.display(), dest.display(), mode),
            None => println!("- {} -> (no destination) [{}]", entry.display(), mode),
        }
    }
    Ok(())
}
