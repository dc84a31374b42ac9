use anyhow::Result;
use std::{env, ffi::OsString, path::PathBuf};

#[derive(Clone, Debug)]
pub struct Paths {
    pub repos: PathBuf,
    pub config: PathBuf,
}

fn home_from(xdg: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let base = xdg
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(home.unwrap_or_default()).join(".config"));
    base.join("gitsync")
}

/// `$XDG_CONFIG_HOME/gitsync`, or `~/.config/gitsync` when unset.
pub fn gitsync_home() -> Result<PathBuf> {
    Ok(home_from(
        env::var_os("XDG_CONFIG_HOME"),
        env::var_os("HOME"),
    ))
}

pub fn paths() -> Result<Paths> {
    let home = gitsync_home()?;
    Ok(Paths {
        repos: home.join("repos"),
        config: home.join("config.toml"),
    })
}
