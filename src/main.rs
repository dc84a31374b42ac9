//! # gitsync
//!
//! **gitsync** keeps local clones of remote git repositories up to date.
//!
//! Features:
//! - `gitsync clone <URI> <DEST>` clones unless a working copy is already there
//! - `gitsync check <PATH>` tells whether a path is a working copy
//! - `gitsync update <URI> <DEST>` clones if needed, then fast-forwards from `origin`
//! - `gitsync sync` does the above for every repo in `$(gitsync home)/config.toml`
//! - `gitsync list` shows manifest entries with their destinations
//! - `gitsync home` prints the gitsync home directory
//!
//! `-v` reports what happened, `-vv` also streams transfer progress.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use gitsync::{
    RepoSync, Settings, cmd_list, cmd_sync, gitsync_home, init_logging, load_config, paths,
};
use std::path::PathBuf;

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "gitsync",
    version,
    about = "gitsync - keep local git clones present and current",
    arg_required_else_help = true
)]
struct Cli {
    /// Increase verbosity (-v info, -vv progress + debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Manifest to read instead of $(gitsync home)/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Clone URI into DEST unless DEST is already a working copy
    Clone { uri: String, dest: PathBuf },
    /// Report whether PATH is a working copy
    Check { path: PathBuf },
    /// Clone if needed, then fast-forward DEST from origin
    Update { uri: String, dest: PathBuf },
    /// Clone/update every repository in the manifest
    Sync,
    /// List manifest entries with their resolved destinations
    List,
    /// Print the gitsync home directory
    Home,
}

/// Install logging and build settings from the effective verbosity.
fn settings(verbosity: u8) -> Result<Settings> {
    init_logging(verbosity)?;
    Ok(Settings::new(verbosity))
}

/// CLI entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let Some(cmd) = cli.cmd else {
        return Ok(());
    };

    match cmd {
        Cmd::Clone { uri, dest } => {
            RepoSync::new(settings(cli.verbose)?).ensure_cloned(&uri, &dest)?;
            Ok(())
        }
        Cmd::Check { path } => {
            let cloned = RepoSync::new(settings(cli.verbose)?).is_git_cloned(&path)?;
            println!("{}", if cloned { "cloned" } else { "not cloned" });
            Ok(())
        }
        Cmd::Update { uri, dest } => {
            RepoSync::new(settings(cli.verbose)?).ensure_updated(&uri, &dest)?;
            Ok(())
        }
        Cmd::Sync | Cmd::List => {
            let p = paths()?;
            let cfg = load_config(cli.config.as_deref().unwrap_or(p.config.as_path()))?;
            // An explicit -v beats the manifest.
            let verbosity = if cli.verbose > 0 {
                cli.verbose
            } else {
                cfg.verbosity.unwrap_or(0)
            };
            let s = settings(verbosity)?;
            if matches!(cmd, Cmd::Sync) {
                cmd_sync(&cfg, &p.repos, s)
            } else {
                cmd_list(&cfg, &p.repos)
            }
        }
        Cmd::Home => {
            println!("{}", gitsync_home()?.display());
            Ok(())
        }
    }
}
