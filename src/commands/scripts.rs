//! Scripts command implementation
//!
//! Prints the `install-from-git` commands for the configured repositories,
//! one per line, so they can be reviewed or piped into a shell.

use anyhow::Result;
use clap::Args;
use cloud_dev::config::EnvConfig;
use cloud_dev::filesystem::DiskFS;
use cloud_dev::manifest::install_from_git_scripts;
use std::path::PathBuf;

use super::resolve_root;

/// Arguments for the scripts command
#[derive(Args, Debug)]
pub struct ScriptsArgs {
    /// Deployment root (defaults to current directory)
    #[arg(short, long, value_name = "PATH", env = "CLOUD_DEV_ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the scripts command
pub fn execute(args: ScriptsArgs) -> Result<()> {
    for script in scripts(args)? {
        println!("{}", script);
    }
    Ok(())
}

fn scripts(args: ScriptsArgs) -> Result<Vec<String>> {
    let root = resolve_root(args.root)?;
    let config = EnvConfig::load(&DiskFS::new(), &root)?;
    let repo_options = config.deploy_from_git_options()?.repositories;
    Ok(install_from_git_scripts(&repo_options))
}
