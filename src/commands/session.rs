//! Session command implementation
//!
//! Resolves the session storage configuration from the deploy stage of
//! `.magento.env.yaml` and the platform relationships in the process
//! environment, and prints it as JSON.

use anyhow::Result;
use clap::Args;
use cloud_dev::config::{EnvConfig, Stage};
use cloud_dev::environment::{Environment, RelationshipSource};
use cloud_dev::filesystem::DiskFS;
use cloud_dev::session::{SessionConfig, SessionConfigResolver};
use log::info;
use std::path::PathBuf;

use super::resolve_root;

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Deployment root (defaults to current directory)
    #[arg(short, long, value_name = "PATH", env = "CLOUD_DEV_ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the session command
pub fn execute(args: SessionArgs) -> Result<()> {
    let environment = Environment::from_process();
    let session = resolve(args, &environment)?;
    if session.is_empty() {
        info!("No session storage configured, the platform default applies");
    }
    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

fn resolve(args: SessionArgs, environment: &dyn RelationshipSource) -> Result<SessionConfig> {
    let root = resolve_root(args.root)?;
    let config = EnvConfig::load(&DiskFS::new(), &root)?;
    let deploy = config.stage(Stage::Deploy);
    Ok(SessionConfigResolver::new(&deploy, environment).get())
}
