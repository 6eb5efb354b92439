//! Generate command implementation
//!
//! Reads `DEPLOY_FROM_GIT_OPTIONS` from `.magento.env.yaml`, builds the
//! development manifest for the configured repositories and writes it to
//! `composer.json`.

use anyhow::{Context, Result};
use clap::Args;
use cloud_dev::config::EnvConfig;
use cloud_dev::filesystem::{DiskFS, FileSystem};
use cloud_dev::manifest::{ManifestDocument, ManifestGenerator, MANIFEST_FILE};
use cloud_dev::package::{FixedVersion, InstalledPackages, VersionResolver};
use cloud_dev::repository::RepoOptions;
use log::{info, warn};
use std::path::{Path, PathBuf};

use super::resolve_root;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Deployment root (defaults to current directory)
    #[arg(short, long, value_name = "PATH", env = "CLOUD_DEV_ROOT")]
    pub root: Option<PathBuf>,

    /// Output file (defaults to composer.json in the deployment root)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the manifest instead of writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Tooling version to record, instead of reading vendor/composer/installed.json
    #[arg(long, value_name = "VERSION", env = "CLOUD_DEV_TOOLING_VERSION")]
    pub tooling_version: Option<String>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs) -> Result<()> {
    let root = resolve_root(args.root)?;
    let mut fs = DiskFS::new();

    let config = EnvConfig::load(&fs, &root)?;
    let repo_options = config.deploy_from_git_options()?.repositories;
    if repo_options.is_empty() {
        warn!("No repositories configured, generating the base manifest only");
    }

    let manifest = build_manifest(&fs, &root, &repo_options, args.tooling_version)?;
    let json = manifest.to_json_pretty()?;

    if args.dry_run {
        print!("{}", json);
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| root.join(MANIFEST_FILE));
    fs.write(&output, &json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());

    if !args.quiet {
        println!(
            "Generated {} ({} repositories, {} packages)",
            output.display(),
            repo_options.len(),
            manifest.repositories.len()
        );
    }

    Ok(())
}

fn build_manifest(
    fs: &DiskFS,
    root: &Path,
    repo_options: &RepoOptions,
    tooling_version: Option<String>,
) -> Result<ManifestDocument> {
    let installed = InstalledPackages::new(fs, root);
    let fixed = tooling_version.map(FixedVersion);
    let versions: &dyn VersionResolver = match &fixed {
        Some(fixed) => fixed,
        None => &installed,
    };

    let generator = ManifestGenerator::new(fs, versions, root);
    Ok(generator.generate(repo_options)?)
}
