//! # CLI Command Implementations
//!
//! Each subcommand of `cloud-dev` lives in its own module with:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap`.
//! - An `execute` function that takes the parsed `Args`, calls into the
//!   `cloud_dev` library and prints the result.

pub mod generate;
pub mod scripts;
pub mod session;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// The deployment root as an absolute path: the `--root` argument, else the
/// current directory.
pub(crate) fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => std::path::absolute(&root)
            .with_context(|| format!("Failed to resolve deployment root {}", root.display())),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}
