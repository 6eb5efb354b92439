//! # Cloud Development CLI
//!
//! This is the binary entry point for the `cloud-dev` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging.
//! - Executing the selected command and reporting errors.
//!
//! The logic itself lives in the `cloud_dev` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
