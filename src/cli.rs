//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Cloud development tooling - build development manifests and session settings
#[derive(Parser, Debug)]
#[command(name = "cloud-dev")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the development composer.json from DEPLOY_FROM_GIT_OPTIONS
    Generate(commands::generate::GenerateArgs),

    /// Print the commands that fetch every configured repository
    Scripts(commands::scripts::ScriptsArgs),

    /// Print the session storage configuration for this environment
    Session(commands::session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args),
            Commands::Scripts(args) => commands::scripts::execute(args),
            Commands::Session(args) => commands::session::execute(args),
        }
    }
}

/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(log_level: &str) {
    let env = env_logger::Env::default().default_filter_or(log_level);
    // A logger may already be installed when running inside tests
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
