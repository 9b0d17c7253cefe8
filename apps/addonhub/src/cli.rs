//! Command line interface definition

use addonhub_types::Target;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// addonhub - download and verify addons from the registry
#[derive(Parser)]
#[command(name = "addonhub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download and verify addons from the addon registry")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to <data dir>/logs/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Registry API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Work with addons
    #[command(subcommand)]
    Addon(AddonCommands),

    /// Select the team used with session credentials
    Switch {
        /// Team name
        team: String,
    },
}

#[derive(Subcommand)]
pub enum AddonCommands {
    /// Download an addon version and verify its SHA-256 digest
    #[command(alias = "dl")]
    Download {
        /// Addon reference: team/type/name@version
        reference: String,

        /// Directory to write into, or `-` for standard output
        #[arg(short, long, default_value = ".", value_name = "DIR")]
        target: String,
    },
}

impl Commands {
    /// Destination of a download command, if this is one
    pub fn download_target(&self) -> Option<Target> {
        match self {
            Self::Addon(AddonCommands::Download { target, .. }) => {
                Some(Target::from(target.as_str()))
            }
            Self::Switch { .. } => None,
        }
    }
}
