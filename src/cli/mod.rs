//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "declmap",
    about = "Declaration-level contract extraction for TypeScript APIs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract declarations and generate contract artifacts for one API
    Generate {
        /// API identifier declared in the configuration file
        #[arg(long)]
        api: String,

        /// Configuration file (default: discovered .declmap.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory override
        #[arg(long)]
        output: Option<PathBuf>,

        /// Abort before writing when the exported name set drifts
        #[arg(long)]
        fail_on_drift: bool,
    },

    /// Write a starter .declmap.toml into the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
