//! Command line interface definition

use clap::{Parser, Subcommand};
use nwkit_types::ColorChoice;
use std::path::PathBuf;

/// nwkit - provision node-webkit runtimes into a project
#[derive(Parser)]
#[command(name = "nwkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision node-webkit runtimes into a project's resource tree")]
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

    /// Enable debug logging to the user cache directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root the runtimes are provisioned into
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub project: PathBuf,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, extract and assemble runtimes for the selected platforms
    #[command(alias = "p")]
    Provision {
        /// Platform to provision; repeatable (defaults to `platforms.default`)
        #[arg(short, long = "platform", value_name = "PLATFORM")]
        platforms: Vec<String>,

        /// Remove scratch trees and cached archives after success
        #[arg(long)]
        cleanup: bool,
    },

    /// List supported platforms and where they are provisioned
    #[command(alias = "ls")]
    Platforms,
}
