use super::commands::deploy::{DeployArgs, DeployWithIncrementArgs};
use super::commands::settings::SettingsCommands;
use super::commands::status::StatusArgs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bc-pte-deploy")]
#[command(version)]
#[command(about = "Publish Business Central per-tenant extensions and check their deployment status")]
pub struct Cli {
    /// AL project directory (the one containing app.json)
    #[arg(short, long, global = true, default_value = ".")]
    pub project: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file (truncated on each run) instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the app and publish it as a per-tenant extension
    Deploy(DeployArgs),
    /// Increment the app version, then build and publish it
    DeployWithIncrement(DeployWithIncrementArgs),
    /// Show the deployment status of the app version in app.json
    Status(StatusArgs),
    /// List the deployable environments found in .vscode/launch.json
    Environments,
    /// Settings management
    Settings(SettingsCommands),
}
