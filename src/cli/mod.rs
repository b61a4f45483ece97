pub mod app;
pub mod commands;

pub use app::{Cli, Commands};

use anyhow::Result;
use std::process::ExitCode;

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let project = cli.project;
    match cli.command {
        Commands::Deploy(args) => commands::deploy_command(&project, args).await,
        Commands::DeployWithIncrement(args) => {
            commands::deploy_with_increment_command(&project, args).await
        }
        Commands::Status(args) => commands::status_command(&project, args).await,
        Commands::Environments => commands::environments_command(&project),
        Commands::Settings(args) => commands::settings_command(args),
    }
}
