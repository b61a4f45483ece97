use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use log::info;
use std::process::ExitCode;

use crate::config::Settings;

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Set the value of a specific setting
    Set {
        /// Setting name (increment-version, build-command, artifact-dir,
        /// request-timeout-secs, login-base-url, api-base-url)
        name: String,
        /// Setting value
        value: String,
    },
}

pub fn settings_command(args: SettingsCommands) -> Result<ExitCode> {
    let path = Settings::get_config_path()?;

    match args.command {
        SettingsSubcommands::Show => {
            let settings = Settings::load()?;
            let rendered =
                toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
            println!("{} {}", "Settings file:".dimmed(), path.display().to_string().cyan());
            println!();
            println!("{}", rendered);
        }
        SettingsSubcommands::Set { name, value } => {
            info!("Setting {} to {}", name, value);
            let mut settings = Settings::load_from(&path)?;
            settings.set(&name, &value)?;
            settings.save_to(&path)?;
            println!("Set {} to {}", name.bright_white().bold(), value.bright_green());
        }
    }

    Ok(ExitCode::SUCCESS)
}
