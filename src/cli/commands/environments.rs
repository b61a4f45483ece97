//! Deployable environment listing

use anyhow::Result;
use colored::*;
use std::path::Path;
use std::process::ExitCode;

use crate::project::{launch, list_environments};

/// Print the PTE catalog of launch.json. Secrets are never shown.
pub fn environments_command(project_dir: &Path) -> Result<ExitCode> {
    let environments = match list_environments(project_dir) {
        Ok(environments) => environments,
        Err(e) => {
            eprintln!("{} {}", "✗".bright_red().bold(), e.to_string().red());
            return Ok(ExitCode::FAILURE);
        }
    };

    println!();
    println!("  {}", "Business Central PTE environments".bright_blue().bold());
    println!("  {}", "═════════════════════════════════".bright_blue());

    if environments.is_empty() {
        println!();
        println!(
            "  {}",
            "⚠️  No Business Central environments found in launch.json".bright_yellow().bold()
        );
        println!(
            "  {} {}",
            "Add a configuration with".dimmed(),
            format!(
                "\"type\": \"{}\", \"request\": \"{}\"",
                launch::PTE_CONFIG_TYPE,
                launch::PTE_REQUEST_MODE
            )
            .cyan()
        );
        return Ok(ExitCode::SUCCESS);
    }

    for (index, environment) in environments.iter().enumerate() {
        let config = &environment.config;
        println!();
        println!(
            "  {} {}",
            format!("[{}]", index).bright_white().bold(),
            environment.name.bright_green().bold()
        );
        println!(
            "    {}: {}",
            "Environment".dimmed(),
            config
                .remote_environment()
                .map(|name| name.cyan())
                .unwrap_or_else(|| "(prompted at deploy time)".yellow())
        );
        println!("    {}: {}", "Tenant".dimmed(), config.tenant_id.white());
        if let Some(company) = config.company_filter() {
            println!("    {}: {}", "Company".dimmed(), company.white());
        }
        println!("    {}: {}", "Client ID".dimmed(), config.client_id.white());
        let credentials = if config.has_credentials() {
            "complete".bright_green()
        } else {
            "missing client ID, client secret or tenant".bright_red()
        };
        println!("    {}: {}", "Credentials".dimmed(), credentials);
    }

    Ok(ExitCode::SUCCESS)
}
