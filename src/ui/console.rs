//! Console reporter: progress and output lines on the terminal, mirrored to the log

use anyhow::{Context, Result};
use colored::*;
use log::{LevelFilter, error, info};
use std::fs::OpenOptions;
use std::path::Path;

use crate::deploy::Reporter;

/// Log target of the mirrored console lines
pub const CONSOLE_LOG_TARGET: &str = "bc_pte_deploy::console";

#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn progress(&mut self, msg: &str) {
        info!(target: CONSOLE_LOG_TARGET, "{}", msg);
        eprintln!("{} {}", "→".cyan(), msg);
    }

    fn log(&mut self, msg: &str) {
        info!(target: CONSOLE_LOG_TARGET, "{}", msg);
        println!("  {}", msg.dimmed());
    }

    fn info(&mut self, msg: &str) {
        info!(target: CONSOLE_LOG_TARGET, "{}", msg);
        println!("{} {}", "✓".bright_green().bold(), msg.bright_green());
    }

    fn error(&mut self, msg: &str) {
        error!(target: CONSOLE_LOG_TARGET, "{}", msg);
        eprintln!("{} {}", "✗".bright_red().bold(), msg.red());
    }
}

/// Logger configuration for the binary.
///
/// Console lines are only mirrored when the log goes to a file; on stderr
/// they would show up twice.
pub fn logger_builder(
    env: env_logger::Env<'_>,
    verbose: bool,
    log_file: Option<&Path>,
) -> Result<env_logger::Builder> {
    let default_filter = if verbose { "bc_pte_deploy=debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env.default_filter_or(default_filter));

    match log_file {
        Some(path) => {
            // Truncate on each run
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_module(CONSOLE_LOG_TARGET, LevelFilter::Off);
        }
    }

    Ok(builder)
}
