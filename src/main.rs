use anyhow::Result;
use bc_pte_deploy::cli::{self, Cli};
use bc_pte_deploy::ui::console::logger_builder;
use clap::Parser;
use colored::*;
use log::info;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // A project-local .env may carry BC_PTE_INCREMENT_VERSION or RUST_LOG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("{} {:#}", "✗".bright_red().bold(), e);
        return ExitCode::FAILURE;
    }
    info!("Starting bc-pte-deploy");

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{} {:#}", "✗".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    logger_builder(env_logger::Env::default(), verbose, log_file)?.init();
    Ok(())
}
