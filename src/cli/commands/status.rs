use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::process::ExitCode;

use super::{CommandSession, exit_code};
use crate::deploy::Orchestrator;
use crate::ui::{ConsoleReporter, DialoguerInteraction};

#[derive(Args)]
pub struct StatusArgs {
    /// Index of the environment to query (see `environments`); skips the prompt
    #[arg(short, long)]
    pub environment: Option<usize>,
}

/// Report deployment status records matching the current app.json
pub async fn status_command(project_dir: &Path, args: StatusArgs) -> Result<ExitCode> {
    let session = CommandSession::new(args.environment)?;
    let mut interaction = DialoguerInteraction::new();
    let mut reporter = ConsoleReporter::new();

    let mut orchestrator = Orchestrator::new(
        project_dir,
        &session.options,
        &session.transport,
        &mut interaction,
        &mut reporter,
    );
    let result = orchestrator.deployment_status().await;

    Ok(exit_code(&result))
}
