//! deploy and deploy-with-increment

use anyhow::Result;
use clap::Args;
use log::debug;
use std::path::Path;
use std::process::ExitCode;

use super::{CommandSession, exit_code};
use crate::config::Settings;
use crate::deploy::{BuildMode, Orchestrator, builder_for};
use crate::ui::{ConsoleReporter, DialoguerInteraction};

#[derive(Args)]
pub struct DeployArgs {
    /// Index of the environment to deploy to (see `environments`); skips the prompt
    #[arg(short, long)]
    pub environment: Option<usize>,
}

#[derive(Args)]
pub struct DeployWithIncrementArgs {
    #[command(flatten)]
    pub target: DeployArgs,

    /// Version component to increment (defaults to the increment-version setting)
    #[arg(short, long, value_parser = ["major", "minor", "build", "revision"])]
    pub increment: Option<String>,
}

pub async fn deploy_command(project_dir: &Path, args: DeployArgs) -> Result<ExitCode> {
    run_deploy(project_dir, args.environment, |_| BuildMode::Standard).await
}

pub async fn deploy_with_increment_command(
    project_dir: &Path,
    args: DeployWithIncrementArgs,
) -> Result<ExitCode> {
    let increment = args.increment;
    run_deploy(project_dir, args.target.environment, move |settings| {
        // An unset kind is rejected by the orchestrator like any other invalid one
        let kind = increment
            .or_else(|| settings.increment_version.clone())
            .unwrap_or_default();
        BuildMode::WithIncrement(kind)
    })
    .await
}

async fn run_deploy(
    project_dir: &Path,
    environment: Option<usize>,
    mode: impl FnOnce(&Settings) -> BuildMode,
) -> Result<ExitCode> {
    let session = CommandSession::new(environment)?;
    let mode = mode(&session.settings);
    debug!("Deploying {} with {:?}", project_dir.display(), mode);

    let builder = builder_for(session.settings.build_command.as_deref());
    let mut interaction = DialoguerInteraction::new();
    let mut reporter = ConsoleReporter::new();

    let mut orchestrator = Orchestrator::new(
        project_dir,
        &session.options,
        &session.transport,
        &mut interaction,
        &mut reporter,
    );
    let result = orchestrator.deploy(&*builder, mode).await;

    Ok(exit_code(&result))
}
