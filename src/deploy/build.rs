//! Build step backed by an external command

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info};
use std::path::Path;
use std::process::Stdio;

use super::host::Builder;

/// How many trailing stderr lines to keep in a build failure
const STDERR_TAIL_LINES: usize = 20;

/// Runs a configured command (typically the AL compiler) in the project directory
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    /// `argv[0]` is the program; `None` for an empty argv
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Builder for CommandBuilder {
    async fn build(&self, project_dir: &Path) -> Result<()> {
        info!("Running build command: {} {}", self.program, self.args.join(" "));

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to start '{}'", self.program))?;

        debug!("Build stdout:\n{}", String::from_utf8_lossy(&output.stdout));

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            bail!("'{}' exited with {}\n{}", self.program, output.status, tail);
        }

        Ok(())
    }
}

/// Used when no build command is configured: the .app already on disk is deployed
#[derive(Debug, Clone, Copy, Default)]
pub struct PrebuiltArtifact;

#[async_trait]
impl Builder for PrebuiltArtifact {
    async fn build(&self, project_dir: &Path) -> Result<()> {
        info!(
            "No build command configured, using the existing package in {}",
            project_dir.display()
        );
        Ok(())
    }
}

/// Pick the builder for the configured argv
pub fn builder_for(build_command: Option<&[String]>) -> Box<dyn Builder> {
    match build_command.and_then(CommandBuilder::from_argv) {
        Some(builder) => Box::new(builder),
        None => Box::new(PrebuiltArtifact),
    }
}
