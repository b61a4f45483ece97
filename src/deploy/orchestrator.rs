//! The deploy command: project check, build, environment choice, then
//! authenticate -> resolve company -> upload

use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{DeployError, DeployResult};
use super::host::{Builder, Interaction, Reporter};
use super::select::{choose_environment, remote_environment_name};
use crate::api::{self, AuthRequest, Endpoints, HttpTransport};
use crate::project::{self, IncrementKind, ProjectLock};

/// Where a command currently is; an error reports the stage it aborted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ProjectCheck,
    Build,
    EnvironmentDiscovery,
    EnvironmentSelection,
    CredentialValidation,
    ArtifactLocate,
    Authenticate,
    ResolveCompany,
    Upload,
    QueryStatus,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Idle => "startup",
            Stage::ProjectCheck => "project check",
            Stage::Build => "build",
            Stage::EnvironmentDiscovery => "environment discovery",
            Stage::EnvironmentSelection => "environment selection",
            Stage::CredentialValidation => "credential validation",
            Stage::ArtifactLocate => "artifact lookup",
            Stage::Authenticate => "authentication",
            Stage::ResolveCompany => "company lookup",
            Stage::Upload => "upload",
            Stage::QueryStatus => "status query",
            Stage::Done => "completion",
        };
        f.write_str(text)
    }
}

/// Whether the manifest version is bumped before building
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    Standard,
    /// Raw increment kind as configured; validated before anything runs
    WithIncrement(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed {
        environment: String,
        remote_environment: String,
        artifact: PathBuf,
    },
    Cancelled,
}

/// Per-run settings besides the host capabilities
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub endpoints: Endpoints,
    /// Directory of the packaged .app, relative to the project
    pub artifact_dir: PathBuf,
    /// Catalog index chosen up front instead of prompting
    pub environment_index: Option<usize>,
}

/// Drives the deploy and status commands for one project.
///
/// Every step runs strictly in sequence. Nothing is cached between runs: the
/// project files are read and a token is obtained fresh each time.
pub struct Orchestrator<'a> {
    pub(crate) project_dir: &'a Path,
    pub(crate) options: &'a DeployOptions,
    pub(crate) transport: &'a dyn HttpTransport,
    pub(crate) interaction: &'a mut dyn Interaction,
    pub(crate) reporter: &'a mut dyn Reporter,
    pub(crate) stage: Stage,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        project_dir: &'a Path,
        options: &'a DeployOptions,
        transport: &'a dyn HttpTransport,
        interaction: &'a mut dyn Interaction,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            project_dir,
            options,
            transport,
            interaction,
            reporter,
            stage: Stage::Idle,
        }
    }

    /// Stage reached by the last command
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        debug!("Entering stage: {}", stage);
        self.stage = stage;
    }

    /// Abort unless the directory holds an app.json, then take the project lock
    pub(crate) fn check_project(&mut self) -> DeployResult<ProjectLock> {
        self.enter(Stage::ProjectCheck);
        self.reporter
            .log("Checking if the project is an AL project...");
        if !project::manifest_exists(self.project_dir) {
            return Err(DeployError::NotDeployableProject(
                self.project_dir.to_path_buf(),
            ));
        }
        ProjectLock::acquire(self.project_dir)
    }

    /// Run the deploy command and surface its outcome to the reporter
    pub async fn deploy(
        &mut self,
        builder: &dyn Builder,
        mode: BuildMode,
    ) -> DeployResult<DeployOutcome> {
        self.reporter.log("Starting deployment process...");
        let result = self.run_deploy(builder, &mode).await;

        match &result {
            Ok(DeployOutcome::Deployed {
                environment,
                remote_environment,
                ..
            }) => {
                self.reporter.log(
                    "App is being installed; check extension management or run the status command for details",
                );
                self.reporter.info(&format!(
                    "Successfully deployed to {} as PTE. The app is being installed in {}.",
                    environment, remote_environment
                ));
            }
            Ok(DeployOutcome::Cancelled) => {
                info!("Deployment cancelled by the user");
                self.reporter.log("User cancelled the deployment");
            }
            Err(e) => {
                error!("Deployment aborted during {}: {}", self.stage, e);
                self.reporter
                    .log(&format!("Deployment aborted during {}: {}", self.stage, e));
                self.reporter.error(&format!("Deployment failed: {}", e));
            }
        }

        result
    }

    async fn run_deploy(
        &mut self,
        builder: &dyn Builder,
        mode: &BuildMode,
    ) -> DeployResult<DeployOutcome> {
        let _lock = self.check_project()?;

        self.enter(Stage::Build);
        if let BuildMode::WithIncrement(kind) = mode {
            let kind: IncrementKind = kind.parse()?;
            self.reporter.progress("Incrementing version...");
            let manifest = project::bump_manifest(self.project_dir, kind)?;
            self.reporter
                .log(&format!("Version incremented to {}", manifest.version));
        }
        self.reporter.progress("Building the solution...");
        builder
            .build(self.project_dir)
            .await
            .map_err(|e| DeployError::BuildFailed(format!("{:#}", e)))?;
        self.reporter.log("Solution built successfully");

        self.enter(Stage::EnvironmentDiscovery);
        self.reporter.log("Getting available environments...");
        let environments = project::list_environments(self.project_dir)?;
        if environments.is_empty() {
            return Err(DeployError::NoEnvironmentsConfigured);
        }

        self.enter(Stage::EnvironmentSelection);
        let Some(index) = choose_environment(
            &mut *self.interaction,
            &environments,
            self.options.environment_index,
            "Select Business Central environment to deploy to",
        )?
        else {
            return Ok(DeployOutcome::Cancelled);
        };
        let environment = &environments[index];
        self.reporter
            .log(&format!("Selected environment: {}", environment.name));

        self.enter(Stage::CredentialValidation);
        let auth_request = AuthRequest::for_environment(&environment.config, &self.options.endpoints);
        if !auth_request.is_complete() {
            return Err(DeployError::MissingCredentials(environment.name.clone()));
        }
        self.reporter
            .log("Client ID, Client Secret and Tenant ID found in launch.json");

        self.enter(Stage::ArtifactLocate);
        let manifest = project::read_manifest(self.project_dir)?;
        let artifact = self
            .project_dir
            .join(&self.options.artifact_dir)
            .join(manifest.artifact_file_name());
        if artifact.is_file() {
            self.reporter
                .log(&format!("Found app file: {}", artifact.display()));
        } else {
            // The upload read is what aborts; this only makes the log clearer
            warn!("Expected app file {} is not present", artifact.display());
        }
        let remote_environment = remote_environment_name(&mut *self.interaction, environment)?;
        self.reporter.log(&format!(
            "Deploying to {} ({}) as PTE...",
            environment.name, remote_environment
        ));

        self.enter(Stage::Authenticate);
        self.reporter
            .progress("Authenticating with Business Central...");
        let token = api::authenticate(self.transport, &auth_request).await?;

        self.enter(Stage::ResolveCompany);
        self.reporter.progress("Resolving company...");
        let company_id = api::resolve_company_id(
            self.transport,
            &self.options.endpoints,
            &remote_environment,
            &token,
            environment.config.company_filter(),
        )
        .await?;

        self.enter(Stage::Upload);
        self.reporter.progress("Uploading app...");
        api::upload_artifact(
            self.transport,
            &self.options.endpoints,
            &artifact,
            &remote_environment,
            &token,
            &company_id,
        )
        .await?;
        self.reporter.log("App uploaded successfully");

        self.enter(Stage::Done);
        Ok(DeployOutcome::Deployed {
            environment: environment.name.clone(),
            remote_environment,
            artifact,
        })
    }
}
