//! The status command: which deployment records belong to the app in app.json

use log::{error, info};

use super::error::{DeployError, DeployResult};
use super::orchestrator::{Orchestrator, Stage};
use super::select::{choose_environment, remote_environment_name};
use crate::api::{self, AuthRequest, DeploymentStatusRecord};
use crate::project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Found {
        remote_environment: String,
        records: Vec<DeploymentStatusRecord>,
    },
    /// Informational, not an error
    NoneFound { remote_environment: String },
    Cancelled,
}

/// One output line per matching record
pub fn format_status_line(remote_environment: &str, record: &DeploymentStatusRecord) -> String {
    let mut line = format!(
        "Environment: {} - Name: {} - AppVersion: {} - Publisher: {} - Status: {}",
        remote_environment, record.name, record.app_version, record.publisher, record.status
    );
    if let Some(operation) = &record.operation_type {
        line.push_str(&format!(" - Operation: {}", operation));
    }
    if let Some(started) = record.started_on_local() {
        line.push_str(&format!(" - Started: {}", started));
    }
    line
}

impl Orchestrator<'_> {
    /// Run the status command and surface its outcome to the reporter
    pub async fn deployment_status(&mut self) -> DeployResult<StatusOutcome> {
        self.reporter.log("Fetching deployment status...");
        let result = self.run_status().await;

        match &result {
            Ok(StatusOutcome::Found {
                remote_environment,
                records,
            }) => {
                self.reporter.log("Deployment Status:");
                for record in records {
                    self.reporter
                        .log(&format_status_line(remote_environment, record));
                }
                self.reporter.info(
                    "Deployment status fetched successfully. Check the output above for details.",
                );
            }
            Ok(StatusOutcome::NoneFound { .. }) => {
                self.reporter
                    .info("No deployment status found for the current app.");
            }
            Ok(StatusOutcome::Cancelled) => {
                info!("Status query cancelled by the user");
                self.reporter.log("User cancelled the operation");
            }
            Err(e) => {
                error!("Status query aborted during {}: {}", self.stage, e);
                self.reporter
                    .log(&format!("Status query aborted during {}: {}", self.stage, e));
                self.reporter
                    .error(&format!("Failed to fetch deployment status: {}", e));
            }
        }

        result
    }

    async fn run_status(&mut self) -> DeployResult<StatusOutcome> {
        let _lock = self.check_project()?;

        self.enter(Stage::EnvironmentDiscovery);
        let environments = project::list_environments(self.project_dir)?;
        if environments.is_empty() {
            return Err(DeployError::NoEnvironmentsConfigured);
        }

        self.enter(Stage::EnvironmentSelection);
        let Some(index) = choose_environment(
            &mut *self.interaction,
            &environments,
            self.options.environment_index,
            "Select Business Central environment to check deployment status",
        )?
        else {
            return Ok(StatusOutcome::Cancelled);
        };
        let environment = &environments[index];

        self.enter(Stage::CredentialValidation);
        let auth_request = AuthRequest::for_environment(&environment.config, &self.options.endpoints);
        if !auth_request.is_complete() {
            return Err(DeployError::MissingCredentials(environment.name.clone()));
        }
        let remote_environment = remote_environment_name(&mut *self.interaction, environment)?;
        let manifest = project::read_manifest(self.project_dir)?;

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

        self.enter(Stage::QueryStatus);
        self.reporter.progress("Querying deployment status...");
        let records = api::fetch_deployment_status(
            self.transport,
            &self.options.endpoints,
            &remote_environment,
            &token,
            &company_id,
        )
        .await?;
        let relevant = api::relevant_records(&records, &manifest);

        self.enter(Stage::Done);
        if relevant.is_empty() {
            Ok(StatusOutcome::NoneFound { remote_environment })
        } else {
            Ok(StatusOutcome::Found {
                remote_environment,
                records: relevant,
            })
        }
    }
}
