//! Deployment status queries against scripted host capabilities

mod common;

use bc_pte_deploy::api::HttpResponse;
use bc_pte_deploy::deploy::{DeployError, DeployOptions, Orchestrator, Stage, StatusOutcome};
use common::*;

const THREE_RECORDS: &str = r#"{"value":[
    {"name":"Foo","appVersion":"1.2.3.4","publisher":"Acme","status":"Completed","operationType":"Upload","startedOn":"2024-05-01T10:00:00Z"},
    {"name":"Foo","appVersion":"1.2.3.3","publisher":"Acme","status":"Completed"},
    {"name":"Bar","appVersion":"1.2.3.4","publisher":"Acme","status":"InProgress"}
]}"#;

/// Test that only records for the app in app.json are reported
#[tokio::test]
async fn test_status_reports_matching_records() {
    let project = TestProject::standard(ONE_ENVIRONMENT);
    let options = DeployOptions::default();
    let mut transport = ScriptedTransport::happy();
    transport.status = Some(HttpResponse::new(200, THREE_RECORDS));
    let mut interaction = ScriptedInteraction::default();
    let mut reporter = RecordingReporter::default();

    let result = Orchestrator::new(
        project.path(),
        &options,
        &transport,
        &mut interaction,
        &mut reporter,
    )
    .deployment_status()
    .await;

    match result {
        Ok(StatusOutcome::Found {
            remote_environment,
            records,
        }) => {
            assert_eq!(remote_environment, "sandbox");
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].app_version, "1.2.3.4");
            assert_eq!(records[0].name, "Foo");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let status_lines: Vec<&String> = reporter
        .logs
        .iter()
        .filter(|line| line.starts_with("Environment: "))
        .collect();
    assert_eq!(status_lines.len(), 1);
    assert!(status_lines[0].starts_with(
        "Environment: sandbox - Name: Foo - AppVersion: 1.2.3.4 - Publisher: Acme - Status: Completed - Operation: Upload"
    ));
    assert_eq!(reporter.infos.len(), 1);
    assert!(reporter.errors.is_empty());

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[2].url.ends_with(
        "/v2.0/sandbox/api/microsoft/automation/v2.0/companies(c0ffee00-0000-0000-0000-000000000001)/extensionDeploymentStatus?$top=10"
    ));
    assert_eq!(calls[2].bearer.as_deref(), Some(ACCESS_TOKEN));
}

/// Test that no matching record is informational and not an error
#[tokio::test]
async fn test_status_none_found() {
    let project = TestProject::standard(ONE_ENVIRONMENT);
    let options = DeployOptions::default();
    let transport = ScriptedTransport::happy();
    let mut interaction = ScriptedInteraction::default();
    let mut reporter = RecordingReporter::default();

    let mut orchestrator = Orchestrator::new(
        project.path(),
        &options,
        &transport,
        &mut interaction,
        &mut reporter,
    );
    let result = orchestrator.deployment_status().await;
    assert_eq!(orchestrator.stage(), Stage::Done);

    assert!(matches!(
        result,
        Ok(StatusOutcome::NoneFound { ref remote_environment }) if remote_environment == "sandbox"
    ));
    assert_eq!(
        reporter.infos,
        vec!["No deployment status found for the current app."]
    );
    assert!(reporter.errors.is_empty());
}

/// Test that dismissing the picker cancels the query without network calls
#[tokio::test]
async fn test_status_cancelled() {
    let project = TestProject::standard(TWO_ENVIRONMENTS);
    let options = DeployOptions::default();
    let transport = ScriptedTransport::happy();
    let mut interaction = ScriptedInteraction::choosing(None);
    let mut reporter = RecordingReporter::default();

    let result = Orchestrator::new(
        project.path(),
        &options,
        &transport,
        &mut interaction,
        &mut reporter,
    )
    .deployment_status()
    .await;

    assert!(matches!(result, Ok(StatusOutcome::Cancelled)));
    assert!(transport.calls().is_empty());
    assert!(reporter.errors.is_empty());
}

/// Test that a failing status endpoint is reported as a status query failure
#[tokio::test]
async fn test_status_endpoint_failure() {
    let project = TestProject::standard(ONE_ENVIRONMENT);
    let options = DeployOptions::default();
    let mut transport = ScriptedTransport::happy();
    transport.status = Some(HttpResponse::new(500, "Internal Server Error"));
    let mut interaction = ScriptedInteraction::default();
    let mut reporter = RecordingReporter::default();

    let mut orchestrator = Orchestrator::new(
        project.path(),
        &options,
        &transport,
        &mut interaction,
        &mut reporter,
    );
    let result = orchestrator.deployment_status().await;

    assert!(matches!(result, Err(DeployError::StatusQueryFailed(_))));
    assert_eq!(orchestrator.stage(), Stage::QueryStatus);
    assert_eq!(reporter.errors.len(), 1);
    assert!(reporter.errors[0].starts_with("Failed to fetch deployment status:"));
}

/// Test that the status query also requires an AL project
#[tokio::test]
async fn test_status_without_manifest() {
    let project = TestProject::new();
    project.write_launch(ONE_ENVIRONMENT);
    let options = DeployOptions::default();
    let transport = ScriptedTransport::happy();
    let mut interaction = ScriptedInteraction::default();
    let mut reporter = RecordingReporter::default();

    let result = Orchestrator::new(
        project.path(),
        &options,
        &transport,
        &mut interaction,
        &mut reporter,
    )
    .deployment_status()
    .await;

    assert!(matches!(result, Err(DeployError::NotDeployableProject(_))));
    assert!(transport.calls().is_empty());
}
