//! Extension deployment status records

use log::debug;

use super::constants::Endpoints;
use super::models::{AuthToken, DeploymentStatusRecord, ODataCollection};
use super::transport::HttpTransport;
use crate::deploy::error::{DeployError, DeployResult, redact};
use crate::project::Manifest;

/// Fetch the most recent deployment status records of a company
pub async fn fetch_deployment_status(
    transport: &dyn HttpTransport,
    endpoints: &Endpoints,
    environment: &str,
    token: &AuthToken,
    company_id: &str,
) -> DeployResult<Vec<DeploymentStatusRecord>> {
    let url = endpoints.deployment_status_url(environment, company_id);
    let secrets = [token.access_token.as_str()];

    let response = transport
        .get_json(&url, &token.access_token)
        .await
        .map_err(|e| DeployError::StatusQueryFailed(redact(&format!("{:#}", e), &secrets)))?;

    if !response.is_success() {
        return Err(DeployError::StatusQueryFailed(format!(
            "status endpoint returned status {}",
            response.status
        )));
    }

    let records: ODataCollection<DeploymentStatusRecord> = serde_json::from_str(&response.body)
        .map_err(|e| DeployError::StatusQueryFailed(format!("unexpected response: {}", e)))?;
    debug!("Fetched {} deployment status record(s)", records.value.len());
    Ok(records.value)
}

/// Records matching the manifest's (name, version, publisher), in input order
pub fn relevant_records(
    records: &[DeploymentStatusRecord],
    manifest: &Manifest,
) -> Vec<DeploymentStatusRecord> {
    records
        .iter()
        .filter(|record| record.is_relevant(manifest))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str, publisher: &str, status: &str) -> DeploymentStatusRecord {
        DeploymentStatusRecord {
            name: name.to_string(),
            app_version: version.to_string(),
            publisher: publisher.to_string(),
            status: status.to_string(),
            operation_type: None,
            started_on: None,
        }
    }

    fn manifest() -> Manifest {
        Manifest {
            name: "Foo".to_string(),
            version: "1.2.3.4".to_string(),
            publisher: "Acme".to_string(),
        }
    }

    #[test]
    fn test_relevant_records_match_all_three_fields() {
        let records = vec![
            record("Foo", "1.2.3.4", "Acme", "InProgress"),
            record("Foo", "1.2.3.3", "Acme", "Completed"),
            record("Foo", "1.2.3.4", "Other", "Completed"),
            record("Bar", "1.2.3.4", "Acme", "Failed"),
            record("Foo", "1.2.3.4", "Acme", "Completed"),
        ];

        let relevant = relevant_records(&records, &manifest());
        let statuses: Vec<&str> = relevant.iter().map(|r| r.status.as_str()).collect();
        assert_eq!(statuses, vec!["InProgress", "Completed"]);
    }

    #[test]
    fn test_relevant_records_compare_version_as_written() {
        let manifest = Manifest {
            version: "1.02.3.4".to_string(),
            ..manifest()
        };
        let records = vec![
            record("Foo", "1.2.3.4", "Acme", "Completed"),
            record("Foo", "1.02.3.4", "Acme", "InProgress"),
        ];

        let relevant = relevant_records(&records, &manifest);
        assert_eq!(relevant.len(), 1);
        assert_eq!(relevant[0].status, "InProgress");
    }

    #[test]
    fn test_relevant_records_is_idempotent() {
        let records = vec![
            record("Foo", "1.2.3.4", "Acme", "Completed"),
            record("Bar", "0.0.0.1", "Acme", "Failed"),
        ];
        let once = relevant_records(&records, &manifest());
        let twice = relevant_records(&once, &manifest());
        assert_eq!(once, twice);
        assert!(relevant_records(&[], &manifest()).is_empty());
    }

    #[test]
    fn test_record_deserialization() {
        let body = r#"{"value": [{
            "operationID": "00000000-0000-0000-0000-000000000001",
            "name": "Foo",
            "publisher": "Acme",
            "operationType": "Upload",
            "status": "Completed",
            "schedule": "Current version",
            "appVersion": "1.2.3.4",
            "startedOn": "2024-05-01T10:15:00Z"
        }]}"#;
        let records: ODataCollection<DeploymentStatusRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(records.value.len(), 1);
        let first = &records.value[0];
        assert!(first.is_relevant(&manifest()));
        assert_eq!(first.operation_type.as_deref(), Some("Upload"));
        assert!(first.started_on_local().is_some());
    }
}
