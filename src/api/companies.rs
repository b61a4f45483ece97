//! Company lookup within a Business Central environment

use log::{debug, info};

use super::constants::Endpoints;
use super::models::{AuthToken, Company, ODataCollection};
use super::transport::HttpTransport;
use crate::deploy::error::{DeployError, DeployResult, redact};

/// Resolve the id of the company extensions are uploaded through.
///
/// With a filter the platform narrows by exact name; whatever remains, the
/// first company returned wins.
pub async fn resolve_company_id(
    transport: &dyn HttpTransport,
    endpoints: &Endpoints,
    environment: &str,
    token: &AuthToken,
    company_name: Option<&str>,
) -> DeployResult<String> {
    let url = endpoints.companies_url(environment, company_name);
    let secrets = [token.access_token.as_str()];

    let response = transport
        .get_json(&url, &token.access_token)
        .await
        .map_err(|e| DeployError::CompanyLookupFailed(redact(&format!("{:#}", e), &secrets)))?;

    if !response.is_success() {
        return Err(DeployError::CompanyLookupFailed(format!(
            "companies endpoint returned status {}",
            response.status
        )));
    }

    let companies: ODataCollection<Company> = serde_json::from_str(&response.body)
        .map_err(|e| DeployError::CompanyLookupFailed(format!("unexpected response: {}", e)))?;
    debug!(
        "Environment {} returned {} company(ies)",
        environment,
        companies.value.len()
    );

    let company = companies
        .value
        .into_iter()
        .next()
        .ok_or_else(|| DeployError::NoCompaniesFound(environment.to_string()))?;

    info!("Using company {} ({})", company.name, company.id);
    Ok(company.id)
}
