//! Business Central endpoints and request constants

/// Azure AD identity host
pub const LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";

/// Business Central API host
pub const API_BASE_URL: &str = "https://api.businesscentral.dynamics.com";

/// Scope requested in the client-credentials grant
pub const BC_SCOPE: &str = "https://api.businesscentral.dynamics.com/.default";

/// Automation API version serving companies and extension uploads
pub const AUTOMATION_V1: &str = "v1.0";

/// Automation API version serving extension deployment status
pub const AUTOMATION_V2: &str = "v2.0";

/// How many deployment status records to request
pub const STATUS_PAGE_SIZE: usize = 10;

/// Standard headers for Business Central requests
pub mod headers {
    /// Accept header for JSON responses
    pub const ACCEPT_JSON: &str = "application/json";

    /// Content type of the extension upload body
    pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

    /// If-Match header for unconditional overwrite
    pub const IF_MATCH_ANY: &str = "*";
}

/// Base URLs the API calls are built from.
///
/// Defaults to the public cloud; overridable from settings so other clouds
/// (and local test servers) can be targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login_base_url: String,
    pub api_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login_base_url: LOGIN_BASE_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(login_base_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            login_base_url: trim_slash(login_base_url.into()),
            api_base_url: trim_slash(api_base_url.into()),
        }
    }

    /// OAuth2 v2 token endpoint of a tenant
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_base_url,
            urlencoding::encode(tenant_id)
        )
    }

    fn automation_url(&self, environment: &str, api_version: &str) -> String {
        format!(
            "{}/v2.0/{}/api/microsoft/automation/{}",
            self.api_base_url,
            urlencoding::encode(environment),
            api_version
        )
    }

    /// Companies collection, optionally filtered by exact name
    pub fn companies_url(&self, environment: &str, company_name: Option<&str>) -> String {
        let base = format!("{}/companies", self.automation_url(environment, AUTOMATION_V1));
        match company_name {
            Some(name) => {
                let filter = format!("name eq '{}'", name.replace('\'', "''"));
                format!("{}?$filter={}", base, urlencoding::encode(&filter))
            }
            None => base,
        }
    }

    /// Binary content endpoint of the extension upload entity
    pub fn extension_upload_url(&self, environment: &str, company_id: &str) -> String {
        format!(
            "{}/companies({})/extensionUpload(0)/content",
            self.automation_url(environment, AUTOMATION_V1),
            company_id
        )
    }

    /// Most recent extension deployment status records
    pub fn deployment_status_url(&self, environment: &str, company_id: &str) -> String {
        format!(
            "{}/companies({})/extensionDeploymentStatus?$top={}",
            self.automation_url(environment, AUTOMATION_V2),
            company_id,
            STATUS_PAGE_SIZE
        )
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
