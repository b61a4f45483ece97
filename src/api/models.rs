use serde::Deserialize;
use std::fmt;

use crate::project::Manifest;

/// Client-credentials grant for one tenant
#[derive(Clone)]
pub struct AuthRequest {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub token_url: String,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Bearer token returned by the identity endpoint; used once, never cached
#[derive(Clone, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "access_token")]
    pub access_token: String,
    #[serde(rename = "expires_in", default)]
    pub expires_in_seconds: u64,
    #[serde(rename = "token_type", default)]
    pub token_type: String,
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_in_seconds", &self.expires_in_seconds)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// OAuth error payload (`{"error": ..., "error_description": ...}`)
#[derive(Debug, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// OData collection wrapper
#[derive(Debug, Deserialize)]
pub struct ODataCollection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One row of the extensionDeploymentStatus collection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatusRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub started_on: Option<String>,
}

impl DeploymentStatusRecord {
    /// True when the record describes the app currently in app.json
    pub fn is_relevant(&self, manifest: &Manifest) -> bool {
        self.name == manifest.name
            && self.app_version == manifest.version
            && self.publisher == manifest.publisher
    }

    /// `startedOn` rendered in local time, when present and parseable
    pub fn started_on_local(&self) -> Option<String> {
        let raw = self.started_on.as_deref()?;
        let parsed = chrono::DateTime::parse_from_rfc3339(raw).ok()?;
        Some(
            parsed
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        )
    }
}
