//! OAuth2 client-credentials exchange against Azure AD

use log::{debug, info, warn};

use super::constants::{BC_SCOPE, Endpoints};
use super::models::{AuthRequest, AuthToken, OAuthError};
use super::transport::HttpTransport;
use crate::deploy::error::{DeployError, DeployResult, redact};
use crate::project::EnvironmentConfig;

impl AuthRequest {
    /// Build the grant for an environment entry of launch.json
    pub fn for_environment(config: &EnvironmentConfig, endpoints: &Endpoints) -> Self {
        Self {
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: BC_SCOPE.to_string(),
            token_url: endpoints.token_url(&config.tenant_id),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.tenant_id.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Exchange client credentials for a bearer token. One attempt, no retry.
pub async fn authenticate(
    transport: &dyn HttpTransport,
    request: &AuthRequest,
) -> DeployResult<AuthToken> {
    info!(
        "Requesting token for client {} in tenant {}",
        request.client_id, request.tenant_id
    );
    let secrets = [request.client_secret.as_str()];

    let response = transport
        .post_form(
            &request.token_url,
            &[
                ("grant_type", "client_credentials"),
                ("client_id", request.client_id.as_str()),
                ("client_secret", request.client_secret.as_str()),
                ("scope", request.scope.as_str()),
            ],
        )
        .await
        .map_err(|e| DeployError::AuthenticationFailed(redact(&format!("{:#}", e), &secrets)))?;

    debug!("Token request status: {}", response.status);

    if !response.is_success() {
        let reason = match serde_json::from_str::<OAuthError>(&response.body) {
            Ok(OAuthError {
                error,
                error_description: Some(description),
            }) => format!("{}: {}", error, first_line(&description)),
            Ok(OAuthError { error, .. }) => error,
            Err(_) => format!("token endpoint returned status {}", response.status),
        };
        let reason = redact(&reason, &secrets);
        warn!("Token request rejected: {}", reason);
        return Err(DeployError::AuthenticationFailed(reason));
    }

    let token: AuthToken = serde_json::from_str(&response.body).map_err(|_| {
        DeployError::AuthenticationFailed("no access token in response".to_string())
    })?;
    if token.access_token.is_empty() {
        return Err(DeployError::AuthenticationFailed(
            "no access token in response".to_string(),
        ));
    }

    info!(
        "Obtained {} token valid for {}s",
        token.token_type, token.expires_in_seconds
    );
    Ok(token)
}

/// Azure AD descriptions carry trace ids on following lines
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text).trim()
}
