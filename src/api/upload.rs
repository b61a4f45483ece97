//! Extension upload through the automation API

use log::{info, warn};
use std::io::ErrorKind;
use std::path::Path;

use super::constants::{Endpoints, headers};
use super::models::AuthToken;
use super::transport::HttpTransport;
use crate::deploy::error::{DeployError, DeployResult, redact};

/// The only status that means "accepted for install"
pub const UPLOAD_ACCEPTED: u16 = 204;

/// PATCH the .app file to the company's extensionUpload content.
///
/// Success is exactly 204. A 200 or 201 is reported as a failure because the
/// platform only promises asynchronous processing for 204.
pub async fn upload_artifact(
    transport: &dyn HttpTransport,
    endpoints: &Endpoints,
    artifact: &Path,
    environment: &str,
    token: &AuthToken,
    company_id: &str,
) -> DeployResult<()> {
    let bytes = match tokio::fs::read(artifact).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DeployError::ArtifactNotFound(artifact.to_path_buf()));
        }
        Err(e) => {
            return Err(DeployError::io(
                format!("Failed to read {}", artifact.display()),
                e,
            ));
        }
    };
    if bytes.is_empty() {
        return Err(DeployError::EmptyArtifact(artifact.to_path_buf()));
    }

    let url = endpoints.extension_upload_url(environment, company_id);
    let secrets = [token.access_token.as_str()];
    info!("Uploading {} ({} bytes)", artifact.display(), bytes.len());

    let response = transport
        .patch_binary(
            &url,
            &token.access_token,
            &[
                ("If-Match", headers::IF_MATCH_ANY),
                ("Content-Type", headers::CONTENT_TYPE_OCTET_STREAM),
            ],
            bytes,
        )
        .await
        .map_err(|e| DeployError::Transport(redact(&format!("{:#}", e), &secrets)))?;

    if response.status != UPLOAD_ACCEPTED {
        warn!("Unexpected upload status code: {}", response.status);
        return Err(DeployError::UnexpectedUploadStatus {
            status: response.status,
            body: redact(&response.body, &secrets),
        });
    }

    info!("Extension upload accepted by {}", environment);
    Ok(())
}
