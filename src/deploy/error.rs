//! Failure taxonomy for the deploy and status commands

use std::path::PathBuf;
use thiserror::Error;

pub type DeployResult<T> = std::result::Result<T, DeployError>;

/// Every way a deployment or status query can abort.
///
/// Messages are shown to the user verbatim, so they must never contain a
/// client secret or a bearer token.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("This is not an AL project: no app.json found in {}", .0.display())]
    NotDeployableProject(PathBuf),

    #[error("app.json not found at {}", .0.display())]
    ManifestMissing(PathBuf),

    #[error("app.json is invalid: {0}")]
    ManifestInvalid(String),

    #[error("Invalid version format in app.json: '{0}' (expected four numbers, e.g. 1.0.0.0)")]
    VersionFormatInvalid(String),

    #[error("Invalid increment version configuration '{0}'. Expected one of: major, minor, build, revision")]
    InvalidIncrementConfig(String),

    #[error("Failed to build the solution: {0}")]
    BuildFailed(String),

    #[error("Could not parse launch.json: {0}")]
    ConfigParseError(String),

    #[error("No Business Central environments found in launch.json")]
    NoEnvironmentsConfigured,

    #[error("Environment index {index} is out of range ({count} environments configured)")]
    EnvironmentIndexOutOfRange { index: usize, count: usize },

    #[error("Client ID, Client Secret or Tenant ID is missing in launch.json for '{0}'")]
    MissingCredentials(String),

    #[error("Environment name is required")]
    EnvironmentNameRequired,

    #[error("Could not find compiled .app file: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("App file is empty: {}", .0.display())]
    EmptyArtifact(PathBuf),

    #[error("Failed to authenticate with Business Central: {0}")]
    AuthenticationFailed(String),

    #[error("No companies found in Business Central environment '{0}'")]
    NoCompaniesFound(String),

    #[error("Failed to get company ID from Business Central: {0}")]
    CompanyLookupFailed(String),

    #[error("Failed to upload app to Business Central: unexpected status code {status}")]
    UnexpectedUploadStatus { status: u16, body: String },

    #[error("Failed to fetch deployment status: {0}")]
    StatusQueryFailed(String),

    #[error("Another deployment or status query is already running for this project (lock file {})", .0.display())]
    DeploymentInProgress(PathBuf),

    #[error("Request to Business Central failed: {0}")]
    Transport(String),

    #[error("Prompt failed: {0}")]
    Interaction(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Replace every occurrence of a known secret in `text` with `[REDACTED]`.
///
/// Used on any text that originates from a remote response or a transport
/// error before it is logged or wrapped into a [`DeployError`].
pub fn redact(text: &str, secrets: &[&str]) -> String {
    let mut sanitized = text.to_string();
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        sanitized = sanitized.replace(secret, "[REDACTED]");
    }
    sanitized
}
