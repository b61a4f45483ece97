//! Deployable environments declared in .vscode/launch.json

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::deploy::error::{DeployError, DeployResult};

/// Launch configuration file, relative to the project root
pub const LAUNCH_FILE: [&str; 2] = [".vscode", "launch.json"];

/// `type` marker of a PTE deployment profile
pub const PTE_CONFIG_TYPE: &str = "PTE";

/// `request` marker of a PTE deployment profile
pub const PTE_REQUEST_MODE: &str = "AL PTE Publish";

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"));

/// One PTE entry of launch.json
#[derive(Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "request", default)]
    pub request_mode: String,
    #[serde(rename = "name", default, deserialize_with = "null_as_empty")]
    pub display_name: String,
    #[serde(rename = "tenant", default, deserialize_with = "null_as_empty")]
    pub tenant_id: String,
    #[serde(rename = "environmentName", default)]
    pub remote_environment_name: Option<String>,
    #[serde(rename = "companyName", default)]
    pub company_name: Option<String>,
    #[serde(rename = "clientID", default, deserialize_with = "null_as_empty")]
    pub client_id: String,
    #[serde(rename = "clientSecret", default, deserialize_with = "null_as_empty")]
    pub client_secret: String,
}

/// `null` reads the same as a missing field
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl EnvironmentConfig {
    pub fn is_deployable(&self) -> bool {
        self.kind == PTE_CONFIG_TYPE && self.request_mode == PTE_REQUEST_MODE
    }

    /// True when tenant, client id and client secret are all present
    pub fn has_credentials(&self) -> bool {
        !self.tenant_id.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Remote environment name, treating an empty string as absent
    pub fn remote_environment(&self) -> Option<&str> {
        self.remote_environment_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Company filter, treating an empty string as absent
    pub fn company_filter(&self) -> Option<&str> {
        self.company_name.as_deref().filter(|name| !name.is_empty())
    }
}

impl fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("kind", &self.kind)
            .field("request_mode", &self.request_mode)
            .field("display_name", &self.display_name)
            .field("tenant_id", &self.tenant_id)
            .field("remote_environment_name", &self.remote_environment_name)
            .field("company_name", &self.company_name)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// A deployable target; `name` is a label only and may repeat
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    pub config: EnvironmentConfig,
}

pub fn launch_path(project_dir: &Path) -> PathBuf {
    LAUNCH_FILE
        .iter()
        .fold(project_dir.to_path_buf(), |path, part| path.join(part))
}

/// Read the deployable environments of a project.
///
/// A missing launch.json yields an empty list. Entries whose type/request
/// pair is not the PTE pair are skipped without complaint.
pub fn list_environments(project_dir: &Path) -> DeployResult<Vec<Environment>> {
    let path = launch_path(project_dir);
    if !path.is_file() {
        debug!("No launch configuration at {}", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| DeployError::io(format!("Failed to read {}", path.display()), e))?;
    let environments = parse_environments(&content)?;
    debug!(
        "Found {} deployable environment(s) in {}",
        environments.len(),
        path.display()
    );
    Ok(environments)
}

/// Parse launch.json text into the deployable catalog
pub fn parse_environments(content: &str) -> DeployResult<Vec<Environment>> {
    let normalized = strip_trailing_commas(content);
    let document: Value = serde_json::from_str(&normalized)
        .map_err(|e| DeployError::ConfigParseError(e.to_string()))?;

    let entries = document
        .get("configurations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            DeployError::ConfigParseError("missing \"configurations\" list".to_string())
        })?;

    let mut environments = Vec::new();
    for (position, entry) in entries.iter().enumerate() {
        if !has_pte_markers(entry) {
            continue;
        }
        match EnvironmentConfig::deserialize(entry) {
            Ok(config) => environments.push(Environment {
                name: config.display_name.clone(),
                config,
            }),
            Err(e) => {
                warn!("Configuration #{} has the PTE markers but is malformed", position);
                return Err(DeployError::ConfigParseError(format!(
                    "configuration #{}: {}",
                    position, e
                )));
            }
        }
    }

    Ok(environments)
}

fn has_pte_markers(entry: &Value) -> bool {
    entry.get("type").and_then(Value::as_str) == Some(PTE_CONFIG_TYPE)
        && entry.get("request").and_then(Value::as_str) == Some(PTE_REQUEST_MODE)
}

/// Drop commas that directly precede a closing brace or bracket
pub fn strip_trailing_commas(content: &str) -> String {
    TRAILING_COMMA.replace_all(content, "$1").into_owned()
}
