use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::Endpoints;
use crate::api::constants::{API_BASE_URL, LOGIN_BASE_URL};
use crate::project::IncrementKind;

/// Environment variable overriding `increment_version`
pub const INCREMENT_VERSION_ENV: &str = "BC_PTE_INCREMENT_VERSION";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// major | minor | build | revision, used by deploy-with-increment
    #[serde(default)]
    pub increment_version: Option<String>,
    /// argv of the build step; absent means deploy the existing package
    #[serde(default)]
    pub build_command: Option<Vec<String>>,
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_login_base_url() -> String {
    LOGIN_BASE_URL.to_string()
}

fn default_api_base_url() -> String {
    API_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            increment_version: None,
            build_command: None,
            artifact_dir: default_artifact_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            login_base_url: default_login_base_url(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl Settings {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("bc-pte-deploy")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".bc-pte-deploy")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::get_config_path()?)?;
        if let Ok(kind) = std::env::var(INCREMENT_VERSION_ENV) {
            debug!("{} overrides increment_version", INCREMENT_VERSION_ENV);
            settings.increment_version = Some(kind);
        }
        Ok(settings)
    }

    /// A missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading settings from: {:?}", path);

        if !path.exists() {
            info!("Settings file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        }
        let content =
            toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;
        info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Update one setting from its command-line spelling
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "increment-version" => {
                value
                    .parse::<IncrementKind>()
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                self.increment_version = Some(value.to_string());
            }
            "build-command" => {
                let argv: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                self.build_command = if argv.is_empty() { None } else { Some(argv) };
            }
            "artifact-dir" => self.artifact_dir = PathBuf::from(value),
            "request-timeout-secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!(
                        "Invalid value for request-timeout-secs: '{}'. Must be a positive integer.",
                        value
                    )
                })?;
                if secs == 0 {
                    bail!("request-timeout-secs must be greater than 0");
                }
                self.request_timeout_secs = secs;
            }
            "login-base-url" => self.login_base_url = value.to_string(),
            "api-base-url" => self.api_base_url = value.to_string(),
            _ => bail!("Unknown setting: {}", name),
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.login_base_url.clone(), self.api_base_url.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
