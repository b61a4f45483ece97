pub mod deploy;
pub mod environments;
pub mod settings;
pub mod status;

use anyhow::Result;
use std::process::ExitCode;

use crate::api::ReqwestTransport;
use crate::config::Settings;
use crate::deploy::{DeployOptions, DeployResult};

pub use deploy::{deploy_command, deploy_with_increment_command};
pub use environments::environments_command;
pub use settings::settings_command;
pub use status::status_command;

/// Settings and HTTP transport shared by the network commands
pub(crate) struct CommandSession {
    pub settings: Settings,
    pub options: DeployOptions,
    pub transport: ReqwestTransport,
}

impl CommandSession {
    pub fn new(environment_index: Option<usize>) -> Result<Self> {
        let settings = Settings::load()?;
        let transport = ReqwestTransport::new(settings.request_timeout())?;
        let options = DeployOptions {
            endpoints: settings.endpoints(),
            artifact_dir: settings.artifact_dir.clone(),
            environment_index,
        };
        Ok(Self {
            settings,
            options,
            transport,
        })
    }
}

/// The outcome was already reported; only the exit status is left to decide
pub(crate) fn exit_code<T>(result: &DeployResult<T>) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
