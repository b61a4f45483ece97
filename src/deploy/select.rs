//! Picking the target environment and its remote name

use log::debug;

use super::error::{DeployError, DeployResult};
use super::host::{ChoiceOption, Interaction, TextPrompt};
use crate::project::Environment;

/// Choose a catalog index.
///
/// A preselected index wins; a single entry is taken without prompting;
/// otherwise the user picks. `Ok(None)` is a user cancellation. Selection is
/// always by index since labels may repeat.
pub fn choose_environment(
    interaction: &mut dyn Interaction,
    environments: &[Environment],
    preselected: Option<usize>,
    prompt: &str,
) -> DeployResult<Option<usize>> {
    let count = environments.len();
    if count == 0 {
        return Err(DeployError::NoEnvironmentsConfigured);
    }

    if let Some(index) = preselected {
        if index >= count {
            return Err(DeployError::EnvironmentIndexOutOfRange { index, count });
        }
        debug!("Using preselected environment #{}", index);
        return Ok(Some(index));
    }

    if count == 1 {
        return Ok(Some(0));
    }

    let options: Vec<ChoiceOption> = environments
        .iter()
        .map(|env| ChoiceOption {
            label: env.name.clone(),
            detail: env
                .config
                .remote_environment()
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    let choice = interaction
        .choose(prompt, &options)
        .map_err(|e| DeployError::Interaction(format!("{:#}", e)))?;

    match choice {
        Some(index) if index >= count => {
            Err(DeployError::EnvironmentIndexOutOfRange { index, count })
        }
        other => Ok(other),
    }
}

/// Remote environment name from launch.json, or asked for when absent
pub fn remote_environment_name(
    interaction: &mut dyn Interaction,
    environment: &Environment,
) -> DeployResult<String> {
    if let Some(name) = environment.config.remote_environment() {
        return Ok(name.to_string());
    }

    let answer = interaction
        .prompt_text(&TextPrompt {
            prompt: "Enter Business Central environment name".to_string(),
            placeholder: Some("e.g. production, sandbox".to_string()),
        })
        .map_err(|e| DeployError::Interaction(format!("{:#}", e)))?;

    match answer.map(|name| name.trim().to_string()) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(DeployError::EnvironmentNameRequired),
    }
}
