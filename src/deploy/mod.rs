//! Deployment orchestration and status polling

pub mod build;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod poller;
pub mod select;

pub use build::{CommandBuilder, PrebuiltArtifact, builder_for};
pub use error::{DeployError, DeployResult};
pub use host::{Builder, ChoiceOption, Interaction, Reporter, TextPrompt};
pub use orchestrator::{BuildMode, DeployOptions, DeployOutcome, Orchestrator, Stage};
pub use poller::{StatusOutcome, format_status_line};
