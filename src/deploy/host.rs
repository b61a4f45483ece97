//! Capabilities the orchestration borrows from whatever hosts it
//!
//! The terminal implementations live in `ui` and `deploy::build`; tests use
//! scripted ones.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// One entry of a single-choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub detail: String,
}

/// A free-text question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub prompt: String,
    pub placeholder: Option<String>,
}

/// User interaction. `Ok(None)` means the user dismissed the prompt.
pub trait Interaction {
    fn choose(&mut self, prompt: &str, options: &[ChoiceOption]) -> Result<Option<usize>>;

    fn prompt_text(&mut self, question: &TextPrompt) -> Result<Option<String>>;
}

/// Where progress, diagnostics and the final notification go
pub trait Reporter {
    /// Short progress text for the step being worked on
    fn progress(&mut self, msg: &str);

    /// Diagnostic line (the output channel)
    fn log(&mut self, msg: &str);

    /// Terminal success or informational notification
    fn info(&mut self, msg: &str);

    /// Terminal error notification
    fn error(&mut self, msg: &str);
}

/// Produces the .app package for the project
#[async_trait]
pub trait Builder: Send + Sync {
    async fn build(&self, project_dir: &Path) -> Result<()>;
}
