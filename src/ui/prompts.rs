use anyhow::{Result, bail};
use dialoguer::{Input, Select};
use is_terminal::IsTerminal;

use crate::deploy::{ChoiceOption, Interaction, TextPrompt};

/// Terminal prompts backed by dialoguer
#[derive(Debug, Default)]
pub struct DialoguerInteraction;

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self
    }

    fn ensure_terminal() -> Result<()> {
        if !std::io::stdin().is_terminal() {
            bail!("cannot prompt: stdin is not a terminal (pass --environment <INDEX> instead)");
        }
        Ok(())
    }
}

impl Interaction for DialoguerInteraction {
    /// Arrow-key selection; Esc or q cancels
    fn choose(&mut self, prompt: &str, options: &[ChoiceOption]) -> Result<Option<usize>> {
        Self::ensure_terminal()?;

        let items: Vec<String> = options
            .iter()
            .map(|option| {
                if option.detail.is_empty() {
                    option.label.clone()
                } else {
                    format!("{} ({})", option.label, option.detail)
                }
            })
            .collect();

        let selection = Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection)
    }

    /// Free-text input; an empty answer counts as dismissed
    fn prompt_text(&mut self, question: &TextPrompt) -> Result<Option<String>> {
        Self::ensure_terminal()?;

        let prompt = match &question.placeholder {
            Some(placeholder) => format!("{} ({})", question.prompt, placeholder),
            None => question.prompt.clone(),
        };

        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        let answer = answer.trim().to_string();
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }
}
