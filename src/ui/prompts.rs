//! Interactive prompts.
//!
//! Prompts draw on the terminal passed in (stderr in practice), so they
//! keep working while stdout is captured by the shell integration.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{Result, VemanError};

use super::{Prompt, PromptOption, PromptResult, PromptType};

fn map_dialoguer_err(e: dialoguer::Error) -> VemanError {
    VemanError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()).for_stderr(),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
    }
}

fn confirm_default(prompt: &Prompt) -> bool {
    prompt
        .default
        .as_ref()
        .map(|s| s.to_lowercase() == "true" || s == "y" || s == "yes")
        .unwrap_or(true)
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let result = Confirm::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .default(confirm_default(prompt))
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    let input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);

    let result: String = if let Some(default) = &prompt.default {
        input
            .default(default.clone())
            .interact_on(term)
            .map_err(map_dialoguer_err)?
    } else {
        input.interact_on(term).map_err(map_dialoguer_err)?
    };

    Ok(PromptResult::String(result))
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on_opt(term)
        .map_err(map_dialoguer_err)?;

    match selection {
        Some(index) => Ok(PromptResult::String(options[index].value.clone())),
        None => Err(VemanError::Other(anyhow::anyhow!("selection cancelled"))),
    }
}
