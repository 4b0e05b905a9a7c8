//! Interactive environment selection.

use crate::error::Result;
use crate::store::{Environment, EnvironmentStore};
use crate::ui::{Prompt, PromptOption, UserInterface};

/// Prompt key for environment selection (`VEMAN_PROMPT_ENVIRONMENT`).
pub const SELECT_KEY: &str = "environment";

/// Resolve `name`, or ask the user to pick one of the listed environments.
pub fn resolve_environment(
    store: &EnvironmentStore,
    name: Option<&str>,
    ui: &mut dyn UserInterface,
) -> Result<Environment> {
    store.resolve(name, |envs| pick(envs, ui))
}

fn pick(envs: &[Environment], ui: &mut dyn UserInterface) -> Result<Option<usize>> {
    let options = envs
        .iter()
        .map(|env| PromptOption {
            label: env.name.clone(),
            value: env.name.clone(),
        })
        .collect();
    let answer = ui
        .prompt(&Prompt::select(SELECT_KEY, "Select an environment", options))?
        .as_string();
    Ok(envs.iter().position(|env| env.name == answer))
}
