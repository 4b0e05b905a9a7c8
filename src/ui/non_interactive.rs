//! Non-interactive UI for pipes, CI and scripted use.

use std::collections::HashMap;

use crate::config::ENV_PROMPT_PREFIX;
use crate::error::{Result, VemanError};

use super::terminal::error_block;
use super::{
    OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, Table, UserInterface, VemanTheme,
};

/// Plain stderr output for pipes and CI.
///
/// Prompts are answered from `VEMAN_PROMPT_<KEY>` variables or the prompt's
/// default; a prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    answers: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let answers = std::env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PROMPT_PREFIX))
            .collect();
        Self::with_overrides(mode, answers)
    }

    /// Answers keyed by full variable name, e.g. `VEMAN_PROMPT_NAME`.
    pub fn with_overrides(mode: OutputMode, answers: HashMap<String, String>) -> Self {
        Self { mode, answers }
    }

    fn status(&self, icon: &str, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{} {}", icon, msg);
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        self.status("✓", msg);
    }

    fn warning(&mut self, msg: &str) {
        self.status("⚠", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", ENV_PROMPT_PREFIX, prompt.key.to_uppercase());
        let answer = self
            .answers
            .get(&env_key)
            .or(prompt.default.as_ref())
            .ok_or_else(|| {
                VemanError::Other(anyhow::anyhow!(
                    "Cannot prompt for '{}' in non-interactive mode (set {})",
                    prompt.key,
                    env_key
                ))
            })?;

        match &prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(
                PromptResult::String(answer.clone()).as_bool(),
            )),
            PromptType::Select { options } => {
                if options.iter().any(|o| o.value == *answer) {
                    Ok(PromptResult::String(answer.clone()))
                } else {
                    Err(VemanError::Other(anyhow::anyhow!(
                        "'{}' is not a valid answer for '{}'",
                        answer,
                        prompt.key
                    )))
                }
            }
            PromptType::Input => Ok(PromptResult::String(answer.clone())),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            eprintln!("  {}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        self.status("==", title);
    }

    fn show_hint(&mut self, hint: &str) {
        self.status(" ", hint);
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        for line in error_block(&VemanTheme::plain(), command, output, hint) {
            eprintln!("    {}", line);
        }
    }

    fn show_table(&mut self, table: &Table) {
        if self.mode.shows_status() {
            eprintln!("{}", table.render());
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prints only the final line.
struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("  ○ {}", msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::PromptOption;

    fn ui_with(key: &str, value: &str) -> NonInteractiveUI {
        let mut overrides = HashMap::new();
        overrides.insert(key.to_string(), value.to_string());
        NonInteractiveUI::with_overrides(OutputMode::Quiet, overrides)
    }

    #[test]
    fn prompt_reads_answer_variable() {
        let mut ui = ui_with("VEMAN_PROMPT_NAME", "web");
        let result = ui.prompt(&Prompt::input("name", "Environment name")).unwrap();
        assert_eq!(result, PromptResult::String("web".into()));
    }

    #[test]
    fn confirm_falls_back_to_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Quiet, HashMap::new());
        let result = ui
            .prompt(&Prompt::confirm("overwrite", "Overwrite?", false))
            .unwrap();
        assert_eq!(result, PromptResult::Bool(false));
    }

    #[test]
    fn confirm_override_is_parsed() {
        let mut ui = ui_with("VEMAN_PROMPT_OVERWRITE", "yes");
        let result = ui
            .prompt(&Prompt::confirm("overwrite", "Overwrite?", false))
            .unwrap();
        assert_eq!(result, PromptResult::Bool(true));
    }

    #[test]
    fn prompt_without_answer_fails() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Quiet, HashMap::new());
        let err = ui.prompt(&Prompt::input("name", "Name")).unwrap_err();
        assert!(err.to_string().contains("VEMAN_PROMPT_NAME"));
    }

    #[test]
    fn select_rejects_unknown_value() {
        let mut ui = ui_with("VEMAN_PROMPT_ENVIRONMENT", "ghost");
        let prompt = Prompt::select(
            "environment",
            "Select",
            vec![PromptOption {
                label: "web".into(),
                value: "web".into(),
            }],
        );
        assert!(ui.prompt(&prompt).is_err());
    }

    #[test]
    fn never_interactive() {
        assert!(!NonInteractiveUI::new(OutputMode::Normal).is_interactive());
    }
}
