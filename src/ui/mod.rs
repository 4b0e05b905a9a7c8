//! Everything veman says to the user goes through [`UserInterface`].
//! [`create_ui`] picks [`TerminalUI`] when stderr is a terminal and
//! [`NonInteractiveUI`] otherwise; tests use [`MockUI`].
//!
//! stdout carries activation scripts and data (`list`, `history`); every
//! status line, prompt and spinner goes to stderr.
//!
//! # Example
//!
//! ```
//! use veman::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet, false);
//! ui.show_header("veman");
//! ui.success("Environment created");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockUI, SpinnerStatus, UiEvent};
pub use non_interactive::NonInteractiveUI;
pub use output::{format_duration, OutputMode};
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, VemanTheme};

use crate::error::Result;

/// Sink for status output, prompts and progress.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Write a line of data to stdout.
    fn message(&mut self, msg: &str);

    /// `✓` status line; hidden in quiet mode.
    fn success(&mut self, msg: &str);

    /// `⚠` status line; hidden in quiet mode.
    fn warning(&mut self, msg: &str);

    /// `✗` line, shown in every mode.
    fn error(&mut self, msg: &str);

    /// Ask a question. Fails when no answer can be obtained.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Spinner for a long step; hidden when the mode has no spinners.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Section title.
    fn show_header(&mut self, title: &str);

    /// Show a secondary hint line.
    fn show_hint(&mut self, hint: &str);

    /// Show a failed command with its captured output.
    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>);

    /// Show a rendered table.
    fn show_table(&mut self, table: &Table);

    /// Whether a person can answer prompts.
    fn is_interactive(&self) -> bool;
}

/// A running spinner. Each `finish_*` replaces it with a final status line.
pub trait SpinnerHandle {
    fn set_message(&mut self, msg: &str);
    fn finish_success(&mut self, msg: &str);
    fn finish_error(&mut self, msg: &str);
    fn finish_skipped(&mut self, msg: &str);
}

/// A question for the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key; `VEMAN_PROMPT_<KEY>` answers it in non-interactive mode.
    pub key: String,
    pub question: String,
    pub prompt_type: PromptType,
    /// Answer used on an empty reply.
    pub default: Option<String>,
}

impl Prompt {
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(default.to_string()),
        }
    }

    pub fn input(key: &str, question: &str) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Input,
            default: None,
        }
    }

    pub fn select(key: &str, question: &str, options: Vec<PromptOption>) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Select { options },
            default: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PromptType {
    Confirm,
    Input,
    /// Pick one of `options`; the answer is the option's `value`.
    Select { options: Vec<PromptOption> },
}

/// One choice of a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    pub label: String,
    pub value: String,
}

/// An answer: `Bool` from a terminal confirm, `String` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    Bool(bool),
    String(String),
}

impl PromptResult {
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Interpret as a yes/no answer.
    ///
    /// Strings (answers from `VEMAN_PROMPT_*`) accept `y`, `yes`, `true`, `1`.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "y" | "yes" | "true" | "1"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::String("web".into()).as_string(), "web");
    }

    #[test]
    fn prompt_result_as_bool_accepts_env_answers() {
        assert!(PromptResult::Bool(true).as_bool());
        assert!(PromptResult::String("yes".into()).as_bool());
        assert!(PromptResult::String(" Y ".into()).as_bool());
        assert!(!PromptResult::String("no".into()).as_bool());
        assert!(!PromptResult::String("web".into()).as_bool());
    }

    #[test]
    fn confirm_prompt_records_default() {
        let prompt = Prompt::confirm("overwrite", "Overwrite?", false);
        assert!(matches!(prompt.prompt_type, PromptType::Confirm));
        assert_eq!(prompt.default.as_deref(), Some("false"));
    }

    #[test]
    fn select_prompt_stores_options() {
        let prompt = Prompt::select(
            "environment",
            "Select an environment",
            vec![PromptOption {
                label: "web (3.12.0)".into(),
                value: "web".into(),
            }],
        );
        match prompt.prompt_type {
            PromptType::Select { options } => assert_eq!(options[0].value, "web"),
            other => panic!("unexpected prompt type {:?}", other),
        }
    }
}
